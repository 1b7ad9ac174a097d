//! Axum-based HTTP server for hinglish-bridge.
//!
//! This module is the message boundary between the page script and the
//! translation flow. The page posts a `TRANSLATE` message and gets back a
//! structured `{success, translation?, fromCache?, error?}` result; the
//! remaining routes manage the cache and settings and expose health and
//! metrics.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints.
//! - `messages`: Wire types of the message boundary.
//! - `routes`: The router that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
pub mod messages;
mod routes;

pub use handlers::{HealthResponse, HealthStatus};
pub use messages::{RuntimeMessage, TranslateRequest, TranslateResponse};
pub use routes::{create_router, AppState};
