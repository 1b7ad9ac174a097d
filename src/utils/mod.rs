//! Utility functions and helpers for hinglish-bridge.
//!
//! This module provides cross-cutting concerns like structured logging,
//! credential scrubbing, the retry schedule, the clock used for cache
//! expiry, and text shaping around translations.
//!
//! # Submodules
//!
//! - `clock`: Injectable wall clock for TTL checks.
//! - `logging`: Tracing initialization with credential redaction.
//! - `retry`: Linear backoff between provider race attempts.
//! - `text`: Problem-id derivation and text normalization.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod clock;
pub mod logging;
pub mod retry;
pub mod text;
