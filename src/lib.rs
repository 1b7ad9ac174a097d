// hinglish-bridge - Translate coding-problem descriptions to Hinglish
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod providers;
pub mod server;
pub mod session;
pub mod settings;
pub mod translation;
pub mod utils;
