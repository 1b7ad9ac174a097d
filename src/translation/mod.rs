// Translation orchestration module
// Author: kelexine (https://github.com/kelexine)

pub mod orchestrator;
pub mod race;

pub use orchestrator::{RetryPolicy, Translation, Translator};
