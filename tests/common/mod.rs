// Shared test fixtures
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use hinglish_bridge::providers::{ProviderError, TranslationProvider};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub type Outcome = Result<String, ProviderError>;

/// Provider that replays a script of outcomes, repeating the last one.
pub struct ScriptedProvider {
    name: &'static str,
    script: Mutex<VecDeque<Outcome>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, script: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            name,
            script: Mutex::new(script.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn slow(name: &'static str, delay: Duration, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            name,
            script: Mutex::new(vec![outcome].into()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn translate(&self, _text: &str, _credential: &str) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut script = self.script.lock();
        if script.len() > 1 {
            script.pop_front().expect("script is non-empty")
        } else {
            script.front().cloned().expect("script is non-empty")
        }
    }
}

pub fn ok(text: &str) -> Outcome {
    Ok(text.to_string())
}

pub fn unavailable(provider: &str) -> Outcome {
    Err(ProviderError::Status {
        provider: provider.to_string(),
        status: 503,
        message: "Service Unavailable".to_string(),
    })
}

/// A chat-completion success body carrying `content`.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
