// Fixed translation instruction and sampling parameters
// Author: kelexine (https://github.com/kelexine)

use super::models::{ChatCompletionRequest, ChatMessage};

pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 8000;

const INSTRUCTION: &str = "Translate this text to Hinglish (Hindi + English mix).

IMPORTANT RULES:
- PRESERVE ALL HTML structure exactly (lists, bullets, paragraphs, formatting)
- Keep code, numbers, variable names, and technical terms unchanged
- Only translate human-readable English words to Hindi/Hinglish
- Use HTML tags: <ul>, <ol>, <li> for lists, <strong> for bold, <code> for code
- Do NOT use Markdown syntax
- Maintain the exact same structure and formatting as the input

Text to translate:
";

/// The single user turn sent to every provider.
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTION.len() + text.len());
    prompt.push_str(INSTRUCTION);
    prompt.push_str(text);
    prompt
}

pub fn build_request(model: &str, text: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(build_prompt(text))],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}
