// Message boundary wire types
// Author: kelexine (https://github.com/kelexine)

use crate::translation::Translation;
use serde::{Deserialize, Serialize};

/// Runtime message sent by the page script, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeMessage {
    Translate(TranslateRequest),
}

/// A request to translate one problem description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub problem_id: String,
    #[serde(default)]
    pub tab_id: Option<String>,
}

/// Structured result returned across the message boundary.
///
/// Failures are reported here rather than through the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslateResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            translation: None,
            from_cache: None,
            error: Some(error.into()),
        }
    }
}

impl From<Translation> for TranslateResponse {
    fn from(t: Translation) -> Self {
        Self {
            success: true,
            translation: Some(t.text),
            from_cache: Some(t.from_cache),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyUpdate {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnabledState {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_message() {
        let body = r#"{"type":"TRANSLATE","text":"<p>Given</p>","problemId":"two-sum"}"#;
        let RuntimeMessage::Translate(req) = serde_json::from_str(body).unwrap();
        assert_eq!(req.problem_id, "two-sum");
        assert!(req.tab_id.is_none());
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        let body = r#"{"type":"EXTENSION_TOGGLED","enabled":false}"#;
        assert!(serde_json::from_str::<RuntimeMessage>(body).is_err());
    }

    #[test]
    fn test_response_omits_absent_fields() {
        let json = serde_json::to_value(TranslateResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));

        let ok: TranslateResponse = Translation {
            text: "<p>hi</p>".to_string(),
            from_cache: true,
        }
        .into();
        let json = serde_json::to_value(ok).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "translation": "<p>hi</p>", "fromCache": true})
        );
    }
}
