// src/api/types.rs
use serde::{Deserialize, Serialize};

/// Body of `POST /submit`. Both fields are optional at the wire level so that
/// a missing field becomes a validation error instead of a deserialization one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "voiceId")]
    pub voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub sophia_response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

impl HelloResponse {
    pub fn hello_world() -> Self {
        Self {
            message: "Hello World".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_reads_camel_case_voice_id() {
        let req: SubmitRequest =
            serde_json::from_str(r#"{"text": "hi", "voiceId": "abc"}"#).unwrap();
        assert_eq!(req.text.as_deref(), Some("hi"));
        assert_eq!(req.voice_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_submit_request_missing_and_null_fields() {
        let req: SubmitRequest = serde_json::from_str(r#"{"voiceId": null}"#).unwrap();
        assert!(req.text.is_none());
        assert!(req.voice_id.is_none());
    }

    #[test]
    fn test_submit_response_field_name() {
        let json = serde_json::to_value(SubmitResponse {
            sophia_response: "Sure.".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"sophia_response": "Sure."}));
    }
}
