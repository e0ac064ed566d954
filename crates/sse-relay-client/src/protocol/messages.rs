//! REST request/response bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/messages` and `POST /publish`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub message: String,
}

impl SubmitRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Echoed payload inside a successful submission response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: String,
}

/// Successful submission response: `{"status": "accepted", "data": {"message": ...}}`.
///
/// `/publish` answers with `"status": "queued"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAccepted {
    #[serde(default)]
    pub status: Option<String>,
    pub data: MessagePayload,
}

impl MessageAccepted {
    /// The message text as echoed by the server.
    pub fn message(&self) -> &str {
        &self.data.message
    }
}

/// Error body sent with a non-2xx status: `{"error": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the `error` string from a raw response body, if it has one.
    pub fn extract(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
    }
}

/// Heartbeat response: `{"status": "ok", "message": "pong"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl PingResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_request_shape() {
        let body = serde_json::to_value(SubmitRequest::new("hello")).unwrap();
        assert_eq!(body, json!({"message": "hello"}));
    }

    #[test]
    fn test_message_accepted_parses_server_body() {
        let parsed: MessageAccepted = serde_json::from_value(json!({
            "status": "accepted",
            "data": {"message": "hello"}
        }))
        .unwrap();
        assert_eq!(parsed.message(), "hello");
        assert_eq!(parsed.status.as_deref(), Some("accepted"));

        let without_status: MessageAccepted =
            serde_json::from_value(json!({"data": {"message": "x"}})).unwrap();
        assert!(without_status.status.is_none());
    }

    #[test]
    fn test_message_accepted_requires_data() {
        let missing = serde_json::from_value::<MessageAccepted>(json!({"status": "accepted"}));
        assert!(missing.is_err());
    }

    #[test]
    fn test_error_body_extract() {
        assert_eq!(
            ErrorBody::extract(r#"{"error":"message is required"}"#).as_deref(),
            Some("message is required")
        );
        assert_eq!(ErrorBody::extract(r#"{"detail":"nope"}"#), None);
        assert_eq!(ErrorBody::extract("<html>502</html>"), None);
    }

    #[test]
    fn test_ping_response() {
        let ping: PingResponse =
            serde_json::from_value(json!({"status": "ok", "message": "pong"})).unwrap();
        assert!(ping.is_ok());
        assert_eq!(ping.message.as_deref(), Some("pong"));
    }
}
