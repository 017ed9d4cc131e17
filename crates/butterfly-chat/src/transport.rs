//! Outbound chat requests

use butterfly_core::{ButterflyError, Result};
use serde_json::Value;

pub trait ChatTransport {
    /// Send one user message and return the assistant's reply text
    fn send(&self, message: &str) -> Result<String>;
}

/// `GET <endpoint>?message=<text>` with no timeout and no retry
pub struct HttpChatTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpChatTransport {
    pub fn new(endpoint: &str) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            endpoint: endpoint.to_string(),
            agent: config.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpChatTransport {
    fn send(&self, message: &str) -> Result<String> {
        log::debug!("Chat request to {}", self.endpoint);

        let mut response = self
            .agent
            .get(&self.endpoint)
            .query("message", message)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| ButterflyError::ChatRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ButterflyError::ChatRequestFailed(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.endpoint
            )));
        }

        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ButterflyError::ChatRequestFailed(format!("invalid reply: {}", e)))?;
        Ok(parse_reply(&body))
    }
}

/// Text of a reply body: its `response` field when that is set, otherwise
/// the body itself
pub fn parse_reply(body: &Value) -> String {
    match body.get("response") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(value) if is_truthy(value) => value.to_string(),
        _ => match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_field_wins() {
        let body = json!({"response": "Plant more trees.", "model": "x"});
        assert_eq!(parse_reply(&body), "Plant more trees.");
    }

    #[test]
    fn bare_string_body() {
        assert_eq!(parse_reply(&json!("Hi there")), "Hi there");
    }

    #[test]
    fn empty_response_falls_back_to_body() {
        let body = json!({"response": ""});
        assert_eq!(parse_reply(&body), r#"{"response":""}"#);
    }

    #[test]
    fn non_string_response_is_rendered() {
        assert_eq!(parse_reply(&json!({"response": 42})), "42");
    }

    #[test]
    fn unreachable_endpoint_is_a_chat_failure() {
        let transport = HttpChatTransport::new("http://127.0.0.1:9/chat");
        let err = transport.send("hello").unwrap_err();
        assert!(matches!(err, ButterflyError::ChatRequestFailed(_)));
    }
}
