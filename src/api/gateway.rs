use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::ApiError;

/// Acknowledgement returned by every write endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WriteAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl WriteAck {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Confirmed by the server. `echoed` is the stored record when the server
    /// sent one back.
    Success { echoed: Option<Value> },
    Failure { message: String },
}

impl Outcome {
    pub fn success() -> Self {
        Outcome::Success { echoed: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Success strictly means `status == "success"`. A missing status, any other
/// value, a body that is not an object and every transport or HTTP error are
/// failures.
pub fn interpret(action: &str, response: Result<Value, ApiError>) -> Outcome {
    let value = match response {
        Ok(value) => value,
        Err(error) => {
            warn!(action, %error, "write failed");
            return Outcome::failure(format!("Failed to {action}: {error}"));
        }
    };
    let ack = match WriteAck::deserialize(&value) {
        Ok(ack) => ack,
        Err(_) => {
            warn!(action, "write acknowledged with an unexpected body");
            return Outcome::failure(format!("Failed to {action}."));
        }
    };
    if ack.is_success() {
        info!(action, "write confirmed");
        Outcome::Success { echoed: ack.data.filter(|d| !d.is_null()) }
    } else {
        let message = ack.message.unwrap_or_else(|| format!("Failed to {action}."));
        warn!(action, status = ?ack.status, %message, "write rejected");
        Outcome::failure(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_success_status_counts() {
        assert!(interpret("save", Ok(json!({"status": "success"}))).is_success());
        assert!(!interpret("save", Ok(json!({"status": "ok"}))).is_success());
        assert!(!interpret("save", Ok(json!({"message": "saved"}))).is_success());
        assert!(!interpret("save", Ok(json!([1, 2]))).is_success());
        assert!(!interpret("save", Ok(Value::Null)).is_success());
    }

    #[test]
    fn failure_carries_a_readable_message() {
        assert_eq!(
            interpret("add class", Ok(json!({"status": "error", "message": "Class exists"}))),
            Outcome::failure("Class exists")
        );
        let Outcome::Failure { message } =
            interpret("add class", Err(ApiError::Status { status: 500, message: None }))
        else {
            panic!("expected failure");
        };
        assert!(message.starts_with("Failed to add class"));
    }

    #[test]
    fn echoed_record_is_kept() {
        let outcome = interpret("save", Ok(json!({"status": "success", "data": {"id": 9}})));
        assert_eq!(outcome, Outcome::Success { echoed: Some(json!({"id": 9})) });
    }
}
