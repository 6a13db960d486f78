//! Response envelope shared by every ledger operation.
//!
//! ```json
//! { "message": "success", "result": { ... } }
//! { "message": "Order not found: 42", "result": null }
//! ```

use serde::{Deserialize, Serialize};

use crate::ledger::error::LedgerResult;

pub const SUCCESS_MESSAGE: &str = "success";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(result: T) -> Self {
        Envelope {
            message: SUCCESS_MESSAGE.to_string(),
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            message: message.into(),
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

impl<T> From<LedgerResult<T>> for Envelope<T> {
    fn from(result: LedgerResult<T>) -> Self {
        match result {
            Ok(value) => Envelope::success(value),
            Err(err) => err.into_envelope(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::error::LedgerError;

    #[test]
    fn test_success_shape() {
        let envelope = Envelope::success(vec![1, 2]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "success", "result": [1, 2] }));
    }

    #[test]
    fn test_failure_shape() {
        let envelope: Envelope<i64> = Err(LedgerError::validation("qty must be positive")).into();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": "qty must be positive", "result": null })
        );
        assert!(!envelope.is_success());
    }
}
