use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::ApiError;

/// `error` field of a failed response: one message or several
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::One(message) => f.write_str(message),
            ErrorMessage::Many(messages) => f.write_str(&messages.join("\n")),
        }
    }
}

/// `{ success, data?, error? }` wrapper every endpoint answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorMessage>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            return Ok(self.data);
        }
        let message = self
            .error
            .map(|error| error.to_string())
            .or(self.message)
            .unwrap_or_else(|| "Request failed".to_string());
        Err(ApiError::Server(message))
    }
}

/// Pull an id out of a created record, accepting `_id` or `id`
pub fn record_id(record: &Value) -> Option<String> {
    ["_id", "id"]
        .iter()
        .filter_map(|key| record.get(key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
