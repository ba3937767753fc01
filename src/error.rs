use serde_json::Value;
use thiserror::Error;

pub const EMPTY_COMPLETION_MESSAGE: &str = "no response from GPT35Turbo";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during your request.";

#[derive(Debug, Error)]
pub enum JustBeginError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Validation(String),
    #[error("no response from GPT35Turbo")]
    EmptyCompletion,
    #[error("upstream error ({status}): {payload}")]
    Upstream { status: u16, payload: Value },
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    /// A call to the plan API failed; carries the message shown to the user.
    #[error("{0}")]
    Request(String),
}

pub use crate::Result;

impl JustBeginError {
    /// HTTP status the server answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::EmptyCompletion => 400,
            Self::Upstream { status, .. } => *status,
            Self::Config(_)
            | Self::Http(_)
            | Self::Serialization(_)
            | Self::Runtime(_)
            | Self::Request(_) => 500,
        }
    }

    /// Message shown to the browser. Internal failures collapse to a generic line.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(message) | Self::Validation(message) | Self::Request(message) => {
                message.clone()
            }
            Self::EmptyCompletion => EMPTY_COMPLETION_MESSAGE.to_string(),
            Self::Upstream { payload, .. } => payload
                .pointer("/error/message")
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            Self::Http(_) | Self::Serialization(_) | Self::Runtime(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_each_kind_to_one_status() {
        assert_eq!(JustBeginError::Config("x".into()).status_code(), 500);
        assert_eq!(JustBeginError::Validation("x".into()).status_code(), 400);
        assert_eq!(JustBeginError::EmptyCompletion.status_code(), 400);
        assert_eq!(JustBeginError::Http("x".into()).status_code(), 500);
        let upstream = JustBeginError::Upstream {
            status: 429,
            payload: json!({"error": {"message": "slow down"}}),
        };
        assert_eq!(upstream.status_code(), 429);
        assert_eq!(upstream.public_message(), "slow down");
    }

    #[test]
    fn hides_transport_details() {
        let err = JustBeginError::Http("connection refused at 10.0.0.1".into());
        assert!(format!("{err}").contains("http error"));
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            JustBeginError::EmptyCompletion.to_string(),
            "no response from GPT35Turbo"
        );
    }
}
