use std::fmt;

/// Errors surfaced by model endpoint bindings.
#[derive(Debug)]
pub enum LlmError {
    /// Endpoint unreachable, credential rejected, quota exhausted, or a
    /// non-success HTTP status.
    Unavailable(String),

    /// The request did not settle within the configured deadline.
    Timeout,

    /// The endpoint answered, but the body could not be decoded.
    Malformed(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::Unavailable(msg) => write!(f, "Model unavailable: {}", msg),
            LlmError::Timeout => write!(f, "Request timed out"),
            LlmError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Malformed(err.to_string())
    }
}
