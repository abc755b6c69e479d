use std::fmt;

use llm::LlmError;

/// Errors raised while preparing media for transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaError {
    /// The file is larger than the upload ceiling. Nothing was encoded and no
    /// preview resource was acquired.
    SizeLimitExceeded { size: usize, limit: usize },
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::SizeLimitExceeded { size, limit } => {
                write!(f, "File of {} bytes exceeds the {} byte upload limit", size, limit)
            }
        }
    }
}

impl std::error::Error for MediaError {}

/// Errors raised by the analysis request pipeline.
#[derive(Debug)]
pub enum AnalysisError {
    /// Endpoint unreachable, credential rejected, or quota exhausted.
    ModelUnavailable(String),

    /// The model's reply did not decode as the declared result shape. The
    /// session keeps no partial result.
    SchemaViolation(String),

    /// The request did not settle within the deadline.
    Timeout,

    /// An analysis for this session is already in flight.
    AlreadyRunning,

    /// No media has been uploaded to analyze.
    NoMedia,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::ModelUnavailable(msg) => write!(f, "Model unavailable: {}", msg),
            AnalysisError::SchemaViolation(msg) => {
                write!(f, "Response violated the declared schema: {}", msg)
            }
            AnalysisError::Timeout => write!(f, "Analysis request timed out"),
            AnalysisError::AlreadyRunning => write!(f, "An analysis is already in flight"),
            AnalysisError::NoMedia => write!(f, "No media loaded in session"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unavailable(msg) => AnalysisError::ModelUnavailable(msg),
            LlmError::Timeout => AnalysisError::Timeout,
            LlmError::Malformed(msg) => AnalysisError::SchemaViolation(msg),
        }
    }
}

/// Raised when an operation needs uploaded media and the session has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoMedia;

impl fmt::Display for NoMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No media loaded in session")
    }
}

impl std::error::Error for NoMedia {}
