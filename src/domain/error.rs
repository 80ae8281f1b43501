use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide error type.
///
/// Row-level and source-level failures are contained where they happen
/// (logged, counted, skipped). Only orchestration failures reach the host.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum AppError {
    /// Fetch failure, non-2xx status or timeout for one source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed row or payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request from the user, e.g. exporting an empty result.
    #[error("{0}")]
    UserInput(String),

    /// Startup or orchestration failure.
    #[error("System error: {0}")]
    System(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl AppError {
    /// Whether the message is meant to be shown to the user verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::UserInput(_) | AppError::System(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
