//! Error types for tasksheet
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, validation, unknown task id)
//! - 4: Operation failed (store unavailable, timeout, I/O)

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the tasksheet CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasksheet operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Row store error: {0}")]
    Store(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::Validation(_)
            | Error::NotFound(_)
            | Error::SheetNotFound(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::Timeout { .. }
            | Error::Store(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the variant carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation(fields) => Some(serde_json::json!({ "missing": fields })),
            Error::NotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::Timeout { operation, after } => Some(serde_json::json!({
                "operation": operation,
                "timeout_secs": after.as_secs(),
            })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            _ => None,
        }
    }

    /// Coarse class reported in JSON error output
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }
}

/// Result type alias for tasksheet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
