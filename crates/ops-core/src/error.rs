//! Error types for `content-ops-core`.

use thiserror::Error;

/// Every way an operation can fail.
///
/// None of these escape [`crate::ContentOps::call`]: they are folded into the error envelope.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Malformed or missing caller input, detected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connection, timeout, DNS or body-read failure.
    #[error("http transport error: {0}")]
    Transport(String),

    /// Non-2xx status from the remote service.
    #[error("API returned {status} {reason}: {body}")]
    Remote {
        status: u16,
        reason: String,
        body: String,
    },

    /// Success status with a body that is not valid JSON.
    #[error("invalid JSON response body: {0}")]
    Decode(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Invalid static configuration (base URL, HTTP client).
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OpsError>;

impl From<reqwest::Error> for OpsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(crate::transport::sanitize_reqwest_error(&value))
    }
}

impl From<serde_json::Error> for OpsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
