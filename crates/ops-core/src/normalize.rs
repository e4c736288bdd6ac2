//! Converts raw responses and failures into the uniform result shapes.

use crate::catalog::Operation;
use crate::error::{OpsError, Result};
use crate::transport::RawResponse;
use serde_json::{Map, Value, json};

/// Result of one operation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Decoded remote JSON body, passed through verbatim.
    Payload(Value),
    /// Synthetic envelope for a successful delete.
    Deleted { message: String },
    /// Error envelope; `error` is the stringified cause.
    Failed { message: String, error: String },
}

impl Outcome {
    #[must_use]
    pub fn failed(message: impl Into<String>, error: &OpsError) -> Self {
        Self::Failed {
            message: message.into(),
            error: error.to_string(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// JSON value handed back to the invocation host.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Payload(v) => v,
            Self::Deleted { message } => json!({"status": "success", "message": message}),
            Self::Failed { message, error } => {
                json!({"status": "error", "message": message, "error": error})
            }
        }
    }
}

/// Interpret a raw response for `op`.
///
/// # Errors
///
/// Returns [`OpsError::Remote`] for non-2xx statuses and [`OpsError::Decode`] for a success
/// status whose body is not JSON. Delete operations never decode the body.
pub fn interpret(op: &Operation, args: &Map<String, Value>, response: RawResponse) -> Result<Outcome> {
    if !response.is_success() {
        return Err(remote_error(&response));
    }

    if let Some(message) = op.deleted_message(args) {
        return Ok(Outcome::Deleted { message });
    }

    let body: Value = serde_json::from_slice(&response.body)?;
    Ok(Outcome::Payload(body))
}

fn remote_error(response: &RawResponse) -> OpsError {
    let text = String::from_utf8_lossy(&response.body);
    let compact = if is_json(response.content_type.as_deref()) {
        serde_json::from_str::<Value>(&text).ok()
    } else {
        None
    };
    let body = match compact {
        Some(v) => v.to_string(),
        None => text.trim().to_string(),
    };
    let reason = reqwest::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
        .to_string();
    OpsError::Remote {
        status: response.status,
        reason,
        body,
    }
}

/// `application/json` or any `+json` media type.
fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
}
