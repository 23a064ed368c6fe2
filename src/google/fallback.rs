//! Primary/fallback decision for Vertex deployments.
//!
//! Google does not expose a stable error code for "model unavailable to this
//! project" or "quota exhausted", so the classification below is a best-effort
//! heuristic over the HTTP status and the free-text error message. Any upstream
//! change in wording falls through to [`FailureClass::Other`], which is never
//! retried.

use crate::error::ImagenError;
use crate::models::upstream_message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// HTTP 429, or a message containing "quota".
    QuotaExceeded,
    /// HTTP 404, or a message containing "not found".
    NotFound,
    Other,
}

impl FailureClass {
    pub fn allows_fallback(&self) -> bool {
        matches!(self, FailureClass::QuotaExceeded | FailureClass::NotFound)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::QuotaExceeded => "quota-exceeded",
            FailureClass::NotFound => "not-found",
            FailureClass::Other => "other",
        }
    }
}

/// Matching is case-insensitive; quota wins when both apply.
pub fn classify(status: Option<u16>, message: Option<&str>) -> FailureClass {
    let message = message.map(str::to_ascii_lowercase).unwrap_or_default();

    if status == Some(429) || message.contains("quota") {
        FailureClass::QuotaExceeded
    } else if status == Some(404) || message.contains("not found") {
        FailureClass::NotFound
    } else {
        FailureClass::Other
    }
}

/// Only upstream HTTP failures are eligible; transport, auth and empty-result
/// errors are always [`FailureClass::Other`]. When no message field is found
/// the whole serialized payload is matched instead.
pub fn classify_failure(err: &ImagenError) -> FailureClass {
    match err {
        ImagenError::Upstream { status, details } => {
            let message = upstream_message(details).unwrap_or_else(|| details.to_string());
            classify(Some(*status), Some(&message))
        }
        _ => FailureClass::Other,
    }
}
