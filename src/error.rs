use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ImagenError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Missing {0}")]
    MissingConfig(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Imagen error")]
    Upstream { status: u16, details: Value },
    #[error("Malformed response from Imagen")]
    MalformedResponse { status: u16, raw: String },
    #[error("No image returned from {model}")]
    NoImage { model: String },
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ImagenError {
    /// HTTP status returned to the caller for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ImagenError::MethodNotAllowed => 405,
            ImagenError::InvalidRequest(_) => 400,
            ImagenError::Upstream { status, .. } if (400..600).contains(status) => *status,
            ImagenError::Upstream { .. } => 502,
            ImagenError::MissingConfig(_)
            | ImagenError::ConfigError(_)
            | ImagenError::AuthError(_)
            | ImagenError::MalformedResponse { .. }
            | ImagenError::NoImage { .. }
            | ImagenError::RequestError(_)
            | ImagenError::SerializationError(_) => 500,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            ImagenError::Upstream { details, .. } => Some(details.clone()),
            ImagenError::MalformedResponse { raw, .. } => Some(Value::String(raw.clone())),
            _ => None,
        }
    }

    /// `{ "error": <message>, "details": <payload> }`, `details` omitted when absent.
    pub fn to_body(&self) -> Value {
        match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code()) && !matches!(self, ImagenError::Upstream { .. })
    }
}

impl From<reqwest::Error> for ImagenError {
    fn from(e: reqwest::Error) -> Self {
        ImagenError::RequestError(e.to_string())
    }
}

impl From<serde_json::Error> for ImagenError {
    fn from(e: serde_json::Error) -> Self {
        ImagenError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImagenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ImagenError::MethodNotAllowed.status_code(), 405);
        assert_eq!(ImagenError::InvalidRequest("Missing prompt".into()).status_code(), 400);
        assert_eq!(ImagenError::MissingConfig("GOOGLE_API_KEY".into()).status_code(), 500);
        assert_eq!(
            ImagenError::NoImage {
                model: "imagen-3.0-generate-002".into()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let forbidden = ImagenError::Upstream {
            status: 403,
            details: json!({ "error": { "message": "Permission denied" } }),
        };
        assert_eq!(forbidden.status_code(), 403);
        assert!(!forbidden.is_client_error());

        let odd = ImagenError::Upstream {
            status: 302,
            details: Value::Null,
        };
        assert_eq!(odd.status_code(), 502);
    }

    #[test]
    fn test_body_shape() {
        let body = ImagenError::MissingConfig("GOOGLE_API_KEY".into()).to_body();
        assert_eq!(body, json!({ "error": "Missing GOOGLE_API_KEY" }));

        let body = ImagenError::Upstream {
            status: 500,
            details: json!({ "raw": "<html>oops</html>" }),
        }
        .to_body();
        assert_eq!(body["error"], "Imagen error");
        assert_eq!(body["details"]["raw"], "<html>oops</html>");
    }
}
