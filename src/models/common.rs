use crate::error::{ImagenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which Google image backend a deployment talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// API-key authenticated `:generateImages` on generativelanguage.googleapis.com.
    GenerativeLanguage,
    /// Service-account authenticated `:predict` on Vertex AI, with a fallback model.
    Vertex,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "generative-language" | "generativelanguage" | "api-key" | "gemini" => {
                Ok(ProviderKind::GenerativeLanguage)
            }
            "vertex" | "vertex-ai" | "service-account" => Ok(ProviderKind::Vertex),
            other => Err(ImagenError::ConfigError(format!(
                "IMAGEN_PROVIDER must be 'generative-language' or 'vertex', got '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GenerativeLanguage => "generative-language",
            ProviderKind::Vertex => "vertex",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
