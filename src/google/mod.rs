pub mod auth;
pub mod fallback;
pub mod generative_client;
pub mod vertex_client;

use crate::{
    config::ProviderConfig,
    error::{ImagenError, Result},
    models::{GenerationRequest, GenerationResult, ProviderKind},
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub use auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource, TokenSource};
pub use fallback::{classify, classify_failure, FailureClass};
pub use generative_client::GenerativeLanguageClient;
pub use vertex_client::VertexClient;

const LOGGED_BODY_LIMIT: usize = 2048;

#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model attempted first.
    fn model(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;
}

pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ImageProvider>> {
    let http = reqwest::Client::new();
    match config {
        ProviderConfig::GenerativeLanguage(config) => Ok(Arc::new(
            GenerativeLanguageClient::new(config.clone(), http)?,
        )),
        ProviderConfig::Vertex(config) => Ok(Arc::new(VertexClient::from_config(config, http)?)),
    }
}

/// Reads the raw body before parsing so unparsable responses keep their text.
///
/// Non-2xx becomes [`ImagenError::Upstream`] carrying the parsed body, or
/// `{ "raw": <text> }` when it is not JSON.
pub(crate) async fn read_json_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let raw = response.text().await?;

    log::debug!(
        "Upstream response {} ({} bytes): {}",
        status,
        raw.len(),
        truncate_for_log(&raw)
    );

    let parsed: Option<Value> = serde_json::from_str(&raw).ok();

    if !status.is_success() {
        let details = parsed.unwrap_or_else(|| json!({ "raw": raw }));
        log::error!("Imagen error {}: {}", status, truncate_for_log(&details.to_string()));
        return Err(ImagenError::Upstream {
            status: status.as_u16(),
            details,
        });
    }

    parsed.ok_or_else(|| {
        log::error!("Imagen returned {} with a non-JSON body", status);
        ImagenError::MalformedResponse {
            status: status.as_u16(),
            raw,
        }
    })
}

fn truncate_for_log(text: &str) -> &str {
    if text.len() <= LOGGED_BODY_LIMIT {
        return text;
    }
    let mut end = LOGGED_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
