//! Framework-independent image request handling.
//!
//! [`ImageRequestHandler::handle`] takes a method and raw body and always
//! produces an [`ApiResponse`]; HTTP adapters only translate in and out.

use crate::{
    config::Config,
    error::{ImagenError, Result},
    google::{build_provider, ImageProvider},
    models::{GenerationRequest, ProviderKind, ResponseShape},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn from_error(err: &ImagenError) -> Self {
        Self {
            status: err.status_code(),
            body: err.to_body(),
        }
    }
}

enum ProviderState {
    Ready(Arc<dyn ImageProvider>),
    Misconfigured(ImagenError),
}

pub struct ImageRequestHandler {
    provider: ProviderState,
    kind: ProviderKind,
    response_shape: ResponseShape,
}

impl ImageRequestHandler {
    pub fn new(provider: Arc<dyn ImageProvider>, response_shape: ResponseShape) -> Self {
        Self {
            kind: provider.kind(),
            provider: ProviderState::Ready(provider),
            response_shape,
        }
    }

    /// Validates provider settings once. A misconfigured deployment still
    /// answers requests, each with a 500 naming the missing setting.
    pub fn from_config(config: &Config) -> Self {
        let kind = config.provider.kind();
        let provider = match build_provider(&config.provider) {
            Ok(provider) => ProviderState::Ready(provider),
            Err(err) => {
                log::error!("Provider {} is misconfigured: {}", kind, err);
                ProviderState::Misconfigured(err)
            }
        };

        Self {
            provider,
            kind,
            response_shape: config.response_shape,
        }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.provider, ProviderState::Ready(_))
    }

    pub async fn handle(&self, method: &str, body: &[u8]) -> ApiResponse {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        match self.process(method, body, &request_id).await {
            Ok(payload) => {
                log::info!(
                    "[req:{}] 200 in {}ms",
                    request_id,
                    started.elapsed().as_millis()
                );
                ApiResponse::ok(payload)
            }
            Err(err) => {
                let response = ApiResponse::from_error(&err);
                if err.is_client_error() {
                    log::warn!("[req:{}] {} {}", request_id, response.status, err);
                } else {
                    log::error!(
                        "[req:{}] {} {} after {}ms",
                        request_id,
                        response.status,
                        err,
                        started.elapsed().as_millis()
                    );
                }
                response
            }
        }
    }

    async fn process(&self, method: &str, body: &[u8], request_id: &Uuid) -> Result<Value> {
        if method != "POST" {
            return Err(ImagenError::MethodNotAllowed);
        }

        let request = GenerationRequest::from_body(body)?;

        let provider = match &self.provider {
            ProviderState::Ready(provider) => provider,
            ProviderState::Misconfigured(err) => return Err(err.clone()),
        };

        log::info!(
            "[req:{}] generating with {} ({}), prompt length {}",
            request_id,
            provider.kind(),
            provider.model(),
            request.prompt.chars().count()
        );

        let result = provider.generate(&request).await?;
        result.into_body(self.response_shape)
    }
}
