use super::{
    auth::{ServiceAccountKey, ServiceAccountTokenSource, TokenSource},
    fallback::classify_failure,
    read_json_response, ImageProvider,
};
use crate::{
    config::VertexConfig,
    error::{ImagenError, Result},
    logger,
    models::{
        extract_predictions, predict_payload, GenerationRequest, GenerationResult, ProviderKind,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct VertexClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    endpoint_base: String,
    project_id: String,
    region: String,
    primary_model: String,
    fallback_model: String,
}

impl VertexClient {
    /// Builds a client that authenticates with the configured service-account key.
    pub fn from_config(config: &VertexConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let raw_key = config.credentials_json.as_deref().ok_or_else(|| {
            ImagenError::MissingConfig("GOOGLE_APPLICATION_CREDENTIALS_JSON".into())
        })?;
        let key = ServiceAccountKey::from_json(raw_key)?;
        log::info!("Vertex credentials loaded for {}", key.client_email);

        let tokens = Arc::new(ServiceAccountTokenSource::new(key, http.clone()));
        Self::with_token_source(config, http, tokens)
    }

    pub fn with_token_source(
        config: &VertexConfig,
        http: reqwest::Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ImagenError::MissingConfig("GOOGLE_PROJECT_ID".into()))?;

        Ok(Self {
            http,
            tokens,
            endpoint_base: config.endpoint_base(),
            project_id,
            region: config.region.clone(),
            primary_model: config.primary_model.clone(),
            fallback_model: config.fallback_model.clone(),
        })
    }

    fn predict_url(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.endpoint_base, self.project_id, self.region, model
        )
    }

    async fn predict(&self, model: &str, prompt: &str, token: &str) -> Result<Vec<String>> {
        log::info!("Generating image with model: {}", model);
        let _timer = logger::timer(&format!("predict {}", model));

        let response = self
            .http
            .post(self.predict_url(model))
            .bearer_auth(token)
            .json(&predict_payload(prompt))
            .send()
            .await
            .map_err(|e| {
                log::error!("predict request to {} failed: {}", model, e);
                ImagenError::from(e)
            })?;

        let body = read_json_response(response).await?;
        Ok(extract_predictions(&body))
    }

    async fn predict_fallback(&self, prompt: &str, token: &str) -> Result<GenerationResult> {
        let images = self.predict(&self.fallback_model, prompt, token).await?;
        if images.is_empty() {
            log::error!("Fallback model {} returned no image", self.fallback_model);
            return Err(ImagenError::NoImage {
                model: self.fallback_model.clone(),
            });
        }
        Ok(GenerationResult::new(images, self.fallback_model.clone()))
    }
}

#[async_trait]
impl ImageProvider for VertexClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Vertex
    }

    fn model(&self) -> &str {
        &self.primary_model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let token = self.tokens.access_token().await?;

        match self.predict(&self.primary_model, &request.prompt, &token).await {
            Ok(images) if !images.is_empty() => {
                Ok(GenerationResult::new(images, self.primary_model.clone()))
            }
            Ok(_) => Err(ImagenError::NoImage {
                model: self.primary_model.clone(),
            }),
            Err(err) => {
                let class = classify_failure(&err);
                if !class.allows_fallback() {
                    return Err(err);
                }
                log::warn!(
                    "Primary model {} failed ({}): {}; retrying with {}",
                    self.primary_model,
                    class.as_str(),
                    err,
                    self.fallback_model
                );
                self.predict_fallback(&request.prompt, &token).await
            }
        }
    }
}
