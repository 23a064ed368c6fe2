use super::{read_json_response, ImageProvider};
use crate::{
    config::{ApiKeyTransport, GenerativeLanguageConfig},
    error::{ImagenError, Result},
    logger,
    models::{
        extract_generated_images, generate_images_payload, GenerationRequest, GenerationResult,
        ProviderKind,
    },
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct GenerativeLanguageClient {
    http: reqwest::Client,
    api_key: String,
    config: GenerativeLanguageConfig,
}

impl GenerativeLanguageClient {
    pub fn new(config: GenerativeLanguageConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ImagenError::MissingConfig("GOOGLE_API_KEY".into()))?;

        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateImages",
            self.config.api_base, self.config.model
        )
    }
}

#[async_trait]
impl ImageProvider for GenerativeLanguageClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GenerativeLanguage
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let payload = generate_images_payload(
            &request.prompt,
            self.config.number_of_images,
            &self.config.aspect_ratio,
        );

        log::info!("Generating image with model: {}", self.config.model);
        let _timer = logger::timer(&format!("generateImages {}", self.config.model));

        let builder = self.http.post(self.endpoint()).json(&payload);
        let builder = match self.config.api_key_transport {
            ApiKeyTransport::Query => builder.query(&[("key", self.api_key.as_str())]),
            ApiKeyTransport::Header => builder.header("x-goog-api-key", self.api_key.as_str()),
        };

        let response = builder.send().await.map_err(|e| {
            log::error!("generateImages request failed: {}", e);
            ImagenError::from(e)
        })?;

        let body = read_json_response(response).await?;
        let images = extract_generated_images(&body);
        log::info!("Imagen returned {} image(s)", images.len());

        Ok(GenerationResult::new(images, self.config.model.clone()))
    }
}
