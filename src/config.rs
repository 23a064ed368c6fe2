use crate::error::{ImagenError, Result};
use crate::models::{ProviderKind, ResponseShape};
use std::env;

pub const DEFAULT_GENERATIVE_LANGUAGE_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_FALLBACK_MODEL: &str = "imagen-3.0-generate-002";
pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_ROUTE: &str = "/api/imagen";

/// How the API key travels on `:generateImages` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyTransport {
    /// `?key=<API_KEY>`
    Query,
    /// `x-goog-api-key: <API_KEY>`
    Header,
}

impl ApiKeyTransport {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "query" => Ok(ApiKeyTransport::Query),
            "header" => Ok(ApiKeyTransport::Header),
            other => Err(ImagenError::ConfigError(format!(
                "IMAGEN_API_KEY_TRANSPORT must be 'query' or 'header', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerativeLanguageConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub api_key_transport: ApiKeyTransport,
    pub number_of_images: u32,
    pub aspect_ratio: String,
}

impl Default for GenerativeLanguageConfig {
    fn default() -> Self {
        GenerativeLanguageConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_GENERATIVE_LANGUAGE_BASE.to_string(),
            api_key_transport: ApiKeyTransport::Query,
            number_of_images: 1,
            aspect_ratio: "16:9".to_string(),
        }
    }
}

impl GenerativeLanguageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let number_of_images = match lookup("IMAGEN_NUMBER_OF_IMAGES") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ImagenError::ConfigError(format!(
                    "IMAGEN_NUMBER_OF_IMAGES must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => defaults.number_of_images,
        };

        Ok(GenerativeLanguageConfig {
            api_key: lookup("GOOGLE_API_KEY"),
            model: lookup("IMAGEN_MODEL").unwrap_or(defaults.model),
            api_base: lookup("IMAGEN_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            api_key_transport: match lookup("IMAGEN_API_KEY_TRANSPORT") {
                Some(raw) => ApiKeyTransport::parse(&raw)?,
                None => defaults.api_key_transport,
            },
            number_of_images: number_of_images.clamp(1, 4),
            aspect_ratio: lookup("IMAGEN_ASPECT_RATIO").unwrap_or(defaults.aspect_ratio),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key_transport(mut self, transport: ApiKeyTransport) -> Self {
        self.api_key_transport = transport;
        self
    }

    pub fn validate(&self) -> Result<()> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ImagenError::MissingConfig("GOOGLE_API_KEY".into())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub project_id: Option<String>,
    pub credentials_json: Option<String>,
    pub region: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub api_base: Option<String>,
}

impl Default for VertexConfig {
    fn default() -> Self {
        VertexConfig {
            project_id: None,
            credentials_json: None,
            region: DEFAULT_REGION.to_string(),
            primary_model: DEFAULT_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            api_base: None,
        }
    }
}

impl VertexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        VertexConfig {
            project_id: lookup("GOOGLE_PROJECT_ID"),
            credentials_json: lookup("GOOGLE_APPLICATION_CREDENTIALS_JSON"),
            region: lookup("GOOGLE_CLOUD_REGION").unwrap_or(defaults.region),
            primary_model: lookup("IMAGEN_PRIMARY_MODEL").unwrap_or(defaults.primary_model),
            fallback_model: lookup("IMAGEN_FALLBACK_MODEL").unwrap_or(defaults.fallback_model),
            api_base: lookup("VERTEX_API_BASE").map(|base| base.trim_end_matches('/').to_string()),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_credentials_json(mut self, credentials_json: impl Into<String>) -> Self {
        self.credentials_json = Some(credentials_json.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_models(
        mut self,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> Self {
        self.primary_model = primary_model.into();
        self.fallback_model = fallback_model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into().trim_end_matches('/').to_string());
        self
    }

    /// `https://<region>-aiplatform.googleapis.com` unless overridden.
    pub fn endpoint_base(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.region))
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.as_deref().map_or(true, |p| p.trim().is_empty()) {
            return Err(ImagenError::MissingConfig("GOOGLE_PROJECT_ID".into()));
        }
        if self
            .credentials_json
            .as_deref()
            .map_or(true, |c| c.trim().is_empty())
        {
            return Err(ImagenError::MissingConfig(
                "GOOGLE_APPLICATION_CREDENTIALS_JSON".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ProviderConfig {
    GenerativeLanguage(GenerativeLanguageConfig),
    Vertex(VertexConfig),
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::GenerativeLanguage(_) => ProviderKind::GenerativeLanguage,
            ProviderConfig::Vertex(_) => ProviderKind::Vertex,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::GenerativeLanguage(config) => config.validate(),
            ProviderConfig::Vertex(config) => config.validate(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub route: String,
    pub response_shape: ResponseShape,
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            route: DEFAULT_ROUTE.to_string(),
            response_shape: ResponseShape::Images,
            provider: ProviderConfig::GenerativeLanguage(GenerativeLanguageConfig::default()),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the process environment. Malformed values fail here; missing
    /// credentials are left for [`ProviderConfig::validate`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| {
            env::var(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let kind = match lookup("IMAGEN_PROVIDER") {
            Some(raw) => ProviderKind::parse(&raw)?,
            None if lookup("GOOGLE_PROJECT_ID").is_some()
                || lookup("GOOGLE_APPLICATION_CREDENTIALS_JSON").is_some() =>
            {
                ProviderKind::Vertex
            }
            None => ProviderKind::GenerativeLanguage,
        };
        let provider = match kind {
            ProviderKind::GenerativeLanguage => {
                ProviderConfig::GenerativeLanguage(GenerativeLanguageConfig::from_lookup(&lookup)?)
            }
            ProviderKind::Vertex => ProviderConfig::Vertex(VertexConfig::from_lookup(&lookup)),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                ImagenError::ConfigError(format!("PORT must be a valid port number, got '{}'", raw))
            })?,
            None => defaults.port,
        };
        let response_shape = match lookup("IMAGEN_RESPONSE_SHAPE") {
            Some(raw) => ResponseShape::parse(&raw)?,
            None => defaults.response_shape,
        };

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            route: lookup("IMAGEN_ROUTE").unwrap_or(defaults.route),
            response_shape,
            provider,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    pub fn with_response_shape(mut self, shape: ResponseShape) -> Self {
        self.response_shape = shape;
        self
    }

    pub fn with_generative_language(mut self, config: GenerativeLanguageConfig) -> Self {
        self.provider = ProviderConfig::GenerativeLanguage(config);
        self
    }

    pub fn with_vertex(mut self, config: VertexConfig) -> Self {
        self.provider = ProviderConfig::Vertex(config);
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
