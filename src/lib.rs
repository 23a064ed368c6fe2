pub mod config;
pub mod error;
pub mod google;
pub mod handler;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;

pub use config::{
    ApiKeyTransport, Config, GenerativeLanguageConfig, ProviderConfig, VertexConfig,
};
pub use error::{ImagenError, Result};
pub use google::{
    build_provider, classify_failure, FailureClass, GenerativeLanguageClient, ImageProvider,
    StaticTokenSource, TokenSource, VertexClient,
};
pub use handler::{ApiResponse, ImageRequestHandler};
pub use models::*;
