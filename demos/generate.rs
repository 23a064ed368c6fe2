use base64::{engine::general_purpose::STANDARD, Engine as _};
use rimagen::{build_provider, logger, Config, GenerationRequest, ImageProvider};
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_dotenv(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Info),
    )?;

    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.trim().is_empty() {
        "a red fox in a snowy forest at dawn".to_string()
    } else {
        prompt
    };

    let config = Config::from_env()?;
    logger::log_config_info(&config);

    let provider = build_provider(&config.provider)?;
    let result = provider.generate(&GenerationRequest::new(prompt)).await?;
    log::info!("{} returned {} image(s)", result.model, result.images.len());

    for (index, encoded) in result.images.iter().enumerate() {
        let filename = format!("generated_image_{}.png", index + 1);
        match STANDARD.decode(encoded) {
            Ok(bytes) => {
                fs::write(&filename, bytes)?;
                log::info!("Saved {}", filename);
            }
            Err(e) => log::error!("Failed to decode image {}: {}", index + 1, e),
        }
    }

    Ok(())
}
