use rimagen::{logger, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_dotenv(logger::LoggerConfig::from_env())?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    logger::log_config_info(&config);

    rimagen::server::run(config).await?;
    Ok(())
}
