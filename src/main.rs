use clap::Parser;
use s3_secret_fetch::adapters::session;
use s3_secret_fetch::utils::{logger, validation::Validate};
use s3_secret_fetch::{CliConfig, OutputFile, SecretFetcher, SecretStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.json_logs);

    tracing::info!("Starting s3-secret-fetch");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // Fail on bad flags before any network activity.
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let aws_session = session::load_session(&config.bucket_region).await;
    let store = SecretStore::new(&aws_session, config.store_settings());
    let fetcher = SecretFetcher::new(store);
    let output = OutputFile::new(&config.output_file);

    match fetcher.run(&config.secret_key, &output).await {
        Ok(written) => {
            tracing::info!("Secret written to {} ({} bytes)", config.output_file, written);
        }
        Err(e) => {
            tracing::error!("Fetch failed: {}", e);
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    }

    Ok(())
}
