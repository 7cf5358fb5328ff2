use crate::config::MAX_OBJECT_SIZE;
use crate::core::secret_store::StoreSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_output_path, validate_required_string, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "s3-secret-fetch")]
#[command(about = "Fetch a client-side encrypted secret from S3 and write it to a file")]
pub struct CliConfig {
    /// Name of the bucket
    #[arg(long, default_value = "")]
    pub bucket_name: String,

    /// Bucket prefix
    #[arg(long, default_value = "")]
    pub bucket_prefix: String,

    /// Bucket region
    #[arg(long, default_value = "")]
    pub bucket_region: String,

    /// Key to secret in bucket
    #[arg(long, default_value = "")]
    pub secret_key: String,

    /// Path to which to write
    #[arg(long, default_value = "")]
    pub output_file: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Settings for a decrypt-only store: no KMS key id is configured.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            bucket_name: self.bucket_name.clone(),
            bucket_prefix: self.bucket_prefix.clone(),
            key_id: None,
            max_object_size: MAX_OBJECT_SIZE,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_required_string("bucket_name", &self.bucket_name)?;
        validate_required_string("bucket_region", &self.bucket_region)?;
        validate_required_string("secret_key", &self.secret_key)?;
        validate_output_path("output_file", &self.output_file)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
