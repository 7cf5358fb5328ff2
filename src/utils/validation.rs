use crate::utils::error::{FetchError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_required_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FetchError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_path(field_name: &str, path: &str) -> Result<()> {
    validate_required_string(field_name, path)?;

    if path.contains('\0') {
        return Err(FetchError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    if Path::new(path).is_dir() {
        return Err(FetchError::ConfigError {
            message: format!("--output-file {:?} is a directory", path),
        });
    }

    Ok(())
}
