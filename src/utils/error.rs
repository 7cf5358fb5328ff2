use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::error::Error as StdError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Closed set of service error classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    NotFound,
    AccessDenied,
    Other,
}

impl ServiceErrorKind {
    pub const NO_SUCH_KEY: &'static str = "NoSuchKey";
    pub const ACCESS_DENIED: &'static str = "AccessDenied";

    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(Self::NO_SUCH_KEY) => Self::NotFound,
            Some(Self::ACCESS_DENIED) => Self::AccessDenied,
            _ => Self::Other,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{operation} failed ({}): {message}", .code.as_deref().unwrap_or("no code"))]
    Service {
        operation: &'static str,
        kind: ServiceErrorKind,
        code: Option<String>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("object too large: {size} bytes (limit {max} bytes)")]
    ObjectTooLarge { size: i64, max: usize },

    #[error("object {key} has no advertised content length")]
    MissingContentLength { key: String },

    #[error("encryption is not configured: no KMS key id was supplied")]
    EncryptionNotConfigured,

    #[error("invalid encryption envelope: {message}")]
    Envelope { message: String },

    #[error("decryption failed: ciphertext did not authenticate")]
    Integrity,

    #[error("encryption failed: {message}")]
    Cipher { message: String },

    #[error("failed to read object body: {message}")]
    Body { message: String },
}

impl StorageError {
    /// Classifies an SDK error by its service error code.
    pub fn from_sdk<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        let code = err.code().map(str::to_owned);
        let message = match err.message() {
            Some(message) => message.to_owned(),
            None => DisplayErrorContext(&err).to_string(),
        };
        Self::Service {
            operation,
            kind: ServiceErrorKind::from_code(code.as_deref()),
            code,
            message,
            source: Some(Box::new(err)),
        }
    }

    /// Builds a service error from a bare code, as a service double would report it.
    pub fn service(operation: &'static str, code: &str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            kind: ServiceErrorKind::from_code(Some(code)),
            code: Some(code.to_string()),
            message: message.into(),
            source: None,
        }
    }

    pub fn envelope(message: impl Into<String>) -> Self {
        Self::Envelope {
            message: message.into(),
        }
    }

    pub fn service_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            Self::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

fn find_service_kind(err: &(dyn StdError + 'static)) -> Option<ServiceErrorKind> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(kind) = err
            .downcast_ref::<StorageError>()
            .and_then(StorageError::service_kind)
        {
            return Some(kind);
        }
        current = err.source();
    }
    None
}

/// True iff `err`, or an error in its source chain, is a service error
/// carrying the `NoSuchKey` code.
pub fn is_no_such_key(err: &(dyn StdError + 'static)) -> bool {
    find_service_kind(err) == Some(ServiceErrorKind::NotFound)
}

/// True iff `err`, or an error in its source chain, is a service error
/// carrying exactly the `AccessDenied` code.
pub fn is_access_denied(err: &(dyn StdError + 'static)) -> bool {
    find_service_kind(err) == Some(ServiceErrorKind::AccessDenied)
}

/// Errors surfaced by the fetch command.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("--{} is required", .field.replace('_', "-"))]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfigValueError { field: String, reason: String },

    #[error("Cannot get object: {0}")]
    StorageError(#[from] StorageError),

    #[error("Cannot write file {path:?}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigError { message } => message.clone(),
            Self::MissingConfigError { .. } => self.to_string(),
            Self::InvalidConfigValueError { field, reason } => {
                format!("--{}: {}", field.replace('_', "-"), reason)
            }
            Self::StorageError(err) if is_no_such_key(err) => {
                "The requested secret does not exist in the bucket".to_string()
            }
            Self::StorageError(err) if is_access_denied(err) => {
                "Access to the bucket or key was denied".to_string()
            }
            Self::StorageError(err) => format!("Cannot get object: {}", err),
            Self::WriteError { path, source } => {
                format!("Cannot write file {:?}: {}", path, source)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Check the command line flags; run with --help for usage"
            }
            Self::StorageError(StorageError::ObjectTooLarge { .. }) => {
                "The object exceeds the size limit for secrets; check the key"
            }
            Self::StorageError(StorageError::Integrity | StorageError::Envelope { .. }) => {
                "The object is not a valid client-side encrypted object"
            }
            Self::StorageError(_) => {
                "Check the bucket name, region, prefix and AWS credentials"
            }
            Self::WriteError { .. } => "Check that the output directory exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
