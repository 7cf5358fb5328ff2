pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{OutputFile, MAX_OBJECT_SIZE};

pub use crate::core::{
    fetch::SecretFetcher,
    secret_store::{SecretStore, StoreSettings},
};
pub use utils::error::{
    is_access_denied, is_no_such_key, FetchError, Result, ServiceErrorKind, StorageError,
};
