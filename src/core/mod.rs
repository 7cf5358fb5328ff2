pub mod crypto_client;
pub mod envelope;
pub mod fetch;
pub mod object_path;
pub mod secret_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{DataKey, PutObjectRequest, StoredObject};
pub use crate::domain::ports::{KeyWrapper, ObjectStore, StorageResult};
pub use crate::utils::error::{Result, StorageError};
