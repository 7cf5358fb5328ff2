use crate::domain::model::{DataKey, PutObjectRequest, StoredObject};
use crate::utils::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// The subset of the object-storage service the adapter needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the number of keys under `prefix`, looking at no more than `max_keys`.
    async fn count_keys(&self, bucket: &str, prefix: &str, max_keys: i32) -> StorageResult<usize>;
    async fn fetch_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject>;
    async fn store_object(&self, request: PutObjectRequest) -> StorageResult<()>;
}

/// Key-wrapping service used for envelope encryption.
#[async_trait]
pub trait KeyWrapper: Send + Sync {
    async fn new_data_key(
        &self,
        key_id: &str,
        context: &HashMap<String, String>,
    ) -> StorageResult<DataKey>;

    async fn unwrap_data_key(
        &self,
        key_id: Option<&str>,
        wrapped: &[u8],
        context: &HashMap<String, String>,
    ) -> StorageResult<Vec<u8>>;
}
