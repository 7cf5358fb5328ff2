use crate::core::crypto_client::{collect_body, DecryptionClient, EncryptionClient};
use crate::core::object_path::join_key;
use crate::domain::model::PutObjectRequest;
use crate::domain::ports::{KeyWrapper, ObjectStore, StorageResult};
use crate::utils::error::{self, StorageError};
use aws_config::SdkConfig;
use aws_sdk_kms::Client as KmsClient;
use aws_sdk_s3::Client as S3Client;
use std::sync::Arc;

/// How many keys the emptiness probe asks for.
pub const ROOT_PROBE_MAX_KEYS: i32 = 5;

#[derive(Debug, Clone, Default)]
pub struct StoreSettings {
    pub bucket_name: String,
    pub bucket_prefix: String,
    /// KMS key used to wrap data keys on encrypted puts. `None` leaves the
    /// store able to decrypt but not to encrypt.
    pub key_id: Option<String>,
    pub max_object_size: usize,
}

/// Path-prefixed get/put against one bucket, with and without client-side
/// envelope encryption.
pub struct SecretStore<S = S3Client, K = KmsClient> {
    store: Arc<S>,
    encryption_client: Option<EncryptionClient<S, K>>,
    decryption_client: DecryptionClient<S, K>,
    bucket_name: String,
    bucket_prefix: String,
    max_object_size: usize,
}

impl SecretStore {
    /// Builds S3 and KMS clients from an already loaded session.
    pub fn new(session: &SdkConfig, settings: StoreSettings) -> Self {
        Self::from_parts(S3Client::new(session), KmsClient::new(session), settings)
    }
}

impl<S: ObjectStore, K: KeyWrapper> SecretStore<S, K> {
    pub fn from_parts(store: S, key_wrapper: K, settings: StoreSettings) -> Self {
        let store = Arc::new(store);
        let key_wrapper = Arc::new(key_wrapper);

        let encryption_client = settings
            .key_id
            .filter(|key_id| !key_id.trim().is_empty())
            .map(|key_id| EncryptionClient::new(store.clone(), key_wrapper.clone(), key_id));
        let decryption_client = DecryptionClient::new(store.clone(), key_wrapper);

        Self {
            store,
            encryption_client,
            decryption_client,
            bucket_name: settings.bucket_name,
            bucket_prefix: settings.bucket_prefix,
            max_object_size: settings.max_object_size,
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn can_encrypt(&self) -> bool {
        self.encryption_client.is_some()
    }

    /// The storage key for `object_path` under this store's prefix.
    pub fn object_key(&self, object_path: &str) -> String {
        join_key(&self.bucket_prefix, object_path)
    }

    /// True when nothing at all lives under the prefix.
    pub async fn is_root_path_empty(&self) -> StorageResult<bool> {
        let count = self
            .store
            .count_keys(&self.bucket_name, &self.bucket_prefix, ROOT_PROBE_MAX_KEYS)
            .await?;
        tracing::debug!(
            "Found {} key(s) under s3://{}/{}",
            count,
            self.bucket_name,
            self.bucket_prefix
        );
        Ok(count == 0)
    }

    pub async fn put_encrypted_object(&self, object_path: &str, data: &[u8]) -> StorageResult<()> {
        let encryption_client = self
            .encryption_client
            .as_ref()
            .ok_or(StorageError::EncryptionNotConfigured)?;

        let key = self.object_key(object_path);
        tracing::debug!(
            "Putting encrypted object s3://{}/{} with key {}",
            self.bucket_name,
            key,
            encryption_client.key_id()
        );
        let request = PutObjectRequest::private(&self.bucket_name, key, data.to_vec());
        encryption_client.put_object(request).await
    }

    pub async fn get_encrypted_object(&self, object_path: &str) -> StorageResult<Vec<u8>> {
        let key = self.object_key(object_path);
        tracing::debug!("Getting encrypted object s3://{}/{}", self.bucket_name, key);

        let object = self
            .decryption_client
            .get_object(&self.bucket_name, &key)
            .await?;
        self.check_size(&key, object.content_length)?;
        object.collect().await
    }

    pub async fn get_unencrypted_object(&self, object_path: &str) -> StorageResult<Vec<u8>> {
        let key = self.object_key(object_path);
        tracing::debug!("Getting object s3://{}/{}", self.bucket_name, key);

        let object = self.store.fetch_object(&self.bucket_name, &key).await?;
        self.check_size(&key, object.content_length)?;
        collect_body(object.body).await
    }

    pub async fn put_unencrypted_object(&self, object_path: &str, data: &[u8]) -> StorageResult<()> {
        let key = self.object_key(object_path);
        tracing::debug!(
            "Putting object s3://{}/{} ({} bytes)",
            self.bucket_name,
            key,
            data.len()
        );
        let request = PutObjectRequest::private(&self.bucket_name, key, data.to_vec());
        self.store.store_object(request).await
    }

    pub fn is_no_such_key(&self, err: &(dyn std::error::Error + 'static)) -> bool {
        error::is_no_such_key(err)
    }

    pub fn is_access_denied(&self, err: &(dyn std::error::Error + 'static)) -> bool {
        error::is_access_denied(err)
    }

    // The body stream is still unread here; returning early drops it.
    fn check_size(&self, key: &str, content_length: Option<i64>) -> StorageResult<()> {
        let size = content_length.ok_or_else(|| StorageError::MissingContentLength {
            key: key.to_string(),
        })?;
        if size < 0 || size as u64 > self.max_object_size as u64 {
            tracing::warn!(
                "Refusing to read {}: {} bytes exceeds limit of {}",
                key,
                size,
                self.max_object_size
            );
            return Err(StorageError::ObjectTooLarge {
                size,
                max: self.max_object_size,
            });
        }
        Ok(())
    }
}
