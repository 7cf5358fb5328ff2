use crate::core::envelope::{Envelope, MaterialDescription, KMS_WRAP_ALGORITHM};
use crate::domain::model::PutObjectRequest;
use crate::domain::ports::{KeyWrapper, ObjectStore, StorageResult};
use crate::utils::error::StorageError;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use aws_sdk_s3::primitives::ByteStream;
use std::sync::Arc;

/// Writes objects under a fresh KMS data key per object, AES-256-GCM over
/// the body, envelope in the object metadata.
pub struct EncryptionClient<S, K> {
    store: Arc<S>,
    key_wrapper: Arc<K>,
    key_id: String,
}

impl<S: ObjectStore, K: KeyWrapper> EncryptionClient<S, K> {
    pub fn new(store: Arc<S>, key_wrapper: Arc<K>, key_id: String) -> Self {
        Self {
            store,
            key_wrapper,
            key_id,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub async fn put_object(&self, mut request: PutObjectRequest) -> StorageResult<()> {
        let material = MaterialDescription::for_kms_key(&self.key_id);
        let data_key = self
            .key_wrapper
            .new_data_key(&self.key_id, &material.encryption_context())
            .await?;

        let cipher = Aes256Gcm::new_from_slice(&data_key.plaintext).map_err(|_| {
            StorageError::Cipher {
                message: format!(
                    "data key must be 32 bytes, got {}",
                    data_key.plaintext.len()
                ),
            }
        })?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let plaintext_len = request.body.len() as u64;
        let ciphertext = cipher
            .encrypt(&nonce, request.body.as_slice())
            .map_err(|_| StorageError::Cipher {
                message: "AES-GCM encryption failed".to_string(),
            })?;

        let envelope = Envelope {
            wrapped_key: data_key.wrapped,
            iv: nonce.to_vec(),
            material,
            wrap_algorithm: KMS_WRAP_ALGORITHM.to_string(),
            unencrypted_length: Some(plaintext_len),
        };
        request.metadata.extend(envelope.to_metadata());
        request.body = ciphertext;

        tracing::debug!(
            "Writing encrypted object {} ({} plaintext bytes)",
            request.key,
            plaintext_len
        );
        self.store.store_object(request).await
    }
}

/// Reads objects written by [`EncryptionClient`] or any other encryption
/// client using the same envelope layout.
pub struct DecryptionClient<S, K> {
    store: Arc<S>,
    key_wrapper: Arc<K>,
}

impl<S: ObjectStore, K: KeyWrapper> DecryptionClient<S, K> {
    pub fn new(store: Arc<S>, key_wrapper: Arc<K>) -> Self {
        Self { store, key_wrapper }
    }

    /// Fetches the object and unwraps its data key. The body is left
    /// uncollected so the caller can check the advertised length first.
    pub async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<DecryptedObject> {
        let object = self.store.fetch_object(bucket, key).await?;
        let envelope = Envelope::from_metadata(&object.metadata)?;

        let data_key = self
            .key_wrapper
            .unwrap_data_key(
                envelope.material.kms_key_id(),
                &envelope.wrapped_key,
                &envelope.material.encryption_context(),
            )
            .await?;
        let cipher = Aes256Gcm::new_from_slice(&data_key)
            .map_err(|_| StorageError::envelope("unwrapped data key is not 256 bits"))?;

        Ok(DecryptedObject {
            content_length: object.content_length,
            body: object.body,
            cipher,
            iv: envelope.iv,
        })
    }
}

pub struct DecryptedObject {
    pub content_length: Option<i64>,
    body: ByteStream,
    cipher: Aes256Gcm,
    iv: Vec<u8>,
}

impl DecryptedObject {
    /// Collects the body, then verifies the tag and decrypts it.
    pub async fn collect(self) -> StorageResult<Vec<u8>> {
        let ciphertext = collect_body(self.body).await?;
        self.cipher
            .decrypt(Nonce::from_slice(&self.iv), ciphertext.as_slice())
            .map_err(|_| StorageError::Integrity)
    }
}

pub(crate) async fn collect_body(body: ByteStream) -> StorageResult<Vec<u8>> {
    let data = body.collect().await.map_err(|e| StorageError::Body {
        message: e.to_string(),
    })?;
    Ok(data.into_bytes().to_vec())
}
