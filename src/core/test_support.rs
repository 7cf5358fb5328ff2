use crate::domain::model::{DataKey, PutObjectRequest, StoredObject};
use crate::domain::ports::{KeyWrapper, ObjectStore, StorageResult};
use crate::utils::error::StorageError;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub body: Vec<u8>,
    pub acl: ObjectCannedAcl,
    pub metadata: HashMap<String, String>,
}

#[derive(Default)]
struct MemoryState {
    objects: BTreeMap<(String, String), MemoryObject>,
    hide_content_length: bool,
    next_error: Option<StorageError>,
    last_max_keys: Option<i32>,
}

/// Bucket double keeping objects in memory.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<MemoryObject> {
        let state = self.state.lock().await;
        state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub async fn modify(&self, bucket: &str, key: &str, f: impl FnOnce(&mut MemoryObject)) {
        let mut state = self.state.lock().await;
        if let Some(object) = state
            .objects
            .get_mut(&(bucket.to_string(), key.to_string()))
        {
            f(object);
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.objects.len()
    }

    pub async fn hide_content_length(&self) {
        self.state.lock().await.hide_content_length = true;
    }

    pub async fn fail_next_with(&self, err: StorageError) {
        self.state.lock().await.next_error = Some(err);
    }

    pub async fn last_max_keys(&self) -> Option<i32> {
        self.state.lock().await.last_max_keys
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn count_keys(&self, bucket: &str, prefix: &str, max_keys: i32) -> StorageResult<usize> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        state.last_max_keys = Some(max_keys);

        let count = state
            .objects
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .take(max_keys.max(0) as usize)
            .count();
        Ok(count)
    }

    async fn fetch_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        let object = state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| {
                StorageError::service("GetObject", "NoSuchKey", "The specified key does not exist.")
            })?;
        let content_length = if state.hide_content_length {
            None
        } else {
            Some(object.body.len() as i64)
        };

        Ok(StoredObject {
            content_length,
            metadata: object.metadata,
            body: ByteStream::from(object.body),
        })
    }

    async fn store_object(&self, request: PutObjectRequest) -> StorageResult<()> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        state.objects.insert(
            (request.bucket, request.key),
            MemoryObject {
                body: request.body,
                acl: request.acl,
                metadata: request.metadata,
            },
        );
        Ok(())
    }
}

/// KMS double: wraps data keys under one fixed master key with the
/// encryption context bound as associated data. Every instance behaves like
/// the same KMS account.
#[derive(Clone)]
pub struct MemoryKeyWrapper {
    master: Aes256Gcm,
}

impl MemoryKeyWrapper {
    pub fn new() -> Self {
        Self {
            master: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&[0x42; 32])),
        }
    }

    fn aad(key_id: &str, context: &HashMap<String, String>) -> Vec<u8> {
        let sorted: BTreeMap<&String, &String> = context.iter().collect();
        let mut aad = key_id.as_bytes().to_vec();
        aad.extend(serde_json::to_vec(&sorted).unwrap_or_default());
        aad
    }
}

#[async_trait]
impl KeyWrapper for MemoryKeyWrapper {
    async fn new_data_key(
        &self,
        key_id: &str,
        context: &HashMap<String, String>,
    ) -> StorageResult<DataKey> {
        let plaintext = Aes256Gcm::generate_key(&mut OsRng).to_vec();
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let aad = Self::aad(key_id, context);
        let sealed = self
            .master
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: &aad,
                },
            )
            .map_err(|_| StorageError::Cipher {
                message: "wrap failed".to_string(),
            })?;

        let mut wrapped = key_id.as_bytes().to_vec();
        wrapped.push(0);
        wrapped.extend_from_slice(&nonce);
        wrapped.extend(sealed);
        Ok(DataKey { plaintext, wrapped })
    }

    async fn unwrap_data_key(
        &self,
        key_id: Option<&str>,
        wrapped: &[u8],
        context: &HashMap<String, String>,
    ) -> StorageResult<Vec<u8>> {
        let invalid = || {
            StorageError::service(
                "Decrypt",
                "InvalidCiphertextException",
                "ciphertext or encryption context does not match",
            )
        };

        let split = wrapped.iter().position(|b| *b == 0).ok_or_else(invalid)?;
        let wrapping_key_id = std::str::from_utf8(&wrapped[..split]).map_err(|_| invalid())?;
        if key_id.is_some_and(|requested| requested != wrapping_key_id) {
            return Err(StorageError::service(
                "Decrypt",
                "IncorrectKeyException",
                "key id does not match the ciphertext",
            ));
        }

        let rest = &wrapped[split + 1..];
        if rest.len() < 12 {
            return Err(invalid());
        }
        let (nonce, sealed) = rest.split_at(12);
        let aad = Self::aad(wrapping_key_id, context);
        self.master
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &aad,
                },
            )
            .map_err(|_| invalid())
    }
}
