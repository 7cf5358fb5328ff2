use crate::domain::model::DataKey;
use crate::domain::ports::{KeyWrapper, StorageResult};
use crate::utils::error::StorageError;
use async_trait::async_trait;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::DataKeySpec;
use aws_sdk_kms::Client as KmsClient;
use std::collections::HashMap;

#[async_trait]
impl KeyWrapper for KmsClient {
    async fn new_data_key(
        &self,
        key_id: &str,
        context: &HashMap<String, String>,
    ) -> StorageResult<DataKey> {
        let resp = self
            .generate_data_key()
            .key_id(key_id)
            .key_spec(DataKeySpec::Aes256)
            .set_encryption_context(Some(context.clone()))
            .send()
            .await
            .map_err(|e| StorageError::from_sdk("GenerateDataKey", e))?;

        let plaintext = resp
            .plaintext()
            .ok_or_else(|| StorageError::Cipher {
                message: "GenerateDataKey returned no plaintext key".to_string(),
            })?
            .as_ref()
            .to_vec();
        let wrapped = resp
            .ciphertext_blob()
            .ok_or_else(|| StorageError::Cipher {
                message: "GenerateDataKey returned no wrapped key".to_string(),
            })?
            .as_ref()
            .to_vec();

        Ok(DataKey { plaintext, wrapped })
    }

    async fn unwrap_data_key(
        &self,
        key_id: Option<&str>,
        wrapped: &[u8],
        context: &HashMap<String, String>,
    ) -> StorageResult<Vec<u8>> {
        let resp = self
            .decrypt()
            .set_key_id(key_id.map(str::to_owned))
            .ciphertext_blob(Blob::new(wrapped))
            .set_encryption_context(Some(context.clone()))
            .send()
            .await
            .map_err(|e| StorageError::from_sdk("Decrypt", e))?;

        resp.plaintext()
            .map(|key| key.as_ref().to_vec())
            .ok_or_else(|| StorageError::envelope("KMS Decrypt returned no plaintext key"))
    }
}
