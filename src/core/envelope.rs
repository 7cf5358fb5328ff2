//! Object metadata layout written by the S3 encryption clients (v2 envelope).
//!
//! The wrapped data key, the nonce and the algorithm names travel as S3 user
//! metadata next to the ciphertext, so any encryption client that speaks the
//! same layout can read objects written here and the other way round.

use crate::utils::error::StorageError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const KEY_V2_HEADER: &str = "x-amz-key-v2";
pub const LEGACY_KEY_HEADER: &str = "x-amz-key";
pub const IV_HEADER: &str = "x-amz-iv";
pub const MATDESC_HEADER: &str = "x-amz-matdesc";
pub const WRAP_ALG_HEADER: &str = "x-amz-wrap-alg";
pub const CEK_ALG_HEADER: &str = "x-amz-cek-alg";
pub const TAG_LEN_HEADER: &str = "x-amz-tag-len";
pub const UNENCRYPTED_LENGTH_HEADER: &str = "x-amz-unencrypted-content-length";

pub const AES_GCM_CEK_ALGORITHM: &str = "AES/GCM/NoPadding";
pub const KMS_WRAP_ALGORITHM: &str = "kms";
pub const KMS_CONTEXT_WRAP_ALGORITHM: &str = "kms+context";
pub const GCM_TAG_LENGTH_BITS: u32 = 128;
pub const GCM_NONCE_LENGTH: usize = 12;

const KMS_KEY_ID_FIELD: &str = "kms_cmk_id";
const CEK_ALGORITHM_CONTEXT_FIELD: &str = "aws:x-amz-cek-alg";

/// The material description, which doubles as the KMS encryption context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialDescription(BTreeMap<String, String>);

impl MaterialDescription {
    pub fn for_kms_key(key_id: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(KMS_KEY_ID_FIELD.to_string(), key_id.to_string());
        Self(fields)
    }

    pub fn kms_key_id(&self) -> Option<&str> {
        self.0.get(KMS_KEY_ID_FIELD).map(String::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn encryption_context(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub wrapped_key: Vec<u8>,
    pub iv: Vec<u8>,
    pub material: MaterialDescription,
    pub wrap_algorithm: String,
    pub unencrypted_length: Option<u64>,
}

impl Envelope {
    pub fn to_metadata(&self) -> HashMap<String, String> {
        let matdesc = serde_json::to_string(&self.material).unwrap_or_else(|_| "{}".to_string());

        let mut metadata = HashMap::new();
        metadata.insert(KEY_V2_HEADER.to_string(), STANDARD.encode(&self.wrapped_key));
        metadata.insert(IV_HEADER.to_string(), STANDARD.encode(&self.iv));
        metadata.insert(MATDESC_HEADER.to_string(), matdesc);
        metadata.insert(WRAP_ALG_HEADER.to_string(), self.wrap_algorithm.clone());
        metadata.insert(
            CEK_ALG_HEADER.to_string(),
            AES_GCM_CEK_ALGORITHM.to_string(),
        );
        metadata.insert(
            TAG_LEN_HEADER.to_string(),
            GCM_TAG_LENGTH_BITS.to_string(),
        );
        if let Some(length) = self.unencrypted_length {
            metadata.insert(UNENCRYPTED_LENGTH_HEADER.to_string(), length.to_string());
        }
        metadata
    }

    /// Parses the envelope out of object metadata. Header names are matched
    /// case-insensitively.
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self, StorageError> {
        let headers: HashMap<String, &str> = metadata
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.as_str()))
            .collect();

        let wrapped_key = match headers.get(KEY_V2_HEADER) {
            Some(value) => decode_base64(KEY_V2_HEADER, value)?,
            None if headers.contains_key(LEGACY_KEY_HEADER) => {
                return Err(StorageError::envelope(
                    "legacy v1 envelope (x-amz-key) is not supported",
                ))
            }
            None => {
                return Err(StorageError::envelope(
                    "object has no client-side encryption metadata",
                ))
            }
        };

        let iv = match headers.get(IV_HEADER) {
            Some(value) => decode_base64(IV_HEADER, value)?,
            None => return Err(StorageError::envelope("missing x-amz-iv")),
        };
        if iv.len() != GCM_NONCE_LENGTH {
            return Err(StorageError::envelope(format!(
                "nonce must be {} bytes, got {}",
                GCM_NONCE_LENGTH,
                iv.len()
            )));
        }

        let material = match headers.get(MATDESC_HEADER) {
            Some(value) => serde_json::from_str(value).map_err(|e| {
                StorageError::envelope(format!("malformed x-amz-matdesc: {}", e))
            })?,
            None => MaterialDescription::default(),
        };

        let cek_algorithm = headers.get(CEK_ALG_HEADER).copied().unwrap_or_default();
        if cek_algorithm != AES_GCM_CEK_ALGORITHM {
            return Err(StorageError::envelope(format!(
                "unsupported content cipher {:?}",
                cek_algorithm
            )));
        }

        if let Some(tag_len) = headers.get(TAG_LEN_HEADER) {
            if tag_len.trim() != GCM_TAG_LENGTH_BITS.to_string() {
                return Err(StorageError::envelope(format!(
                    "unsupported tag length {:?}",
                    tag_len
                )));
            }
        }

        let wrap_algorithm = headers.get(WRAP_ALG_HEADER).copied().unwrap_or_default();
        match wrap_algorithm {
            KMS_WRAP_ALGORITHM => {}
            KMS_CONTEXT_WRAP_ALGORITHM => {
                if material.get(CEK_ALGORITHM_CONTEXT_FIELD) != Some(cek_algorithm) {
                    return Err(StorageError::envelope(
                        "kms+context envelope does not bind the content cipher",
                    ));
                }
            }
            other => {
                return Err(StorageError::envelope(format!(
                    "unsupported key wrap algorithm {:?}",
                    other
                )))
            }
        }

        let unencrypted_length = headers
            .get(UNENCRYPTED_LENGTH_HEADER)
            .and_then(|value| value.trim().parse().ok());

        Ok(Self {
            wrapped_key,
            iv,
            material,
            wrap_algorithm: wrap_algorithm.to_string(),
            unencrypted_length,
        })
    }
}

fn decode_base64(header: &str, value: &str) -> Result<Vec<u8>, StorageError> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| StorageError::envelope(format!("{} is not valid base64: {}", header, e)))
}
