use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::collections::HashMap;

/// A fetched object whose body has not been collected yet.
#[derive(Debug)]
pub struct StoredObject {
    pub content_length: Option<i64>,
    pub metadata: HashMap<String, String>,
    pub body: ByteStream,
}

#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub acl: ObjectCannedAcl,
    pub body: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

impl PutObjectRequest {
    pub fn private(bucket: &str, key: String, body: Vec<u8>) -> Self {
        Self {
            bucket: bucket.to_string(),
            key,
            acl: ObjectCannedAcl::Private,
            body,
            metadata: HashMap::new(),
        }
    }
}

/// A freshly generated data key: plaintext for the content cipher and the
/// KMS-wrapped copy stored next to the ciphertext.
pub struct DataKey {
    pub plaintext: Vec<u8>,
    pub wrapped: Vec<u8>,
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataKey")
            .field("plaintext", &"<redacted>")
            .field("wrapped_len", &self.wrapped.len())
            .finish()
    }
}
