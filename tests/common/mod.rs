#![allow(dead_code)]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use httpmock::MockServer;

pub const BUCKET: &str = "secrets-bucket";
pub const KMS_KEY_ID: &str = "arn:aws:kms:us-east-1:111122223333:key/1234abcd";
pub const DATA_KEY: [u8; 32] = [0x11; 32];
pub const NONCE: [u8; 12] = [0x22; 12];
pub const WRAPPED_KEY: &[u8] = b"kms-wrapped-data-key-blob";

fn credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG", None, None, "test")
}

pub fn s3_client(server: &MockServer) -> aws_sdk_s3::Client {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(server.base_url())
        .credentials_provider(credentials())
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

pub fn kms_client(server: &MockServer) -> aws_sdk_kms::Client {
    let config = aws_sdk_kms::Config::builder()
        .behavior_version(aws_sdk_kms::config::BehaviorVersion::latest())
        .region(aws_sdk_kms::config::Region::new("us-east-1"))
        .endpoint_url(server.base_url())
        .credentials_provider(aws_sdk_kms::config::Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG",
            None,
            None,
            "test",
        ))
        .build();
    aws_sdk_kms::Client::from_conf(config)
}

pub fn b64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Seals `plaintext` the way the S3 encryption client does, under
/// [`DATA_KEY`] and [`NONCE`].
pub fn seal(plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&DATA_KEY));
    cipher
        .encrypt(Nonce::from_slice(&NONCE), plaintext)
        .expect("encrypt")
}

/// Envelope headers as S3 returns them on GetObject.
pub fn envelope_headers(plaintext_len: usize) -> Vec<(String, String)> {
    vec![
        ("x-amz-meta-x-amz-key-v2".to_string(), b64(WRAPPED_KEY)),
        ("x-amz-meta-x-amz-iv".to_string(), b64(&NONCE)),
        (
            "x-amz-meta-x-amz-matdesc".to_string(),
            format!(r#"{{"kms_cmk_id":"{}"}}"#, KMS_KEY_ID),
        ),
        ("x-amz-meta-x-amz-wrap-alg".to_string(), "kms".to_string()),
        (
            "x-amz-meta-x-amz-cek-alg".to_string(),
            "AES/GCM/NoPadding".to_string(),
        ),
        ("x-amz-meta-x-amz-tag-len".to_string(), "128".to_string()),
        (
            "x-amz-meta-x-amz-unencrypted-content-length".to_string(),
            plaintext_len.to_string(),
        ),
    ]
}

pub fn s3_error_xml(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>{}</Code><Message>{}</Message><RequestId>4442587FB7D0A2F9</RequestId><HostId>test</HostId></Error>"#,
        code, message
    )
}

pub fn list_result_xml(prefix: &str, keys: &[&str]) -> String {
    let contents: String = keys
        .iter()
        .map(|key| {
            format!(
                "<Contents><Key>{}</Key><Size>3</Size><StorageClass>STANDARD</StorageClass></Contents>",
                key
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>{}</Name><Prefix>{}</Prefix><KeyCount>{}</KeyCount><MaxKeys>5</MaxKeys><IsTruncated>false</IsTruncated>{}</ListBucketResult>"#,
        BUCKET,
        prefix,
        keys.len(),
        contents
    )
}
