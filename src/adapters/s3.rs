use crate::domain::model::{PutObjectRequest, StoredObject};
use crate::domain::ports::{ObjectStore, StorageResult};
use crate::utils::error::StorageError;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[async_trait]
impl ObjectStore for S3Client {
    async fn count_keys(&self, bucket: &str, prefix: &str, max_keys: i32) -> StorageResult<usize> {
        let resp = self
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(max_keys)
            .send()
            .await
            .map_err(|e| StorageError::from_sdk("ListObjectsV2", e))?;

        // KeyCount is absent on some S3-compatible services.
        let count = match resp.key_count() {
            Some(count) => count.max(0) as usize,
            None => resp.contents().len(),
        };
        Ok(count)
    }

    async fn fetch_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        let resp = self
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::from_sdk("GetObject", e))?;

        let content_length = resp.content_length();
        let metadata = resp.metadata().cloned().unwrap_or_default();
        Ok(StoredObject {
            content_length,
            metadata,
            body: resp.body,
        })
    }

    async fn store_object(&self, request: PutObjectRequest) -> StorageResult<()> {
        let mut builder = self
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .acl(request.acl)
            .body(ByteStream::from(request.body));
        for (name, value) in request.metadata {
            builder = builder.metadata(name, value);
        }

        builder
            .send()
            .await
            .map_err(|e| StorageError::from_sdk("PutObject", e))?;
        Ok(())
    }
}
