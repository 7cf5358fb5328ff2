use crate::config::OutputFile;
use crate::core::secret_store::SecretStore;
use crate::domain::ports::{KeyWrapper, ObjectStore};
use crate::utils::error::Result;

/// Fetches one encrypted secret and writes the plaintext to a local file.
pub struct SecretFetcher<S, K> {
    store: SecretStore<S, K>,
}

impl<S: ObjectStore, K: KeyWrapper> SecretFetcher<S, K> {
    pub fn new(store: SecretStore<S, K>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SecretStore<S, K> {
        &self.store
    }

    /// Nothing touches the output file until the object has been fetched
    /// and decrypted in full.
    pub async fn run(&self, secret_key: &str, output: &OutputFile) -> Result<usize> {
        tracing::info!(
            "Fetching s3://{}/{}",
            self.store.bucket_name(),
            self.store.object_key(secret_key)
        );
        let secret = self.store.get_encrypted_object(secret_key).await?;
        tracing::debug!("Decrypted {} bytes", secret.len());

        output.write_private(&secret)?;
        tracing::info!(
            "Wrote {} bytes to {}",
            secret.len(),
            output.path().display()
        );
        Ok(secret.len())
    }
}
