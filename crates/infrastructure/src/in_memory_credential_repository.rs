use std::collections::HashMap;

use async_trait::async_trait;
use finguard_application::CredentialRepository;
use finguard_core::AppResult;
use tokio::sync::RwLock;

/// In-memory password hash store.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    hashes: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_password_hash(&self, subject: &str) -> AppResult<Option<String>> {
        Ok(self.hashes.read().await.get(subject).cloned())
    }

    async fn store_password_hash(&self, subject: &str, password_hash: String) -> AppResult<()> {
        self.hashes
            .write()
            .await
            .insert(subject.to_owned(), password_hash);
        Ok(())
    }
}
