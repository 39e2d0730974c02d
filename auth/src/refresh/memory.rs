use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use super::errors::RefreshTokenError;
use super::store::RefreshTokenStore;
use super::token::RefreshTokenRecord;

/// In-process refresh token store.
///
/// Suitable for tests and single-node development setups; records are lost
/// on restart.
#[derive(Debug, Default)]
pub struct MemoryRefreshTokenStore {
    records: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }

    /// Number of stored records, revoked and expired included.
    ///
    /// Lets callers that own the store, such as service-level tests, observe
    /// which sessions a flow created.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no record is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn insert(
        &self,
        record: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.token) {
            return Err(RefreshTokenError::Storage(
                "duplicate refresh token".to_string(),
            ));
        }
        records.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, RefreshTokenError> {
        Ok(self.records.read().await.get(token).cloned())
    }

    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, RefreshTokenError> {
        match self.records.write().await.get_mut(token) {
            Some(record) => {
                record.revoke(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
