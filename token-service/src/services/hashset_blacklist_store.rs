use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::data_stores::{BlacklistStore, BlacklistStoreError, OutstandingToken};

#[derive(Default)]
struct Inner {
    // jti -> record
    outstanding: HashMap<String, OutstandingToken>,
    blacklisted: HashSet<String>,
}

/// In-process blacklist. One lock guards both sets, so `blacklist` is an
/// atomic check-and-set.
#[derive(Default)]
pub struct HashsetBlacklistStore {
    inner: RwLock<Inner>,
}

impl HashsetBlacklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outstanding_count(&self) -> usize {
        self.inner.read().await.outstanding.len()
    }

    pub async fn blacklisted_count(&self) -> usize {
        self.inner.read().await.blacklisted.len()
    }
}

#[async_trait::async_trait]
impl BlacklistStore for HashsetBlacklistStore {
    async fn record_outstanding(&self, token: OutstandingToken) -> Result<(), BlacklistStoreError> {
        let mut inner = self.inner.write().await;
        inner.outstanding.insert(token.jti.clone(), token);
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, BlacklistStoreError> {
        Ok(self.inner.read().await.blacklisted.contains(jti))
    }

    async fn blacklist(&self, jti: &str) -> Result<(), BlacklistStoreError> {
        let mut inner = self.inner.write().await;
        if inner.blacklisted.insert(jti.to_string()) {
            Ok(())
        } else {
            Err(BlacklistStoreError::AlreadyBlacklisted)
        }
    }

    async fn outstanding_for(&self, identity: &str) -> Result<Vec<String>, BlacklistStoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .outstanding
            .values()
            .filter(|t| t.identity == identity)
            .map(|t| t.jti.clone())
            .collect())
    }

    async fn flush_expired(&self, now: DateTime<Utc>) -> Result<usize, BlacklistStoreError> {
        let mut inner = self.inner.write().await;
        let expired: Vec<String> = inner
            .outstanding
            .values()
            .filter(|t| t.expires_at <= now)
            .map(|t| t.jti.clone())
            .collect();
        for jti in &expired {
            inner.outstanding.remove(jti);
            inner.blacklisted.remove(jti);
        }
        Ok(expired.len())
    }
}
