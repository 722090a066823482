use chrono::{DateTime, Utc};

use crate::domain::TokenType;

use super::BlacklistStoreError;

/// Bookkeeping for a revocable token issued by this engine.
#[derive(Clone, Debug, PartialEq)]
pub struct OutstandingToken {
    pub jti: String,
    pub identity: String,
    pub token_type: TokenType,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Revocation capability. Implementations own their own synchronization:
/// `blacklist` must be an atomic check-and-set so that two concurrent
/// rotations of one refresh token cannot both succeed.
#[async_trait::async_trait]
pub trait BlacklistStore: Send + Sync {
    async fn record_outstanding(&self, token: OutstandingToken) -> Result<(), BlacklistStoreError>;

    async fn is_blacklisted(&self, jti: &str) -> Result<bool, BlacklistStoreError>;

    /// Fails with `AlreadyBlacklisted` if `jti` was blacklisted before this call.
    async fn blacklist(&self, jti: &str) -> Result<(), BlacklistStoreError>;

    async fn outstanding_for(&self, identity: &str) -> Result<Vec<String>, BlacklistStoreError>;

    /// Drops bookkeeping for tokens that can no longer validate anyway.
    /// Returns the number of outstanding records removed.
    async fn flush_expired(&self, now: DateTime<Utc>) -> Result<usize, BlacklistStoreError>;
}
