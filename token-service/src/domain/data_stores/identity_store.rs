use crate::domain::Identity;

use super::IdentityStoreError;

#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_identifier(&self, id: &str) -> Result<Identity, IdentityStoreError>;

    fn is_active(&self, identity: &Identity) -> bool {
        identity.is_active
    }

    /// Login-time credential check. Inactive identities fail like unknown ones.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, IdentityStoreError>;
}
