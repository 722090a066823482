use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::data_stores::{IdentityStore, IdentityStoreError};
use crate::domain::Identity;

/// In-process identity store keyed by id, with argon2 password hashes.
#[derive(Default)]
pub struct HashmapIdentityStore {
    identities: RwLock<HashMap<String, Identity>>,
}

impl HashmapIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new identity with a fresh id.
    pub async fn add_identity(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, IdentityStoreError> {
        let password_hash = hash_password(password).await?;
        let mut identities = self.identities.write().await;
        if identities.values().any(|i| i.username == username) {
            return Err(IdentityStoreError::AlreadyExists);
        }
        let identity = Identity::new(Uuid::new_v4().to_string(), username, password_hash);
        identities.insert(identity.id.clone(), identity.clone());
        Ok(identity)
    }

    pub async fn set_active(&self, id: &str, active: bool) -> Result<(), IdentityStoreError> {
        let mut identities = self.identities.write().await;
        let identity = identities.get_mut(id).ok_or(IdentityStoreError::NotFound)?;
        identity.is_active = active;
        Ok(())
    }

    pub async fn remove_identity(&self, id: &str) -> Result<Identity, IdentityStoreError> {
        self.identities
            .write()
            .await
            .remove(id)
            .ok_or(IdentityStoreError::NotFound)
    }

    pub async fn count(&self) -> usize {
        self.identities.read().await.len()
    }
}

#[async_trait::async_trait]
impl IdentityStore for HashmapIdentityStore {
    async fn find_by_identifier(&self, id: &str) -> Result<Identity, IdentityStoreError> {
        self.identities
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(IdentityStoreError::NotFound)
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, IdentityStoreError> {
        let identity = self
            .identities
            .read()
            .await
            .values()
            .find(|i| i.username == username)
            .cloned()
            .ok_or(IdentityStoreError::InvalidCredentials)?;

        if !verify_password(password, &identity.password_hash).await? || !identity.is_active {
            return Err(IdentityStoreError::InvalidCredentials);
        }
        Ok(identity)
    }
}

// Helper method to hash passwords
async fn hash_password(password: &str) -> Result<String, IdentityStoreError> {
    let password_clone = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let params = Params::new(15000, 2, 1, None)
            .map_err(|e| IdentityStoreError::Unavailable(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        argon2
            .hash_password(password_clone.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| IdentityStoreError::Unavailable(e.to_string()))
    })
    .await
    .map_err(|e| IdentityStoreError::Unavailable(e.to_string()))?
}

// Helper method to verify passwords
async fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityStoreError> {
    let password_clone = password.to_owned();
    let hash_clone = hash.to_owned();

    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash_clone)
            .map_err(|e| IdentityStoreError::Unavailable(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password_clone.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| IdentityStoreError::Unavailable(e.to_string()))?
}
