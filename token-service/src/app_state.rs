use std::sync::Arc;

use crate::domain::IdentityStore;
use crate::services::{Authenticator, TokenService};

// Using type aliases to improve readability!
pub type IdentityStoreType = Arc<dyn IdentityStore>;
pub type TokenServiceType = Arc<TokenService>;

#[derive(Clone)]
pub struct AppState {
    pub identity_store: IdentityStoreType,
    pub token_service: TokenServiceType,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(identity_store: IdentityStoreType, token_service: TokenServiceType) -> Self {
        let authenticator = Authenticator::new(token_service.clone(), identity_store.clone());
        Self {
            identity_store,
            token_service,
            authenticator,
        }
    }
}
