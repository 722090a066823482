use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::data_stores::{IdentityStore, IdentityStoreError};
use crate::domain::{AuthError, Identity, Token, TokenError};

use super::TokenService;

/// A request that passed authentication.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub identity: Identity,
    pub token: Token,
}

/// Bearer-token authentication: header value in, identity or typed
/// rejection out.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    identities: Arc<dyn IdentityStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, identities }
    }

    /// The scheme keyword a challenge should name.
    pub fn scheme(&self) -> &str {
        self.tokens
            .config()
            .auth_header_types()
            .first()
            .map(String::as_str)
            .unwrap_or(crate::utils::DEFAULT_AUTH_HEADER_TYPE)
    }

    /// `"<Scheme> <token>"` with a configured scheme (exact case) and
    /// exactly one token; anything else means this method does not apply.
    ///
    /// The value is split on any run of whitespace, so leading whitespace
    /// and tabs between scheme and token are tolerated.
    pub fn extract_raw_token<'a>(&self, header_value: &'a str) -> Result<&'a str, AuthError> {
        let mut parts = header_value.split_whitespace();
        let scheme = parts.next().ok_or(AuthError::NoCredentials)?;
        if !self
            .tokens
            .config()
            .auth_header_types()
            .iter()
            .any(|t| t == scheme)
        {
            return Err(AuthError::NoCredentials);
        }
        match (parts.next(), parts.next()) {
            (Some(token), None) => Ok(token),
            _ => Err(AuthError::NoCredentials),
        }
    }

    /// Decode and fully validate for one of the configured token types.
    pub async fn validated_token(&self, raw: &str) -> Result<Token, AuthError> {
        let accepted = self.tokens.config().auth_token_types();
        self.tokens
            .validate_any(raw, accepted)
            .await
            .map_err(|err| {
                log_rejection(&err);
                AuthError::from(err)
            })
    }

    /// Resolve the identity claim of a validated token.
    pub async fn identity_for(&self, token: &Token) -> Result<Identity, AuthError> {
        let id = token
            .claims()
            .identity(self.tokens.config().user_id_claim())
            .map_err(AuthError::AuthenticationFailed)?;

        let identity = match self.identities.find_by_identifier(&id).await {
            Ok(identity) => identity,
            Err(IdentityStoreError::Unavailable(msg)) => {
                return Err(AuthError::StoreUnavailable(msg))
            }
            Err(_) => {
                debug!(identity = %id, "token identity no longer exists");
                return Err(AuthError::IdentityNotFound);
            }
        };
        if !self.identities.is_active(&identity) {
            debug!(identity = %id, "token identity is inactive");
            return Err(AuthError::IdentityInactive);
        }
        Ok(identity)
    }

    pub async fn authenticate(
        &self,
        header_value: Option<&str>,
    ) -> Result<Authenticated, AuthError> {
        let raw = self.extract_raw_token(header_value.ok_or(AuthError::NoCredentials)?)?;
        let token = self.validated_token(raw).await?;
        let identity = self.identity_for(&token).await?;
        Ok(Authenticated { identity, token })
    }
}

fn log_rejection(err: &TokenError) {
    if err.is_security_relevant() {
        warn!(reason = %err, "rejected bearer token");
    } else {
        debug!(reason = %err, "rejected bearer token");
    }
}
