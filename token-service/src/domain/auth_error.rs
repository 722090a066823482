use thiserror::Error;

use super::TokenError;

/// Outcome of a failed authentication attempt. `Display` stays generic so a
/// rendered error never tells a client which check failed; use
/// [`AuthError::reason`] for logging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No bearer credential for this scheme. Not a validation failure:
    /// other authentication methods may still apply.
    #[error("authentication credentials were not provided")]
    NoCredentials,

    #[error("not authenticated")]
    AuthenticationFailed(TokenError),

    #[error("not authenticated")]
    IdentityNotFound,

    #[error("not authenticated")]
    IdentityInactive,

    #[error("authentication backend unavailable")]
    StoreUnavailable(String),
}

impl AuthError {
    pub fn reason(&self) -> Option<&TokenError> {
        match self {
            AuthError::AuthenticationFailed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::StoreUnavailable(msg) | TokenError::RotationFailed(msg) => {
                AuthError::StoreUnavailable(msg)
            }
            other => AuthError::AuthenticationFailed(other),
        }
    }
}
