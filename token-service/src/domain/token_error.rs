use thiserror::Error;

use super::TokenType;

/// Every way the engine can refuse to issue, validate or rotate a token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("token is malformed")]
    MalformedToken,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    TokenExpired,

    #[error("token is not valid yet")]
    TokenNotYetValid,

    #[error("expected a {expected} token, found {found}")]
    WrongTokenType {
        expected: TokenType,
        found: TokenType,
    },

    #[error("token is blacklisted")]
    Blacklisted,

    #[error("claim `{0}` does not match")]
    ClaimMismatch(&'static str),

    #[error("an identity is required to issue a token")]
    IdentityRequired,

    #[error("signing key material is unavailable")]
    SigningUnavailable,

    #[error("token rotation failed: {0}")]
    RotationFailed(String),

    #[error("token store unavailable: {0}")]
    StoreUnavailable(String),
}

impl TokenError {
    /// Failures that point at forgery rather than ordinary expiry.
    pub fn is_security_relevant(&self) -> bool {
        matches!(self, TokenError::InvalidSignature)
    }

    /// Failures caused by an external store; the same request may succeed
    /// later. Everything else is deterministic for a given input and clock.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TokenError::RotationFailed(_) | TokenError::StoreUnavailable(_)
        )
    }
}
