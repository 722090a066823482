use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::debug;

use crate::domain::TokenError;

/// Errors of the endpoints that take a token in the body (refresh, sliding
/// refresh, verify, blacklist). Token failures collapse into one message.
#[derive(Error, Debug)]
pub enum TokenEndpointError {
    #[error("Token is invalid or expired")]
    InvalidToken,

    #[error("Service temporarily unavailable, please retry.")]
    ServiceUnavailable,
}

impl From<TokenError> for TokenEndpointError {
    fn from(err: TokenError) -> Self {
        if err.is_retryable() {
            return TokenEndpointError::ServiceUnavailable;
        }
        debug!(reason = %err, "token endpoint rejected token");
        TokenEndpointError::InvalidToken
    }
}

impl IntoResponse for TokenEndpointError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            TokenEndpointError::InvalidToken => StatusCode::UNAUTHORIZED,
            TokenEndpointError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, self.to_string()).into_response()
    }
}
