use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::error;

use crate::domain::{IdentityStoreError, TokenError};

#[derive(Error, Debug)]
pub enum ObtainTokenError {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("Service temporarily unavailable, please retry.")]
    ServiceUnavailable,

    #[error("Something went wrong, please try again later.")]
    InternalServerError,
}

impl From<IdentityStoreError> for ObtainTokenError {
    fn from(err: IdentityStoreError) -> Self {
        match err {
            IdentityStoreError::Unavailable(_) => ObtainTokenError::ServiceUnavailable,
            _ => ObtainTokenError::InvalidCredentials,
        }
    }
}

impl From<TokenError> for ObtainTokenError {
    fn from(err: TokenError) -> Self {
        if err.is_retryable() {
            return ObtainTokenError::ServiceUnavailable;
        }
        error!(error = %err, "token issuance failed");
        ObtainTokenError::InternalServerError
    }
}

impl IntoResponse for ObtainTokenError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ObtainTokenError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ObtainTokenError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ObtainTokenError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
