use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::domain::AuthError;

/// Rejection for routes behind bearer authentication.
#[derive(Debug)]
pub struct Unauthorized {
    pub error: AuthError,
    pub scheme: String,
}

impl IntoResponse for Unauthorized {
    fn into_response(self) -> axum::response::Response {
        match self.error {
            AuthError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.error.to_string()).into_response()
            }
            _ => (
                StatusCode::UNAUTHORIZED,
                [(
                    header::WWW_AUTHENTICATE,
                    format!("{} realm=\"api\"", self.scheme),
                )],
                self.error.to_string(),
            )
                .into_response(),
        }
    }
}
