use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::app_state::AppState;
use crate::domain::WhoAmIResponse;
use crate::errors::Unauthorized;

pub async fn whoami(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Unauthorized> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let authenticated = state
        .authenticator
        .authenticate(auth)
        .await
        .map_err(|error| Unauthorized {
            error,
            scheme: state.authenticator.scheme().to_string(),
        })?;

    Ok((
        StatusCode::OK,
        Json(WhoAmIResponse {
            user_id: authenticated.identity.id,
            username: authenticated.identity.username,
        }),
    ))
}
