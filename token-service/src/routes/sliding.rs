use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::app_state::AppState;
use crate::domain::{ObtainTokenRequest, SlidingRefreshRequest};
use crate::errors::{ObtainTokenError, TokenEndpointError};

pub async fn obtain_sliding(
    State(state): State<AppState>,
    Json(request): Json<ObtainTokenRequest>,
) -> Result<impl IntoResponse, ObtainTokenError> {
    let identity = state
        .identity_store
        .verify_credentials(&request.username, &request.password)
        .await?;

    let issued = state.token_service.issue_sliding(&identity.id).await?;

    Ok((StatusCode::OK, Json(issued)))
}

pub async fn refresh_sliding(
    State(state): State<AppState>,
    Json(request): Json<SlidingRefreshRequest>,
) -> Result<impl IntoResponse, TokenEndpointError> {
    let extended = state.token_service.refresh_sliding(&request.token).await?;

    Ok((StatusCode::OK, Json(extended)))
}
