use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::app_state::AppState;
use crate::domain::ObtainTokenRequest;
use crate::errors::ObtainTokenError;

pub async fn obtain_pair(
    State(state): State<AppState>,
    Json(request): Json<ObtainTokenRequest>,
) -> Result<impl IntoResponse, ObtainTokenError> {
    let identity = state
        .identity_store
        .verify_credentials(&request.username, &request.password)
        .await?;

    let pair = state.token_service.issue_pair(&identity.id).await?;

    Ok((StatusCode::OK, Json(pair)))
}
