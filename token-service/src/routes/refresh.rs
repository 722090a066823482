use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::app_state::AppState;
use crate::domain::RefreshRequest;
use crate::errors::TokenEndpointError;

pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, TokenEndpointError> {
    let refreshed = state.token_service.exchange(&request.refresh).await?;

    Ok((StatusCode::OK, Json(refreshed)))
}
