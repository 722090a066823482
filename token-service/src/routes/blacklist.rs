use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::app_state::AppState;
use crate::domain::RefreshRequest;
use crate::errors::TokenEndpointError;

pub async fn blacklist(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, TokenEndpointError> {
    state.token_service.blacklist_token(&request.refresh).await?;

    Ok((StatusCode::OK, Json(json!({}))))
}
