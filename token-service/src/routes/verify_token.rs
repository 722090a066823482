use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::app_state::AppState;
use crate::domain::VerifyTokenRequest;
use crate::errors::TokenEndpointError;

pub async fn verify_token(
    State(state): State<AppState>,
    Json(request): Json<VerifyTokenRequest>,
) -> Result<impl IntoResponse, TokenEndpointError> {
    state.token_service.validate_untyped(&request.token).await?;

    Ok((StatusCode::OK, Json(json!({}))))
}
