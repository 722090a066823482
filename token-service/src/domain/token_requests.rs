use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct ObtainTokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SlidingRefreshRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WhoAmIResponse {
    pub user_id: String,
    pub username: String,
}
