use serde::{Deserialize, Serialize};

/// Result of obtaining a pair at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Result of obtaining or extending a sliding token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidingTokenResponse {
    pub token: String,
}

/// Result of exchanging a refresh token. `refresh` is only present when
/// rotation is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshedTokens {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}
