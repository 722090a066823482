pub mod env {
    pub const JWT_ALGORITHM_ENV_VAR: &str = "JWT_ALGORITHM";
    pub const JWT_KEYS_JSON_ENV_VAR: &str = "JWT_KEYS_JSON";
    pub const JWT_ACTIVE_KID_ENV_VAR: &str = "JWT_ACTIVE_KID";
    pub const ACCESS_TTL_SECONDS_ENV_VAR: &str = "ACCESS_TTL_SECONDS";
    pub const REFRESH_TTL_SECONDS_ENV_VAR: &str = "REFRESH_TTL_SECONDS";
    pub const SLIDING_TTL_SECONDS_ENV_VAR: &str = "SLIDING_TTL_SECONDS";
    pub const SLIDING_REFRESH_TTL_SECONDS_ENV_VAR: &str = "SLIDING_REFRESH_TTL_SECONDS";
    pub const JWT_LEEWAY_SECONDS_ENV_VAR: &str = "JWT_LEEWAY_SECONDS";
    pub const AUTH_HEADER_TYPES_ENV_VAR: &str = "AUTH_HEADER_TYPES";
    pub const AUTH_TOKEN_TYPES_ENV_VAR: &str = "AUTH_TOKEN_TYPES";
    pub const USER_ID_CLAIM_ENV_VAR: &str = "USER_ID_CLAIM";
    pub const ROTATE_REFRESH_TOKENS_ENV_VAR: &str = "ROTATE_REFRESH_TOKENS";
    pub const BLACKLIST_AFTER_ROTATION_ENV_VAR: &str = "BLACKLIST_AFTER_ROTATION";
    pub const JWT_ISSUER_ENV_VAR: &str = "JWT_ISSUER";
    pub const JWT_AUDIENCE_ENV_VAR: &str = "JWT_AUDIENCE";
    pub const BIND_ADDRESS_ENV_VAR: &str = "BIND_ADDRESS";
    pub const SEED_USERNAME_ENV_VAR: &str = "SEED_USERNAME";
    pub const SEED_PASSWORD_ENV_VAR: &str = "SEED_PASSWORD";
}

pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 5 * 60;
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_SLIDING_TTL_SECONDS: i64 = 5 * 60;
pub const DEFAULT_SLIDING_REFRESH_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_AUTH_HEADER_TYPE: &str = "Bearer";
pub const DEFAULT_USER_ID_CLAIM: &str = "user_id";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

// HMAC secrets shorter than the digest are rejected at startup
pub const MIN_HMAC_SECRET_LEN: usize = 32;

// upper bounds for configured durations, ten years and one day
pub const MAX_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;
pub const MAX_LEEWAY_SECONDS: i64 = 24 * 60 * 60;

/// Reserved claim names.
pub mod claims {
    pub const TOKEN_TYPE: &str = "token_type";
    pub const EXP: &str = "exp";
    pub const IAT: &str = "iat";
    pub const NBF: &str = "nbf";
    pub const JTI: &str = "jti";
    pub const REFRESH_EXP: &str = "refresh_exp";
    pub const ISS: &str = "iss";
    pub const AUD: &str = "aud";
}
