use std::collections::HashSet;
use std::env;
use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD as B64_STD, URL_SAFE_NO_PAD as B64_URL};
use base64::Engine;
use chrono::Duration;
use dotenvy::dotenv;
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::TokenType;

use super::consts::{self, env as vars};

/// Raw key material for one key id.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared HMAC secret.
    Secret(Vec<u8>),
    /// PEM encoded asymmetric key pair. Keys that are only accepted for
    /// verification carry no private half.
    Pem {
        private_pem: Option<Vec<u8>>,
        public_pem: Vec<u8>,
    },
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Secret(_) => f.write_str("Secret(<redacted>)"),
            KeyMaterial::Pem { private_pem, .. } => f
                .debug_struct("Pem")
                .field("has_private", &private_pem.is_some())
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JwtKey {
    pub kid: String,
    pub material: KeyMaterial,
}

impl JwtKey {
    pub fn secret(kid: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            kid: kid.into(),
            material: KeyMaterial::Secret(secret.into()),
        }
    }

    pub fn pem(
        kid: impl Into<String>,
        private_pem: Option<Vec<u8>>,
        public_pem: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            kid: kid.into(),
            material: KeyMaterial::Pem {
                private_pem,
                public_pem: public_pem.into(),
            },
        }
    }
}

/// Process-wide, read-only settings. Built once at startup and shared as
/// `Arc<Config>`; nothing in the engine reads ambient globals.
#[derive(Clone, Debug)]
pub struct Config {
    algorithm: Algorithm,
    keys: Vec<JwtKey>,
    active_kid: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    sliding_ttl_seconds: i64,
    sliding_refresh_ttl_seconds: i64,
    leeway_seconds: i64,
    auth_header_types: Vec<String>,
    auth_token_types: Vec<TokenType>,
    user_id_claim: String,
    rotate_refresh_tokens: bool,
    blacklist_after_rotation: bool,
    issuer: Option<String>,
    audience: Option<String>,
    bind_address: String,
}

impl Config {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    pub fn jwt_keys(&self) -> &[JwtKey] {
        &self.keys
    }
    pub fn jwt_active_kid(&self) -> &str {
        &self.active_kid
    }
    pub fn access_ttl(&self) -> Duration {
        seconds(self.access_ttl_seconds)
    }
    pub fn refresh_ttl(&self) -> Duration {
        seconds(self.refresh_ttl_seconds)
    }
    pub fn sliding_ttl(&self) -> Duration {
        seconds(self.sliding_ttl_seconds)
    }
    pub fn sliding_refresh_ttl(&self) -> Duration {
        seconds(self.sliding_refresh_ttl_seconds)
    }
    pub fn leeway(&self) -> Duration {
        seconds(self.leeway_seconds)
    }
    pub fn auth_header_types(&self) -> &[String] {
        &self.auth_header_types
    }
    pub fn auth_token_types(&self) -> &[TokenType] {
        &self.auth_token_types
    }
    pub fn user_id_claim(&self) -> &str {
        &self.user_id_claim
    }
    pub fn rotate_refresh_tokens(&self) -> bool {
        self.rotate_refresh_tokens
    }
    pub fn blacklist_after_rotation(&self) -> bool {
        self.blacklist_after_rotation
    }
    pub fn jwt_issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }
    pub fn jwt_audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }
    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// Single-secret HS256 deployment with default lifetimes.
    pub fn hs256(kid: impl Into<String>, secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let kid = kid.into();
        Self::with_keys(Algorithm::HS256, vec![JwtKey::secret(kid.clone(), secret)], kid)
    }

    pub fn with_keys(
        algorithm: Algorithm,
        keys: Vec<JwtKey>,
        active_kid: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            algorithm,
            keys,
            active_kid: active_kid.into(),
            access_ttl_seconds: consts::DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: consts::DEFAULT_REFRESH_TTL_SECONDS,
            sliding_ttl_seconds: consts::DEFAULT_SLIDING_TTL_SECONDS,
            sliding_refresh_ttl_seconds: consts::DEFAULT_SLIDING_REFRESH_TTL_SECONDS,
            leeway_seconds: 0,
            auth_header_types: vec![consts::DEFAULT_AUTH_HEADER_TYPE.to_string()],
            auth_token_types: vec![TokenType::Access],
            user_id_claim: consts::DEFAULT_USER_ID_CLAIM.to_string(),
            rotate_refresh_tokens: false,
            blacklist_after_rotation: false,
            issuer: None,
            audience: None,
            bind_address: consts::DEFAULT_BIND_ADDRESS.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_ttl_seconds = seconds;
        self
    }
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }
    pub fn with_sliding_ttl_seconds(mut self, seconds: i64) -> Self {
        self.sliding_ttl_seconds = seconds;
        self
    }
    pub fn with_sliding_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.sliding_refresh_ttl_seconds = seconds;
        self
    }
    pub fn with_leeway_seconds(mut self, seconds: i64) -> Self {
        self.leeway_seconds = seconds;
        self
    }
    pub fn with_auth_header_types(mut self, types: &[&str]) -> Self {
        self.auth_header_types = types.iter().map(|t| t.to_string()).collect();
        self
    }
    pub fn with_auth_token_types(mut self, types: &[TokenType]) -> Self {
        self.auth_token_types = types.to_vec();
        self
    }
    pub fn with_user_id_claim(mut self, claim: impl Into<String>) -> Self {
        self.user_id_claim = claim.into();
        self
    }
    pub fn with_rotation(mut self, rotate: bool, blacklist_after_rotation: bool) -> Self {
        self.rotate_refresh_tokens = rotate;
        self.blacklist_after_rotation = blacklist_after_rotation;
        self
    }
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
    /// Keeps accepting tokens signed by a retired key.
    pub fn with_verification_key(mut self, key: JwtKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env in dev; no-op in prod if not present.
        let _ = dotenv();

        let algorithm = match opt_var(vars::JWT_ALGORITHM_ENV_VAR) {
            Some(raw) => Algorithm::from_str(raw.trim())
                .map_err(|_| ConfigError::Invalid(vars::JWT_ALGORITHM_ENV_VAR))?,
            None => Algorithm::HS256,
        };
        let active_kid = req_var(vars::JWT_ACTIVE_KID_ENV_VAR)?;
        let keys = parse_keys_json(vars::JWT_KEYS_JSON_ENV_VAR)?;

        let auth_header_types = match opt_var(vars::AUTH_HEADER_TYPES_ENV_VAR) {
            Some(raw) => split_list(&raw),
            None => vec![consts::DEFAULT_AUTH_HEADER_TYPE.to_string()],
        };
        let auth_token_types = match opt_var(vars::AUTH_TOKEN_TYPES_ENV_VAR) {
            Some(raw) => split_list(&raw)
                .iter()
                .map(|t| t.parse::<TokenType>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ConfigError::Invalid(vars::AUTH_TOKEN_TYPES_ENV_VAR))?,
            None => vec![TokenType::Access],
        };

        let config = Self {
            algorithm,
            keys,
            active_kid,
            access_ttl_seconds: parse_i64_or(
                vars::ACCESS_TTL_SECONDS_ENV_VAR,
                consts::DEFAULT_ACCESS_TTL_SECONDS,
            )?,
            refresh_ttl_seconds: parse_i64_or(
                vars::REFRESH_TTL_SECONDS_ENV_VAR,
                consts::DEFAULT_REFRESH_TTL_SECONDS,
            )?,
            sliding_ttl_seconds: parse_i64_or(
                vars::SLIDING_TTL_SECONDS_ENV_VAR,
                consts::DEFAULT_SLIDING_TTL_SECONDS,
            )?,
            sliding_refresh_ttl_seconds: parse_i64_or(
                vars::SLIDING_REFRESH_TTL_SECONDS_ENV_VAR,
                consts::DEFAULT_SLIDING_REFRESH_TTL_SECONDS,
            )?,
            leeway_seconds: parse_i64_or(vars::JWT_LEEWAY_SECONDS_ENV_VAR, 0)?,
            auth_header_types,
            auth_token_types,
            user_id_claim: opt_var(vars::USER_ID_CLAIM_ENV_VAR)
                .unwrap_or_else(|| consts::DEFAULT_USER_ID_CLAIM.to_string()),
            rotate_refresh_tokens: parse_bool_or(vars::ROTATE_REFRESH_TOKENS_ENV_VAR, false)?,
            blacklist_after_rotation: parse_bool_or(
                vars::BLACKLIST_AFTER_ROTATION_ENV_VAR,
                false,
            )?,
            issuer: opt_var(vars::JWT_ISSUER_ENV_VAR),
            audience: opt_var(vars::JWT_AUDIENCE_ENV_VAR),
            bind_address: opt_var(vars::BIND_ADDRESS_ENV_VAR)
                .unwrap_or_else(|| consts::DEFAULT_BIND_ADDRESS.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::Invalid("empty JWT keys"));
        }
        let mut kids = HashSet::new();
        for key in &self.keys {
            if !kids.insert(key.kid.as_str()) {
                return Err(ConfigError::Invalid("duplicate kid in keys"));
            }
            check_key_matches_algorithm(self.algorithm, key)?;
        }
        let active = self
            .keys
            .iter()
            .find(|k| k.kid == self.active_kid)
            .ok_or(ConfigError::Invalid("active kid not found in keys"))?;
        if let KeyMaterial::Pem {
            private_pem: None, ..
        } = active.material
        {
            return Err(ConfigError::Invalid("active key has no private half"));
        }

        let lifetimes = [
            self.access_ttl_seconds,
            self.refresh_ttl_seconds,
            self.sliding_ttl_seconds,
            self.sliding_refresh_ttl_seconds,
        ];
        if lifetimes.iter().any(|s| *s <= 0) {
            return Err(ConfigError::Invalid("token lifetimes must be positive"));
        }
        if lifetimes.iter().any(|s| *s > consts::MAX_LIFETIME_SECONDS) {
            return Err(ConfigError::Invalid("token lifetime too long"));
        }
        if self.leeway_seconds < 0 {
            return Err(ConfigError::Invalid("leeway must not be negative"));
        }
        if self.leeway_seconds > consts::MAX_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("leeway too long"));
        }
        if self.auth_header_types.is_empty()
            || self.auth_header_types.iter().any(|t| t.is_empty() || t.contains(' '))
        {
            return Err(ConfigError::Invalid("auth header types"));
        }
        if self.auth_token_types.is_empty() {
            return Err(ConfigError::Invalid("auth token types"));
        }
        if self.user_id_claim.is_empty() {
            return Err(ConfigError::Invalid("user id claim"));
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing env var {0}")]
    Missing(&'static str),
    #[error("invalid setting {0}")]
    Invalid(&'static str),
    #[error("decode error in {0}")]
    Decode(&'static str),
    #[error("{0}")]
    WrongLen(&'static str),
    #[error("key material does not match algorithm {0:?}")]
    AlgorithmMismatch(Algorithm),
}

pub(crate) fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

fn check_key_matches_algorithm(algorithm: Algorithm, key: &JwtKey) -> Result<(), ConfigError> {
    match (&key.material, is_hmac(algorithm)) {
        (KeyMaterial::Secret(secret), true) => {
            if secret.len() < consts::MIN_HMAC_SECRET_LEN {
                return Err(ConfigError::WrongLen(
                    "HMAC secret must be at least 32 bytes",
                ));
            }
            Ok(())
        }
        (KeyMaterial::Pem { .. }, false) => Ok(()),
        _ => Err(ConfigError::AlgorithmMismatch(algorithm)),
    }
}

// Saturates instead of panicking; `validate` keeps real values far below.
fn seconds(secs: i64) -> Duration {
    Duration::try_seconds(secs).unwrap_or(Duration::MAX)
}

fn req_var(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn opt_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_i64_or(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match opt_var(key) {
        Some(v) => v.trim().parse::<i64>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool_or(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match opt_var(key).as_deref().map(str::trim) {
        Some("1") | Some("true") | Some("TRUE") | Some("True") => Ok(true),
        Some("0") | Some("false") | Some("FALSE") | Some("False") => Ok(false),
        Some(_) => Err(ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn decode_b64_any(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // Try URL-safe (no padding) first, then standard.
    B64_URL.decode(s).or_else(|_| B64_STD.decode(s))
}

#[derive(Deserialize)]
struct KeyEntry {
    kid: String,
    secret_b64: Option<String>,
    private_pem_b64: Option<String>,
    public_pem_b64: Option<String>,
}

fn parse_keys_json(key_name: &'static str) -> Result<Vec<JwtKey>, ConfigError> {
    let raw = req_var(key_name)?;
    let parsed: Vec<KeyEntry> =
        serde_json::from_str(&raw).map_err(|_| ConfigError::Invalid(key_name))?;

    let mut out = Vec::with_capacity(parsed.len());
    for entry in parsed {
        let decode = |s: &str| decode_b64_any(s).map_err(|_| ConfigError::Decode(key_name));
        let material = match (entry.secret_b64, entry.public_pem_b64) {
            (Some(secret), None) => KeyMaterial::Secret(decode(&secret)?),
            (None, Some(public)) => KeyMaterial::Pem {
                private_pem: entry
                    .private_pem_b64
                    .as_deref()
                    .map(decode)
                    .transpose()?,
                public_pem: decode(&public)?,
            },
            _ => return Err(ConfigError::Invalid(key_name)),
        };
        out.push(JwtKey {
            kid: entry.kid,
            material,
        });
    }
    Ok(out)
}
