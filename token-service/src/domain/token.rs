use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::consts::claims as reserved;
use crate::utils::Config;

use super::{Claims, TokenError, TokenType};

pub const JWT_TYPE: &str = "JWT";

/// The header segment. `alg` is kept as the raw string the token declared so
/// that unknown or `none` algorithms reach the allow-list check instead of
/// failing as structurally malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// A signed token. Never edited in place: sliding extension and rotation
/// produce new values.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    header: Header,
    claims: Claims,
    signature: Vec<u8>,
    encoded: String,
}

impl Token {
    pub(crate) fn from_parts(
        header: Header,
        claims: Claims,
        signature: Vec<u8>,
        encoded: String,
    ) -> Self {
        Self {
            header,
            claims,
            signature,
            encoded,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn into_string(self) -> String {
        self.encoded
    }

    pub fn token_type(&self) -> Result<TokenType, TokenError> {
        self.claims.token_type()
    }

    pub fn jti(&self) -> Result<&str, TokenError> {
        self.claims.jti()
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, TokenError> {
        to_datetime(self.claims.required_timestamp(reserved::EXP)?)
    }

    /// For sliding tokens, the ceiling past which no refresh is possible.
    /// Other tokens end at `exp`.
    pub fn final_expiry(&self) -> Result<DateTime<Utc>, TokenError> {
        match self.token_type()? {
            TokenType::Sliding => {
                to_datetime(self.claims.required_timestamp(reserved::REFRESH_EXP)?)
            }
            TokenType::Access | TokenType::Refresh => self.expires_at(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

fn to_datetime(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0).ok_or(TokenError::MalformedToken)
}

/// Inputs to the time and registered-claim checks, resolved once per call.
#[derive(Debug, Clone, Copy)]
pub struct Validation<'a> {
    pub now: DateTime<Utc>,
    pub leeway: Duration,
    pub issuer: Option<&'a str>,
    pub audience: Option<&'a str>,
}

/// `now + ttl` as epoch seconds, or `None` past the representable range.
fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Option<i64> {
    now.checked_add_signed(ttl).map(|t| t.timestamp())
}

/// Lifetime claims for a freshly issued token of the given type.
/// A lifetime that overflows the calendar is a misconfiguration and fails
/// as `SigningUnavailable`.
pub fn lifetime_claims(
    token_type: TokenType,
    now: DateTime<Utc>,
    cfg: &Config,
) -> Result<Vec<(&'static str, i64)>, TokenError> {
    let iat = now.timestamp();
    let after = |ttl| expiry_after(now, ttl).ok_or(TokenError::SigningUnavailable);
    let claims = match token_type {
        TokenType::Access => vec![
            (reserved::EXP, after(cfg.access_ttl())?),
            (reserved::IAT, iat),
        ],
        TokenType::Refresh => vec![
            (reserved::EXP, after(cfg.refresh_ttl())?),
            (reserved::IAT, iat),
        ],
        TokenType::Sliding => {
            let refresh_exp = after(cfg.sliding_refresh_ttl())?;
            let exp = after(cfg.sliding_ttl())?.min(refresh_exp);
            vec![
                (reserved::EXP, exp),
                (reserved::IAT, iat),
                (reserved::REFRESH_EXP, refresh_exp),
            ]
        }
    };
    Ok(claims)
}

/// Expired once `now` reaches the claim plus leeway.
pub fn check_expiry(claims: &Claims, claim: &str, v: &Validation) -> Result<(), TokenError> {
    let ts = claims.required_timestamp(claim)?;
    if v.now.timestamp() >= ts.saturating_add(v.leeway.num_seconds()) {
        return Err(TokenError::TokenExpired);
    }
    Ok(())
}

pub fn check_not_before(claims: &Claims, v: &Validation) -> Result<(), TokenError> {
    if let Some(nbf) = claims.timestamp(reserved::NBF)? {
        if v.now.timestamp().saturating_add(v.leeway.num_seconds()) < nbf {
            return Err(TokenError::TokenNotYetValid);
        }
    }
    Ok(())
}

pub fn check_registered(claims: &Claims, v: &Validation) -> Result<(), TokenError> {
    if let Some(expected) = v.issuer {
        if claims.get(reserved::ISS).and_then(|i| i.as_str()) != Some(expected) {
            return Err(TokenError::ClaimMismatch(reserved::ISS));
        }
    }
    if let Some(expected) = v.audience {
        let matches = match claims.get(reserved::AUD) {
            Some(serde_json::Value::String(aud)) => aud == expected,
            Some(serde_json::Value::Array(auds)) => {
                auds.iter().any(|a| a.as_str() == Some(expected))
            }
            _ => false,
        };
        if !matches {
            return Err(TokenError::ClaimMismatch(reserved::AUD));
        }
    }
    Ok(())
}

pub fn check_type(claims: &Claims, expected: TokenType) -> Result<(), TokenError> {
    let found = claims.token_type()?;
    if found != expected {
        return Err(TokenError::WrongTokenType { expected, found });
    }
    Ok(())
}

impl Token {
    /// Time and type rules for normal use of a token whose signature has
    /// already been verified. Sliding tokens are judged on `exp` only.
    pub fn validate_as(&self, expected: TokenType, v: &Validation) -> Result<(), TokenError> {
        check_registered(&self.claims, v)?;
        check_expiry(&self.claims, reserved::EXP, v)?;
        check_not_before(&self.claims, v)?;
        check_type(&self.claims, expected)
    }

    /// Time rules without a type requirement.
    pub fn validate_untyped(&self, v: &Validation) -> Result<TokenType, TokenError> {
        check_registered(&self.claims, v)?;
        let token_type = self.token_type()?;
        check_expiry(&self.claims, reserved::EXP, v)?;
        check_not_before(&self.claims, v)?;
        Ok(token_type)
    }

    /// Whether a sliding token may still be extended. `exp` is allowed to
    /// have passed; only `refresh_exp` is terminal.
    pub fn validate_refreshable(&self, v: &Validation) -> Result<(), TokenError> {
        check_registered(&self.claims, v)?;
        check_type(&self.claims, TokenType::Sliding)?;
        check_expiry(&self.claims, reserved::REFRESH_EXP, v)?;
        check_not_before(&self.claims, v)
    }

    /// Claims for the extension of this sliding token at `now`: same `jti`
    /// and identity, `exp` capped at `refresh_exp`.
    pub fn extended_claims(
        &self,
        now: DateTime<Utc>,
        sliding_ttl: Duration,
    ) -> Result<Claims, TokenError> {
        let refresh_exp = self.claims.required_timestamp(reserved::REFRESH_EXP)?;
        // past the calendar means past any ceiling
        let exp = expiry_after(now, sliding_ttl).map_or(refresh_exp, |e| e.min(refresh_exp));
        let mut claims = self.claims.clone();
        claims.insert(reserved::EXP, exp);
        claims.insert(reserved::IAT, now.timestamp());
        Ok(claims)
    }
}
