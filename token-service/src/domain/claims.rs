use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::consts::claims as reserved;

use super::{TokenError, TokenType};

/// Claims that are regenerated for every token and never carried from one
/// token to another.
const NO_COPY_CLAIMS: [&str; 6] = [
    reserved::TOKEN_TYPE,
    reserved::EXP,
    reserved::IAT,
    reserved::NBF,
    reserved::JTI,
    reserved::REFRESH_EXP,
];

/// Ordered claim mapping. Insertion order is kept so the serialized payload
/// is deterministic for a given construction sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn token_type(&self) -> Result<TokenType, TokenError> {
        self.get(reserved::TOKEN_TYPE)
            .and_then(Value::as_str)
            .and_then(|t| t.parse().ok())
            .ok_or(TokenError::MalformedToken)
    }

    pub fn jti(&self) -> Result<&str, TokenError> {
        self.get(reserved::JTI)
            .and_then(Value::as_str)
            .ok_or(TokenError::MalformedToken)
    }

    /// Integer epoch-seconds claim. Absent is `None`; present but not an
    /// integer is malformed.
    pub fn timestamp(&self, name: &str) -> Result<Option<i64>, TokenError> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v.as_i64().map(Some).ok_or(TokenError::MalformedToken),
        }
    }

    pub fn required_timestamp(&self, name: &str) -> Result<i64, TokenError> {
        self.timestamp(name)?.ok_or(TokenError::MalformedToken)
    }

    /// The subject reference stored under `claim`. Numeric ids are accepted
    /// and rendered as strings.
    pub fn identity(&self, claim: &str) -> Result<String, TokenError> {
        match self.get(claim) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(TokenError::MalformedToken),
        }
    }

    /// Everything a derived token inherits: identity, issuer, audience and
    /// any custom claims.
    pub fn inheritable(&self) -> Claims {
        Claims(
            self.0
                .iter()
                .filter(|(name, _)| !NO_COPY_CLAIMS.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }

    pub fn extend(&mut self, other: Claims) {
        for (name, value) in other.0 {
            self.0.insert(name, value);
        }
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
