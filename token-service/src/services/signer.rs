use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64_URL, Engine};
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};
use tracing::warn;

use crate::domain::{Header, TokenError};
use crate::domain::token::JWT_TYPE;
use crate::utils::config::is_hmac;
use crate::utils::{Config, ConfigError, JwtKey, KeyMaterial};

/// Signs with the active key and verifies against every accepted key.
/// The algorithm is fixed per deployment; the one a token declares is only
/// checked against it, never used to pick a verifier.
pub struct Signer {
    algorithm: Algorithm,
    // the `alg` header value, as jsonwebtoken spells it
    algorithm_name: String,
    active_kid: String,
    signing_key: EncodingKey,
    // all accepted keys for verifying, active key included
    verifying_keys: Vec<DecodingKey>,
}

impl Signer {
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let algorithm = cfg.algorithm();
        let active = cfg
            .jwt_keys()
            .iter()
            .find(|k| k.kid == cfg.jwt_active_kid())
            .ok_or(ConfigError::Invalid("active kid not found in keys"))?;

        let signing_key = encoding_key(algorithm, active)?;
        let verifying_keys = cfg
            .jwt_keys()
            .iter()
            .map(|k| decoding_key(algorithm, k))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            algorithm,
            algorithm_name: algorithm_name(algorithm)?,
            active_kid: cfg.jwt_active_kid().to_string(),
            signing_key,
            verifying_keys,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Header for a token signed by this deployment.
    pub fn header(&self) -> Header {
        Header {
            alg: self.algorithm_name.clone(),
            typ: Some(JWT_TYPE.to_string()),
            kid: Some(self.active_kid.clone()),
        }
    }

    pub fn sign(&self, signing_input: &str) -> Result<Vec<u8>, TokenError> {
        let encoded = crypto::sign(signing_input.as_bytes(), &self.signing_key, self.algorithm)
            .map_err(|_| TokenError::SigningUnavailable)?;
        B64_URL
            .decode(encoded)
            .map_err(|_| TokenError::SigningUnavailable)
    }

    /// Checks the declared algorithm against the allow-list, then the
    /// signature against every accepted key. All keys are tried even after
    /// a match so the work done does not depend on which key signed.
    pub fn verify(
        &self,
        header: &Header,
        signing_input: &str,
        signature: &[u8],
    ) -> Result<(), TokenError> {
        let declared = Algorithm::from_str(&header.alg).ok();
        if declared != Some(self.algorithm) {
            warn!(declared = %header.alg, "rejected token with disallowed algorithm");
            return Err(TokenError::InvalidSignature);
        }

        let encoded_signature = B64_URL.encode(signature);
        let mut matched = false;
        for key in &self.verifying_keys {
            let ok = crypto::verify(
                &encoded_signature,
                signing_input.as_bytes(),
                key,
                self.algorithm,
            )
            .unwrap_or(false);
            matched |= ok;
        }

        if matched {
            Ok(())
        } else {
            Err(TokenError::InvalidSignature)
        }
    }
}

/// The registered name of `algorithm` (`"HS256"`, `"EdDSA"`, ...).
pub fn algorithm_name(algorithm: Algorithm) -> Result<String, ConfigError> {
    match serde_json::to_value(algorithm) {
        Ok(serde_json::Value::String(name)) => Ok(name),
        _ => Err(ConfigError::AlgorithmMismatch(algorithm)),
    }
}

fn encoding_key(algorithm: Algorithm, key: &JwtKey) -> Result<EncodingKey, ConfigError> {
    match &key.material {
        KeyMaterial::Secret(secret) if is_hmac(algorithm) => Ok(EncodingKey::from_secret(secret)),
        KeyMaterial::Pem {
            private_pem: Some(pem),
            ..
        } => match algorithm {
            Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(pem),
            Algorithm::EdDSA => EncodingKey::from_ed_pem(pem),
            _ => EncodingKey::from_rsa_pem(pem),
        }
        .map_err(|_| ConfigError::Decode("private key PEM")),
        _ => Err(ConfigError::AlgorithmMismatch(algorithm)),
    }
}

fn decoding_key(algorithm: Algorithm, key: &JwtKey) -> Result<DecodingKey, ConfigError> {
    match &key.material {
        KeyMaterial::Secret(secret) if is_hmac(algorithm) => Ok(DecodingKey::from_secret(secret)),
        KeyMaterial::Pem { public_pem, .. } if !is_hmac(algorithm) => match algorithm {
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(public_pem),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(public_pem),
            _ => DecodingKey::from_rsa_pem(public_pem),
        }
        .map_err(|_| ConfigError::Decode("public key PEM")),
        _ => Err(ConfigError::AlgorithmMismatch(algorithm)),
    }
}
