/// Token issuance, validation and rotation.
///
/// This module provides the `TokenService`, which coordinates:
/// - Minting access, refresh and sliding tokens for an identity
/// - Full validation (structure, signature, time claims, type, revocation)
/// - Exchanging a refresh token for a new access token, optionally rotating
///   the refresh token and blacklisting the consumed one
/// - Extending sliding tokens up to their absolute ceiling
/// - Explicit revocation of a single token or of every outstanding token
///   of an identity
///
/// Security model:
/// 1. The algorithm is fixed by configuration. A token declaring any other
///    algorithm fails as `InvalidSignature` before any key is touched.
/// 2. With blacklist-after-rotation, the consumed refresh token is
///    blacklisted *before* the new tokens are minted. If the store cannot
///    record that, nothing is issued (`RotationFailed`), so a new token
///    family never coexists with a still-valid predecessor.
/// 3. The store's `blacklist` is a check-and-set; a concurrent replay of the
///    same refresh token loses with `Blacklisted`.
///
/// Concurrency:
/// - Everything except store calls is a pure function of the input, the
///   read-only `Config` and the injected `Clock`. No locks are held here.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::token::{self, Validation};
use crate::domain::{
    BlacklistStore, BlacklistStoreError, Claims, OutstandingToken, RefreshedTokens,
    SlidingTokenResponse, Token, TokenError, TokenPair, TokenType,
};
use crate::utils::consts::claims as reserved;
use crate::utils::{Clock, Config, ConfigError};

use super::codec;
use super::signer::Signer;

#[derive(Clone)]
/// Main façade over the token engine.
///
/// Typical lifecycle:
/// 1. `issue_pair` / `issue_sliding` at login
/// 2. `validate` on every protected request
/// 3. `exchange` (refresh token) or `refresh_sliding` (sliding token) when
///    the short-lived part runs out
/// 4. `blacklist_token` / `blacklist_outstanding_for` on logout or compromise
pub struct TokenService {
    cfg: Arc<Config>,
    signer: Arc<Signer>,
    clock: Arc<dyn Clock>,
    blacklist: Option<Arc<dyn BlacklistStore>>,
}

impl TokenService {
    /// Construct a new `TokenService`.
    ///
    /// Parameters:
    /// - `cfg`: shared configuration (algorithm, keys, lifetimes, policy)
    /// - `clock`: time source for every expiry decision
    /// - `blacklist`: revocation store; `None` disables outstanding tracking
    ///   and blacklist checks
    ///
    /// Fails if key material cannot be loaded or if blacklist-after-rotation
    /// is requested without a store to record it in.
    pub fn new(
        cfg: Arc<Config>,
        clock: Arc<dyn Clock>,
        blacklist: Option<Arc<dyn BlacklistStore>>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        if cfg.blacklist_after_rotation() && blacklist.is_none() {
            return Err(ConfigError::Invalid(
                "blacklist after rotation requires a blacklist store",
            ));
        }
        let signer = Arc::new(Signer::from_config(&cfg)?);
        Ok(Self {
            cfg,
            signer,
            clock,
            blacklist,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn validation(&self) -> Validation<'_> {
        Validation {
            now: self.clock.now(),
            leeway: self.cfg.leeway(),
            issuer: self.cfg.jwt_issuer(),
            audience: self.cfg.jwt_audience(),
        }
    }

    /// Build and sign a new token of `token_type` for `identity` at `now`.
    /// `inherited` claims are copied in after the identity, so callers may
    /// carry custom claims across rotation.
    ///
    /// Pure: no store is touched.
    pub fn mint(
        &self,
        token_type: TokenType,
        identity: &str,
        inherited: Claims,
    ) -> Result<Token, TokenError> {
        if identity.trim().is_empty() {
            return Err(TokenError::IdentityRequired);
        }
        let now = self.clock.now();

        let mut claims = Claims::new().with(reserved::TOKEN_TYPE, token_type.as_str());
        for (name, value) in token::lifetime_claims(token_type, now, &self.cfg)? {
            claims.insert(name, value);
        }
        claims.insert(reserved::JTI, Uuid::new_v4().simple().to_string());
        claims.insert(self.cfg.user_id_claim(), identity);
        if let Some(iss) = self.cfg.jwt_issuer() {
            claims.insert(reserved::ISS, iss);
        }
        if let Some(aud) = self.cfg.jwt_audience() {
            claims.insert(reserved::AUD, aud);
        }
        claims.extend(inherited.inheritable());
        // the identity claim is authoritative even if `inherited` carried one
        claims.insert(self.cfg.user_id_claim(), identity);

        self.sign_claims(claims)
    }

    fn sign_claims(&self, claims: Claims) -> Result<Token, TokenError> {
        let header = self.signer.header();
        let signing_input = codec::encode(&header, &claims)?;
        let signature = self.signer.sign(&signing_input)?;
        let encoded = codec::attach_signature(&signing_input, &signature);
        Ok(Token::from_parts(header, claims, signature, encoded))
    }

    /// Structural decode plus signature check. No time or type rules.
    pub fn decode_verified(&self, raw: &str) -> Result<Token, TokenError> {
        let decoded = codec::decode(raw)?;
        self.signer
            .verify(&decoded.header, decoded.signing_input, &decoded.signature)?;
        Ok(Token::from_parts(
            decoded.header,
            decoded.claims,
            decoded.signature,
            raw.to_string(),
        ))
    }

    async fn record_outstanding(&self, token: &Token, identity: &str) -> Result<(), TokenError> {
        let Some(store) = &self.blacklist else {
            return Ok(());
        };
        let record = OutstandingToken {
            jti: token.jti()?.to_string(),
            identity: identity.to_string(),
            token_type: token.token_type()?,
            created_at: self.clock.now(),
            expires_at: token.final_expiry()?,
        };
        store
            .record_outstanding(record)
            .await
            .map_err(|e| TokenError::StoreUnavailable(e.to_string()))
    }

    async fn check_not_blacklisted(&self, token: &Token) -> Result<(), TokenError> {
        let Some(store) = &self.blacklist else {
            return Ok(());
        };
        if !token.token_type()?.is_revocable() {
            return Ok(());
        }
        let blacklisted = store
            .is_blacklisted(token.jti()?)
            .await
            .map_err(|e| TokenError::StoreUnavailable(e.to_string()))?;
        if blacklisted {
            return Err(TokenError::Blacklisted);
        }
        Ok(())
    }

    /// Issue the access + refresh pair for a login.
    pub async fn issue_pair(&self, identity: &str) -> Result<TokenPair, TokenError> {
        self.issue_pair_with_claims(identity, Claims::new()).await
    }

    pub async fn issue_pair_with_claims(
        &self,
        identity: &str,
        extra: Claims,
    ) -> Result<TokenPair, TokenError> {
        let refresh = self.mint(TokenType::Refresh, identity, extra)?;
        let access = self.mint(
            TokenType::Access,
            identity,
            refresh.claims().inheritable(),
        )?;
        self.record_outstanding(&refresh, identity).await?;

        info!(identity, jti = refresh.jti()?, "issued token pair");
        Ok(TokenPair {
            access: access.into_string(),
            refresh: refresh.into_string(),
        })
    }

    /// Issue a single sliding token for a login.
    pub async fn issue_sliding(&self, identity: &str) -> Result<SlidingTokenResponse, TokenError> {
        self.issue_sliding_with_claims(identity, Claims::new()).await
    }

    pub async fn issue_sliding_with_claims(
        &self,
        identity: &str,
        extra: Claims,
    ) -> Result<SlidingTokenResponse, TokenError> {
        let token = self.mint(TokenType::Sliding, identity, extra)?;
        self.record_outstanding(&token, identity).await?;

        info!(identity, jti = token.jti()?, "issued sliding token");
        Ok(SlidingTokenResponse {
            token: token.into_string(),
        })
    }

    /// Fully validate `raw` as a token of type `expected`:
    /// structure, signature, time claims, type and, for refresh and sliding
    /// tokens, revocation.
    pub async fn validate(&self, raw: &str, expected: TokenType) -> Result<Token, TokenError> {
        self.validate_any(raw, &[expected]).await
    }

    /// Like [`TokenService::validate`], accepting any of `accepted` types.
    /// The token is judged by the rules of the type it declares.
    pub async fn validate_any(
        &self,
        raw: &str,
        accepted: &[TokenType],
    ) -> Result<Token, TokenError> {
        let token = self.decode_verified(raw)?;
        let declared = token.token_type()?;
        let expected = if accepted.contains(&declared) {
            declared
        } else {
            *accepted.first().ok_or(TokenError::MalformedToken)?
        };
        token.validate_as(expected, &self.validation())?;
        self.check_not_blacklisted(&token).await?;
        Ok(token)
    }

    /// Signature, time and revocation checks without a type requirement.
    pub async fn validate_untyped(&self, raw: &str) -> Result<Token, TokenError> {
        let token = self.decode_verified(raw)?;
        token.validate_untyped(&self.validation())?;
        self.check_not_blacklisted(&token).await?;
        Ok(token)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// With rotation enabled a new refresh token is issued as well; with
    /// blacklist-after-rotation the presented one is blacklisted first and
    /// the exchange aborts with `RotationFailed` if that cannot be recorded.
    pub async fn exchange(&self, raw_refresh: &str) -> Result<RefreshedTokens, TokenError> {
        let refresh = self.validate(raw_refresh, TokenType::Refresh).await?;
        let identity = refresh.claims().identity(self.cfg.user_id_claim())?;
        let inherited = refresh.claims().inheritable();

        if self.cfg.rotate_refresh_tokens() && self.cfg.blacklist_after_rotation() {
            self.consume(&refresh).await?;
        }

        let access = self.mint(TokenType::Access, &identity, inherited.clone())?;

        let rotated = if self.cfg.rotate_refresh_tokens() {
            let next = self.mint(TokenType::Refresh, &identity, inherited)?;
            self.record_outstanding(&next, &identity)
                .await
                .map_err(|e| TokenError::RotationFailed(e.to_string()))?;
            info!(
                identity = %identity,
                consumed = refresh.jti()?,
                issued = next.jti()?,
                "rotated refresh token"
            );
            Some(next.into_string())
        } else {
            None
        };

        Ok(RefreshedTokens {
            access: access.into_string(),
            refresh: rotated,
        })
    }

    async fn consume(&self, refresh: &Token) -> Result<(), TokenError> {
        let store = self
            .blacklist
            .as_ref()
            .ok_or_else(|| TokenError::RotationFailed("no blacklist store".into()))?;
        match store.blacklist(refresh.jti()?).await {
            Ok(()) => Ok(()),
            Err(BlacklistStoreError::AlreadyBlacklisted) => {
                warn!(jti = refresh.jti()?, "refresh token replayed after rotation");
                Err(TokenError::Blacklisted)
            }
            Err(BlacklistStoreError::Unavailable(msg)) => Err(TokenError::RotationFailed(msg)),
        }
    }

    /// Extend a sliding token. The result keeps the `jti` and identity and
    /// gets `exp = min(now + sliding lifetime, refresh_exp)`.
    ///
    /// Once `refresh_exp` has passed every attempt fails with `TokenExpired`.
    pub async fn refresh_sliding(&self, raw: &str) -> Result<SlidingTokenResponse, TokenError> {
        let token = self.decode_verified(raw)?;
        let v = self.validation();
        token.validate_refreshable(&v)?;
        self.check_not_blacklisted(&token).await?;

        let claims = token.extended_claims(v.now, self.cfg.sliding_ttl())?;
        let extended = self.sign_claims(claims)?;
        debug!(jti = extended.jti()?, "extended sliding token");
        Ok(SlidingTokenResponse {
            token: extended.into_string(),
        })
    }

    /// Revoke one refresh or sliding token (logout).
    pub async fn blacklist_token(&self, raw: &str) -> Result<(), TokenError> {
        let store = self
            .blacklist
            .as_ref()
            .ok_or_else(|| TokenError::StoreUnavailable("no blacklist store".into()))?;
        let token = self.validate_untyped(raw).await?;
        let found = token.token_type()?;
        if !found.is_revocable() {
            return Err(TokenError::WrongTokenType {
                expected: TokenType::Refresh,
                found,
            });
        }
        match store.blacklist(token.jti()?).await {
            Ok(()) => {
                info!(jti = token.jti()?, "blacklisted token");
                Ok(())
            }
            Err(BlacklistStoreError::AlreadyBlacklisted) => Err(TokenError::Blacklisted),
            Err(BlacklistStoreError::Unavailable(msg)) => Err(TokenError::StoreUnavailable(msg)),
        }
    }

    /// Blacklist every outstanding token recorded for `identity`.
    /// Returns how many were newly blacklisted.
    pub async fn blacklist_outstanding_for(&self, identity: &str) -> Result<usize, TokenError> {
        let store = self
            .blacklist
            .as_ref()
            .ok_or_else(|| TokenError::StoreUnavailable("no blacklist store".into()))?;
        let jtis = store
            .outstanding_for(identity)
            .await
            .map_err(|e| TokenError::StoreUnavailable(e.to_string()))?;

        let mut revoked = 0;
        for jti in &jtis {
            match store.blacklist(jti).await {
                Ok(()) => revoked += 1,
                Err(BlacklistStoreError::AlreadyBlacklisted) => {}
                Err(BlacklistStoreError::Unavailable(msg)) => {
                    return Err(TokenError::StoreUnavailable(msg))
                }
            }
        }
        info!(identity, revoked, "blacklisted outstanding tokens");
        Ok(revoked)
    }

    /// Housekeeping: drop outstanding records for tokens past their final
    /// expiry. The cutoff trails the clock by the leeway: a blacklist entry
    /// outlives every moment its token could still validate.
    pub async fn flush_expired(&self) -> Result<usize, TokenError> {
        let Some(store) = &self.blacklist else {
            return Ok(0);
        };
        let now = self.clock.now();
        let cutoff = now
            .checked_sub_signed(self.cfg.leeway())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        store
            .flush_expired(cutoff)
            .await
            .map_err(|e| TokenError::StoreUnavailable(e.to_string()))
    }
}
