use super::*;
use crate::core::ID;
use crate::core::Stamp;

/// Payload of an access token.
///
/// Validation is signature plus expiry, never a store lookup, so the
/// subject here is the whole of the request identity.
/// Unknown fields are rejected so a refresh token never deserializes as an
/// access token.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessClaims {
    pub sub: uuid::Uuid,
    pub iat: Stamp,
    pub exp: Stamp,
}

impl AccessClaims {
    pub fn new(user: ID<Account>, ttl: std::time::Duration) -> Self {
        let now = crate::core::now();
        Self {
            sub: user.inner(),
            iat: now,
            exp: now + ttl.as_secs() as Stamp,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < crate::core::now()
    }
    pub fn user(&self) -> ID<Account> {
        ID::from(self.sub)
    }
}

/// Payload of a refresh token.
///
/// The nonce keeps back-to-back grants for the same user textually
/// distinct. Authority comes from the tracked row, not from these claims:
/// a validly-signed refresh token with no row behind it is a reuse signal.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RefreshClaims {
    pub sub: uuid::Uuid,
    pub jti: u64,
    pub iat: Stamp,
    pub exp: Stamp,
}

impl RefreshClaims {
    pub fn new(user: ID<Account>, ttl: std::time::Duration) -> Self {
        use rand::Rng;
        let now = crate::core::now();
        Self {
            sub: user.inner(),
            jti: rand::rng().random(),
            iat: now,
            exp: now + ttl.as_secs() as Stamp,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < crate::core::now()
    }
    pub fn user(&self) -> ID<Account> {
        ID::from(self.sub)
    }
}
