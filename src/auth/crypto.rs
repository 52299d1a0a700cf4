use super::*;
use crate::core::ID;

/// One issued access/refresh pair plus its subject.
///
/// Pure value: issuing a grant does not persist anything. The caller is
/// responsible for tracking the refresh half before handing it out.
#[derive(Debug, Clone)]
pub struct Grant {
    pub user: ID<Account>,
    pub access: String,
    pub refresh: String,
}

/// Signing and verification state for both token kinds.
///
/// Access and refresh tokens are signed with independent secrets so one
/// kind cannot pass for the other even if claims happen to line up.
pub struct Crypto {
    access_encoding: jsonwebtoken::EncodingKey,
    access_decoding: jsonwebtoken::DecodingKey,
    refresh_encoding: jsonwebtoken::EncodingKey,
    refresh_decoding: jsonwebtoken::DecodingKey,
    access_ttl: std::time::Duration,
    refresh_ttl: std::time::Duration,
}

impl Crypto {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access_encoding: jsonwebtoken::EncodingKey::from_secret(access_secret),
            access_decoding: jsonwebtoken::DecodingKey::from_secret(access_secret),
            refresh_encoding: jsonwebtoken::EncodingKey::from_secret(refresh_secret),
            refresh_decoding: jsonwebtoken::DecodingKey::from_secret(refresh_secret),
            access_ttl: crate::core::ACCESS_TTL,
            refresh_ttl: crate::core::REFRESH_TTL,
        }
    }

    /// Secrets from ACCESS_TOKEN_SECRET / REFRESH_TOKEN_SECRET, lifetimes
    /// from ACCESS_TTL_SECS / REFRESH_TTL_SECS where set.
    pub fn from_env() -> Self {
        let access = std::env::var("ACCESS_TOKEN_SECRET").unwrap_or_else(|_| String::default());
        let refresh = std::env::var("REFRESH_TOKEN_SECRET").unwrap_or_else(|_| String::default());
        Self {
            access_ttl: Self::ttl("ACCESS_TTL_SECS", crate::core::ACCESS_TTL),
            refresh_ttl: Self::ttl("REFRESH_TTL_SECS", crate::core::REFRESH_TTL),
            ..Self::new(access.as_bytes(), refresh.as_bytes())
        }
    }

    fn ttl(var: &str, default: std::time::Duration) -> std::time::Duration {
        std::env::var(var)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(std::time::Duration::from_secs)
            .unwrap_or(default)
    }

    /// Mint a fresh pair for the user. Nothing is persisted here.
    pub fn issue(&self, user: ID<Account>) -> Result<Grant, jsonwebtoken::errors::Error> {
        let access = self.encode_access(&AccessClaims::new(user, self.access_ttl))?;
        let refresh = self.encode_refresh(&RefreshClaims::new(user, self.refresh_ttl))?;
        Ok(Grant {
            user,
            access,
            refresh,
        })
    }

    pub fn encode_access(
        &self,
        claims: &AccessClaims,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            claims,
            &self.access_encoding,
        )
    }
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<AccessClaims>(
            token,
            &self.access_decoding,
            &jsonwebtoken::Validation::default(),
        )
        .map(|data| data.claims)
    }
    pub fn encode_refresh(
        &self,
        claims: &RefreshClaims,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            claims,
            &self.refresh_encoding,
        )
    }
    pub fn decode_refresh(
        &self,
        token: &str,
    ) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<RefreshClaims>(
            token,
            &self.refresh_decoding,
            &jsonwebtoken::Validation::default(),
        )
        .map(|data| data.claims)
    }

    /// Short stable digest of a token, safe to write to logs.
    pub fn fingerprint(token: &str) -> String {
        use sha2::Digest;
        sha2::Sha256::digest(token.as_bytes())
            .iter()
            .take(6)
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> Crypto {
        Crypto::new(b"access-secret", b"refresh-secret")
    }

    #[test]
    fn issued_pair_decodes_to_subject() {
        let crypto = crypto();
        let user = ID::default();
        let grant = crypto.issue(user).unwrap();
        assert_eq!(crypto.decode_access(&grant.access).unwrap().user(), user);
        assert_eq!(crypto.decode_refresh(&grant.refresh).unwrap().user(), user);
    }

    #[test]
    fn kinds_do_not_cross_verify() {
        let crypto = crypto();
        let grant = crypto.issue(ID::default()).unwrap();
        assert!(crypto.decode_access(&grant.refresh).is_err());
        assert!(crypto.decode_refresh(&grant.access).is_err());
    }

    #[test]
    fn long_expired_token_fails_signature_validation() {
        let crypto = crypto();
        let now = crate::core::now();
        let stale = AccessClaims {
            sub: uuid::Uuid::now_v7(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = crypto.encode_access(&stale).unwrap();
        assert!(crypto.decode_access(&token).is_err());
    }

    #[test]
    fn just_expired_token_caught_by_claims_check() {
        // inside the decoder's leeway window, so only expired() flags it
        let crypto = crypto();
        let now = crate::core::now();
        let stale = AccessClaims {
            sub: uuid::Uuid::now_v7(),
            iat: now - 900,
            exp: now - 10,
        };
        let token = crypto.encode_access(&stale).unwrap();
        let claims = crypto.decode_access(&token).unwrap();
        assert!(claims.expired());
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let grant = crypto().issue(ID::default()).unwrap();
        let a = Crypto::fingerprint(&grant.refresh);
        let b = Crypto::fingerprint(&grant.refresh);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }
}
