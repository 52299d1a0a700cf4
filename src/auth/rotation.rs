//! Login, refresh rotation, and logout.
//!
//! A refresh token is valid only while its row is tracked, and every use
//! removes the row. Rotation consumes the presented token and grants a
//! fresh pair in its place, so each token authorizes at most one renewal.
//! A validly-signed refresh token whose row is already gone is treated as
//! stolen-and-replayed: every live session for that user is revoked.
//! Logout consumes without that escalation, since a repeated logout is a
//! client retry rather than a theft signal.

use super::*;
use crate::core::ID;
use crate::core::Unique;

/// Check credentials and grant a first pair.
///
/// Unknown email and wrong password collapse into the same refusal.
pub async fn login<S: CredentialStore>(
    store: &S,
    crypto: &Crypto,
    email: &str,
    password: &str,
) -> Result<Grant, Denial> {
    match store.lookup(email).await? {
        Some((account, hashword)) if password::verify(password, &hashword) => {
            log::info!("login for {}", account.id());
            admit(store, crypto, account.id()).await
        }
        Some(_) | None => Err(Denial::BadCredentials),
    }
}

/// Mint a pair for the user and track its refresh half.
pub async fn admit<S: CredentialStore>(
    store: &S,
    crypto: &Crypto,
    user: ID<Account>,
) -> Result<Grant, Denial> {
    let grant = crypto.issue(user).map_err(Denial::Signing)?;
    store.grant(&Session::from(&grant)).await?;
    Ok(grant)
}

/// Exchange a tracked refresh token for a fresh pair.
///
/// The consume step is the serialization point: of any number of
/// concurrent presentations of the same token, exactly one removes the
/// row and wins. Losers are refused, and because a validly-signed token
/// without a row means some copy of it already ran, refusal escalates to
/// revoking every session the subject holds.
pub async fn rotate<S: CredentialStore>(
    store: &S,
    crypto: &Crypto,
    refresh: &str,
) -> Result<Grant, Denial> {
    let claims = crypto.decode_refresh(refresh).map_err(|_| Denial::BadToken)?;
    if claims.expired() {
        return Err(Denial::BadToken);
    }
    let user = claims.user();
    match store.fetch(user).await? {
        None => Err(Denial::UnknownUser),
        Some(account) => match store.consume(&Session::new(refresh.to_string(), user)).await? {
            true => admit(store, crypto, account.id()).await,
            false => {
                let revoked = store.revoke_all(user).await?;
                log::warn!(
                    "reuse of refresh token {} for {}; revoked {} live sessions",
                    Crypto::fingerprint(refresh),
                    user,
                    revoked
                );
                Err(Denial::Reuse)
            }
        },
    }
}

/// Consume a tracked refresh token without granting a replacement.
///
/// No reuse escalation here: the other sessions of the user survive a
/// double logout.
pub async fn logout<S: CredentialStore>(
    store: &S,
    crypto: &Crypto,
    refresh: &str,
) -> Result<(), Denial> {
    let claims = crypto.decode_refresh(refresh).map_err(|_| Denial::BadToken)?;
    if claims.expired() {
        return Err(Denial::BadToken);
    }
    match store.consume(&Session::new(refresh.to_string(), claims.user())).await? {
        true => {
            log::info!("logout for {}", claims.user());
            Ok(())
        }
        false => Err(Denial::Reuse),
    }
}
