use super::*;

/// Why the credential lifecycle refused a request.
///
/// Protocol denials map to 4xx on the wire; `Signing` and
/// `Storage` are infrastructure apologies and map to 5xx.
#[derive(Debug, thiserror::Error)]
pub enum Denial {
    /// Email and password did not match a stored account. Unknown email
    /// and wrong password are deliberately indistinguishable.
    #[error("authentication failed")]
    BadCredentials,
    /// Token failed signature, format, or expiry verification.
    #[error("token failed verification")]
    BadToken,
    /// Token verified but its subject no longer exists.
    #[error("unknown subject")]
    UnknownUser,
    /// Validly-signed refresh token with no tracked row behind it: either
    /// already rotated, already logged out, or stolen and replayed.
    #[error("refresh token already consumed")]
    Reuse,
    /// Signing-key failure while minting a pair.
    #[error("token issuance failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    /// Store unavailable or statement failed.
    #[cfg(feature = "database")]
    #[error("storage failed: {0}")]
    Storage(#[from] crate::pg::PgErr),
}

impl Denial {
    /// True for refusals of the request itself, false for server faults.
    pub fn refusal(&self) -> bool {
        match self {
            Self::BadCredentials | Self::BadToken | Self::UnknownUser | Self::Reuse => true,
            Self::Signing(_) => false,
            #[cfg(feature = "database")]
            Self::Storage(_) => false,
        }
    }
}
