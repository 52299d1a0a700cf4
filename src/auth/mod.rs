//! Credential and session lifecycle.
//!
//! JWT-based authentication with Argon2 password hashing. An access token
//! is a short-lived stateless proof; a refresh token is a long-lived,
//! single-use, server-tracked grant that can mint the next pair.
//!
//! ## Identity
//!
//! - `Account`: Registered user with credentials
//! - `Profile`: Public view of an account
//! - `Session`: One tracked refresh token
//!
//! ## Security
//!
//! - `Crypto`: Signing and verification for both token kinds
//! - `AccessClaims` / `RefreshClaims`: Token payloads
//! - `password`: Argon2 hashing and verification
//! - `rotation`: Login, refresh rotation, and logout protocol
mod account;
mod claims;
mod crypto;
mod dto;
mod error;
pub mod password;
mod session;

pub use account::*;
pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use session::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;
#[cfg(feature = "database")]
pub mod rotation;
#[cfg(all(test, feature = "database"))]
pub(crate) mod memory;

#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use middleware::*;

#[cfg(feature = "database")]
mod google;
#[cfg(feature = "database")]
pub use google::*;
#[cfg(feature = "database")]
mod handlers;
#[cfg(feature = "database")]
pub use handlers::*;
