//! Microblog backend and native client.
//!
//! The heart of the crate is the credential lifecycle: short-lived access
//! tokens gate every protected route, while long-lived single-use refresh
//! tokens carry the session across access expiries. Posts, comments, and
//! likes ride on top of that gate.
//!
//! ## Modules
//!
//! - `core`: identifiers, shared constants, runtime helpers
//! - `auth`: token issuance, rotation, validation, accounts
//! - `feed`: posts, comments, likes
//! - `media`: uploaded file persistence
//! - `muse`: generated post drafts
//! - `server`: HTTP surface
//! - `client`: native session manager and REST client

pub mod auth;
pub mod core;

#[cfg(feature = "database")]
pub mod feed;
#[cfg(feature = "database")]
pub mod media;
#[cfg(feature = "database")]
pub mod muse;
#[cfg(feature = "database")]
pub mod pg;
#[cfg(feature = "database")]
pub mod server;

#[cfg(feature = "client")]
pub mod client;

pub use self::core::*;
