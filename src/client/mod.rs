//! Native client for a warble server.
//!
//! ## Components
//!
//! - `Gateway` / `ApiClient`: Wire calls to the credential endpoints
//! - `Vault`: Disk persistence of remembered credentials
//! - `SessionManager`: One live session with background renewal
//! - `CLI`: Interactive terminal client
mod api;
mod cli;
mod manager;
mod vault;

pub use api::*;
pub use cli::*;
pub use manager::*;
pub use vault::*;
