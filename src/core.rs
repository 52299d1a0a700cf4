//! Core type aliases, traits, and constants for warble.
//!
//! This module provides the foundational types and configuration parameters
//! used throughout the crate.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Unix timestamps carried inside token claims, in whole seconds.
pub type Stamp = i64;
/// Monotonic counter tagging the client session slot. Bumped on every
/// adoption so late responses from superseded requests can be discarded.
pub type Generation = u64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for tests and benchmarks.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
///
/// Defaults to a v7 (time-ordered) UUID, so sorting by id is sorting by
/// creation time. Keyset pagination over the feed leans on this.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> std::str::FromStr for ID<T> {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<uuid::Uuid>().map(Self::from)
    }
}

// ============================================================================
// TOKEN LIFETIMES
// Durations are defaults; ACCESS_TTL_SECS and REFRESH_TTL_SECS override at
// startup. ACCESS_TTL must exceed RENEWAL_PERIOD or a live session can
// strand itself with an expired access token between renewal ticks.
// ============================================================================
/// Access token lifetime. Short, since access tokens cannot be revoked.
pub const ACCESS_TTL: std::time::Duration = std::time::Duration::from_secs(15 * 60);
/// Refresh token lifetime. Bounds how long an idle session survives.
pub const REFRESH_TTL: std::time::Duration = std::time::Duration::from_secs(2 * 24 * 60 * 60);
/// Client-side proactive rotation cadence.
pub const RENEWAL_PERIOD: std::time::Duration = std::time::Duration::from_secs(10 * 60);

// ============================================================================
// WIRE CONVENTIONS
// ============================================================================
/// Cookie carrying the access token on protected requests.
pub const ACCESS_COOKIE: &str = "access-token";
/// Browser origin allowed by CORS when CLIENT_ORIGIN is unset.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3001";
/// Listen address when BIND_ADDR is unset.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

// ============================================================================
// DRAFTING
// ============================================================================
/// How many of the caller's latest posts seed a generated draft.
pub const MUSE_CONTEXT: i64 = 30;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(any(feature = "server", feature = "client"))]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(any(feature = "server", feature = "client"))]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

/// Seconds since the Unix epoch.
pub fn now() -> Stamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs() as Stamp
}
