//! PostgreSQL connectivity and schema management.
//!
//! ## Connectivity
//!
//! - `db()`: Establishes a database connection from `DB_URL`
//!
//! ## Schema
//!
//! - `Schema`: Table metadata and DDL generation per entity
//! - `migrate()`: Creates all tables and indices idempotently
//!
//! ## Table Names
//!
//! Constants for all persistent entities: users, tokens, posts, comments,
//! and likes. SQL throughout the crate is assembled at compile time from
//! these via `const_format::concatcp!`.

use std::sync::Arc;
use tokio_postgres::Client;

/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str` so DDL is constructed at compile time.
/// The trait contains no I/O; `migrate()` executes the statements.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the `DB_URL` environment variable.
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
///
/// # Panics
///
/// Panics if `DB_URL` is not set or if connection fails.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// Creates every table and index the crate persists to.
/// Ordered so foreign keys always reference an existing table.
pub async fn migrate(client: &Client) -> Result<(), PgErr> {
    log::info!("running migrations");
    client.batch_execute(crate::auth::Account::creates()).await?;
    client.batch_execute(crate::auth::Account::indices()).await?;
    client.batch_execute(crate::auth::Session::creates()).await?;
    client.batch_execute(crate::auth::Session::indices()).await?;
    client.batch_execute(crate::feed::Post::creates()).await?;
    client.batch_execute(crate::feed::Post::indices()).await?;
    client.batch_execute(crate::feed::Comment::creates()).await?;
    client.batch_execute(crate::feed::Comment::indices()).await?;
    client.batch_execute(crate::feed::Like::creates()).await?;
    client.batch_execute(crate::feed::Like::indices()).await?;
    Ok(())
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:    &str = "users";
/// Table for live refresh tokens. Row membership is the sole authority a
/// refresh token has; deleting the row revokes it.
#[rustfmt::skip]
pub const TOKENS:   &str = "tokens";
/// Table for published posts.
#[rustfmt::skip]
pub const POSTS:    &str = "posts";
/// Table for comments on posts.
#[rustfmt::skip]
pub const COMMENTS: &str = "comments";
/// Table for post likes, keyed (user, post).
#[rustfmt::skip]
pub const LIKES:    &str = "likes";
