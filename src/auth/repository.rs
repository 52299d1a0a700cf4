use super::*;
use crate::core::ID;
use crate::core::Unique;
use crate::pg::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Storage operations behind the credential lifecycle.
/// Abstracts SQL from the protocol in `rotation`.
///
/// `consume` is the load-bearing contract: it must remove
/// the row and report whether it existed as one atomic step, so two
/// concurrent rotations of the same token can never both see success.
#[allow(async_fn_in_trait)]
pub trait CredentialStore {
    async fn taken(&self, email: &str) -> Result<bool, PgErr>;
    async fn create(&self, account: &Account, hashword: &str) -> Result<(), PgErr>;
    async fn lookup(&self, email: &str) -> Result<Option<(Account, String)>, PgErr>;
    async fn fetch(&self, user: ID<Account>) -> Result<Option<Account>, PgErr>;
    /// Applies the given fields and returns the pre-update account.
    async fn update(
        &self,
        user: ID<Account>,
        username: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<Account>, PgErr>;
    /// Arms a refresh token by tracking it.
    async fn grant(&self, session: &Session) -> Result<(), PgErr>;
    /// Atomic remove-if-member. True iff the row existed and is now gone.
    async fn consume(&self, session: &Session) -> Result<bool, PgErr>;
    /// Drops every tracked token for the user. Returns how many fell.
    async fn revoke_all(&self, user: ID<Account>) -> Result<u64, PgErr>;
}

fn account(row: &tokio_postgres::Row) -> Account {
    Account::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, String>(3),
    )
}

impl CredentialStore for Arc<Client> {
    async fn taken(&self, email: &str) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", USERS, " WHERE email = $1"),
            &[&email],
        )
        .await
        .map(|opt| opt.is_some())
    }

    async fn create(&self, new: &Account, hashword: &str) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, username, email, avatar, hashword) VALUES ($1, $2, $3, $4, $5)"
            ),
            &[
                &new.id().inner(),
                &new.username(),
                &new.email(),
                &new.avatar(),
                &hashword,
            ],
        )
        .await
        .map(|_| ())
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Account, String)>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, username, email, avatar, hashword FROM ",
                USERS,
                " WHERE email = $1"
            ),
            &[&email],
        )
        .await
        .map(|opt| opt.map(|row| (account(&row), row.get::<_, String>(4))))
    }

    async fn fetch(&self, user: ID<Account>) -> Result<Option<Account>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, username, email, avatar FROM ",
                USERS,
                " WHERE id = $1"
            ),
            &[&user.inner()],
        )
        .await
        .map(|opt| opt.map(|row| account(&row)))
    }

    async fn update(
        &self,
        user: ID<Account>,
        username: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<Account>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "WITH old AS (SELECT id, username, email, avatar FROM ",
                USERS,
                " WHERE id = $1)
                 UPDATE ",
                USERS,
                " SET username = COALESCE($2, ",
                USERS,
                ".username), avatar = COALESCE($3, ",
                USERS,
                ".avatar)
                 FROM old WHERE ",
                USERS,
                ".id = old.id
                 RETURNING old.id, old.username, old.email, old.avatar"
            ),
            &[&user.inner(), &username, &avatar],
        )
        .await
        .map(|opt| opt.map(|row| account(&row)))
    }

    async fn grant(&self, session: &Session) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!("INSERT INTO ", TOKENS, " (token, user_id) VALUES ($1, $2)"),
            &[&session.token(), &session.user().inner()],
        )
        .await
        .map(|_| ())
    }

    async fn consume(&self, session: &Session) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "DELETE FROM ",
                TOKENS,
                " WHERE token = $1 AND user_id = $2"
            ),
            &[&session.token(), &session.user().inner()],
        )
        .await
        .map(|rows| rows == 1)
    }

    async fn revoke_all(&self, user: ID<Account>) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", TOKENS, " WHERE user_id = $1"),
            &[&user.inner()],
        )
        .await
    }
}
