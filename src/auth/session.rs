use super::*;
use crate::core::ID;

/// One tracked refresh token.
///
/// Row membership in the tokens table is the token's entire authority:
/// inserting the row arms it, the conditional single-row DELETE consumes
/// it. A user holds one row per live device session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: ID<Account>,
}

impl Session {
    pub fn new(token: String, user: ID<Account>) -> Self {
        Self { token, user }
    }
    pub fn token(&self) -> &str {
        &self.token
    }
    pub fn user(&self) -> ID<Account> {
        self.user
    }
}

impl From<&Grant> for Session {
    fn from(grant: &Grant) -> Self {
        Self::new(grant.refresh.clone(), grant.user)
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::pg::*;

    impl Schema for Session {
        fn name() -> &'static str {
            TOKENS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                TOKENS,
                " (
                    token       TEXT PRIMARY KEY,
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_tokens_user ON ",
                TOKENS,
                " (user_id);"
            )
        }
    }
}
