use crate::core::Arbitrary;
use crate::core::ID;
use crate::core::Unique;

/// Registered user with verified identity.
///
/// The argon2 hashword is a database-only column, never part of the domain
/// type; provider-provisioned accounts store a placeholder hash instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    id: ID<Self>,
    username: String,
    email: String,
    avatar: String,
}

impl Account {
    pub fn new(id: ID<Self>, username: String, email: String, avatar: String) -> Self {
        Self {
            id,
            username,
            email,
            avatar,
        }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn avatar(&self) -> &str {
        &self.avatar
    }
}

impl Unique for Account {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Arbitrary for Account {
    fn random() -> Self {
        let id = ID::<Self>::default();
        Self {
            id,
            username: format!("user-{}", id.inner().simple()),
            email: format!("{}@example.com", id.inner().simple()),
            avatar: String::from("public/avatars/default.png"),
        }
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::pg::*;

    impl Schema for Account {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          UUID PRIMARY KEY,
                    username    VARCHAR(64) NOT NULL,
                    email       VARCHAR(255) UNIQUE NOT NULL,
                    avatar      TEXT NOT NULL,
                    hashword    TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_email ON ",
                USERS,
                " (email);"
            )
        }
    }
}
