use super::*;
use crate::auth::Account;
use crate::core::ID;

/// One like, keyed (user, post). At most one per pair by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Like {
    user: ID<Account>,
    post: ID<Post>,
}

impl Like {
    pub fn new(user: ID<Account>, post: ID<Post>) -> Self {
        Self { user, post }
    }
    pub fn user(&self) -> ID<Account> {
        self.user
    }
    pub fn post(&self) -> ID<Post> {
        self.post
    }
}

mod schema {
    use super::*;
    use crate::pg::*;

    impl Schema for Like {
        fn name() -> &'static str {
            LIKES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                LIKES,
                " (
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    post_id     UUID NOT NULL REFERENCES ",
                POSTS,
                "(id) ON DELETE CASCADE,
                    PRIMARY KEY (user_id, post_id)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_likes_post ON ",
                LIKES,
                " (post_id);"
            )
        }
    }
}
