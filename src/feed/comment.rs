use super::*;
use crate::auth::Account;
use crate::core::ID;
use crate::core::Unique;

/// One comment under a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: ID<Self>,
    author: ID<Account>,
    post: ID<Post>,
    content: String,
}

impl Comment {
    pub fn new(id: ID<Self>, author: ID<Account>, post: ID<Post>, content: String) -> Self {
        Self {
            id,
            author,
            post,
            content,
        }
    }
    pub fn author(&self) -> ID<Account> {
        self.author
    }
    pub fn post(&self) -> ID<Post> {
        self.post
    }
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Unique for Comment {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

mod schema {
    use super::*;
    use crate::pg::*;

    impl Schema for Comment {
        fn name() -> &'static str {
            COMMENTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                COMMENTS,
                " (
                    id          UUID PRIMARY KEY,
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    post_id     UUID NOT NULL REFERENCES ",
                POSTS,
                "(id) ON DELETE CASCADE,
                    content     TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_comments_post ON ",
                COMMENTS,
                " (post_id);
                 CREATE INDEX IF NOT EXISTS idx_comments_user ON ",
                COMMENTS,
                " (user_id);"
            )
        }
    }
}
