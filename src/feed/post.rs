use crate::auth::Account;
use crate::core::Arbitrary;
use crate::core::ID;
use crate::core::Unique;

/// One published post.
///
/// Ids are time-ordered, so the feed sorts and paginates on the primary
/// key without a separate timestamp column. Media is the public path of a
/// stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: ID<Self>,
    author: ID<Account>,
    content: String,
    media: Option<String>,
}

impl Post {
    pub fn new(id: ID<Self>, author: ID<Account>, content: String, media: Option<String>) -> Self {
        Self {
            id,
            author,
            content,
            media,
        }
    }
    pub fn author(&self) -> ID<Account> {
        self.author
    }
    pub fn content(&self) -> &str {
        &self.content
    }
    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }
}

impl Unique for Post {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Arbitrary for Post {
    fn random() -> Self {
        let id = ID::<Self>::default();
        Self {
            id,
            author: ID::default(),
            content: format!("thought {}", id.inner().simple()),
            media: None,
        }
    }
}

mod schema {
    use super::*;
    use crate::pg::*;

    impl Schema for Post {
        fn name() -> &'static str {
            POSTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                POSTS,
                " (
                    id          UUID PRIMARY KEY,
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    content     TEXT NOT NULL,
                    media       TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_posts_user ON ",
                POSTS,
                " (user_id);"
            )
        }
    }
}
