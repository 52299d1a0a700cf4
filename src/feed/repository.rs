use super::*;
use crate::auth::Account;
use crate::core::ID;
use crate::core::Unique;
use crate::pg::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Repository trait for the feed.
/// Abstracts SQL from the handlers.
///
/// Listing filters bind as nullable parameters, so one prepared statement
/// covers every filter combination; a NULL limit means no limit. Updates
/// return the pre-update row, deletes return the deleted row.
#[allow(async_fn_in_trait)]
pub trait FeedStore {
    async fn publish(&self, post: &Post) -> Result<(), PgErr>;
    async fn post(&self, id: ID<Post>) -> Result<Option<Post>, PgErr>;
    async fn posts(
        &self,
        author: Option<ID<Account>>,
        before: Option<ID<Post>>,
        limit: Option<i64>,
    ) -> Result<Vec<ID<Post>>, PgErr>;
    /// Applies the given fields and returns the pre-update post. Clearing
    /// wins over keeping, a fresh media path wins over clearing.
    async fn revise(
        &self,
        id: ID<Post>,
        author: ID<Account>,
        content: Option<&str>,
        media: Option<&str>,
        clear: bool,
    ) -> Result<Option<Post>, PgErr>;
    /// Owner-gated delete. Comments and likes fall with the post.
    async fn retract(&self, id: ID<Post>, author: ID<Account>) -> Result<Option<Post>, PgErr>;
    /// Latest full posts by one author, newest first.
    async fn recent(&self, author: ID<Account>, limit: i64) -> Result<Vec<Post>, PgErr>;

    async fn remark(&self, comment: &Comment) -> Result<(), PgErr>;
    async fn comment(&self, id: ID<Comment>) -> Result<Option<Comment>, PgErr>;
    async fn comments(
        &self,
        post: Option<ID<Post>>,
        author: Option<ID<Account>>,
        not_author: Option<ID<Account>>,
        before: Option<ID<Comment>>,
        limit: Option<i64>,
    ) -> Result<Vec<ID<Comment>>, PgErr>;
    async fn count_comments(
        &self,
        post: Option<ID<Post>>,
        author: Option<ID<Account>>,
    ) -> Result<i64, PgErr>;
    async fn amend(
        &self,
        id: ID<Comment>,
        author: ID<Account>,
        content: &str,
    ) -> Result<Option<Comment>, PgErr>;
    async fn erase(&self, id: ID<Comment>, author: ID<Account>) -> Result<Option<Comment>, PgErr>;

    /// True iff the like was new. The composite primary key absorbs
    /// duplicate likes without raising.
    async fn like(&self, like: &Like) -> Result<bool, PgErr>;
    /// True iff a like existed and is now gone.
    async fn unlike(&self, like: &Like) -> Result<bool, PgErr>;
    async fn liked(&self, like: &Like) -> Result<bool, PgErr>;
    async fn count_likes(&self, post: ID<Post>) -> Result<i64, PgErr>;
}

fn post(row: &tokio_postgres::Row) -> Post {
    Post::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        row.get::<_, String>(2),
        row.get::<_, Option<String>>(3),
    )
}

fn comment(row: &tokio_postgres::Row) -> Comment {
    Comment::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        ID::from(row.get::<_, uuid::Uuid>(2)),
        row.get::<_, String>(3),
    )
}

impl FeedStore for Arc<Client> {
    async fn publish(&self, new: &Post) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                POSTS,
                " (id, user_id, content, media) VALUES ($1, $2, $3, $4)"
            ),
            &[
                &new.id().inner(),
                &new.author().inner(),
                &new.content(),
                &new.media(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn post(&self, id: ID<Post>) -> Result<Option<Post>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, user_id, content, media FROM ",
                POSTS,
                " WHERE id = $1"
            ),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.map(|row| post(&row)))
    }

    async fn posts(
        &self,
        author: Option<ID<Account>>,
        before: Option<ID<Post>>,
        limit: Option<i64>,
    ) -> Result<Vec<ID<Post>>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT id FROM ",
                POSTS,
                " WHERE ($1::uuid IS NULL OR user_id = $1)
                    AND ($2::uuid IS NULL OR id < $2)
                  ORDER BY id DESC LIMIT $3"
            ),
            &[
                &author.map(|a| a.inner()),
                &before.map(|b| b.inner()),
                &limit,
            ],
        )
        .await
        .map(|rows| {
            rows.iter()
                .map(|row| ID::from(row.get::<_, uuid::Uuid>(0)))
                .collect()
        })
    }

    async fn revise(
        &self,
        id: ID<Post>,
        author: ID<Account>,
        content: Option<&str>,
        media: Option<&str>,
        clear: bool,
    ) -> Result<Option<Post>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "WITH old AS (SELECT id, user_id, content, media FROM ",
                POSTS,
                " WHERE id = $1 AND user_id = $2)
                 UPDATE ",
                POSTS,
                " SET content = COALESCE($3, ",
                POSTS,
                ".content),
                       media = CASE WHEN $5 THEN NULL ELSE COALESCE($4, ",
                POSTS,
                ".media) END
                 FROM old WHERE ",
                POSTS,
                ".id = old.id
                 RETURNING old.id, old.user_id, old.content, old.media"
            ),
            &[&id.inner(), &author.inner(), &content, &media, &clear],
        )
        .await
        .map(|opt| opt.map(|row| post(&row)))
    }

    async fn retract(&self, id: ID<Post>, author: ID<Account>) -> Result<Option<Post>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "DELETE FROM ",
                POSTS,
                " WHERE id = $1 AND user_id = $2 RETURNING id, user_id, content, media"
            ),
            &[&id.inner(), &author.inner()],
        )
        .await
        .map(|opt| opt.map(|row| post(&row)))
    }

    async fn recent(&self, author: ID<Account>, limit: i64) -> Result<Vec<Post>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT id, user_id, content, media FROM ",
                POSTS,
                " WHERE user_id = $1 ORDER BY id DESC LIMIT $2"
            ),
            &[&author.inner(), &limit],
        )
        .await
        .map(|rows| rows.iter().map(|row| post(row)).collect())
    }

    async fn remark(&self, new: &Comment) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                COMMENTS,
                " (id, user_id, post_id, content) VALUES ($1, $2, $3, $4)"
            ),
            &[
                &new.id().inner(),
                &new.author().inner(),
                &new.post().inner(),
                &new.content(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn comment(&self, id: ID<Comment>) -> Result<Option<Comment>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, user_id, post_id, content FROM ",
                COMMENTS,
                " WHERE id = $1"
            ),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.map(|row| comment(&row)))
    }

    async fn comments(
        &self,
        post: Option<ID<Post>>,
        author: Option<ID<Account>>,
        not_author: Option<ID<Account>>,
        before: Option<ID<Comment>>,
        limit: Option<i64>,
    ) -> Result<Vec<ID<Comment>>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT id FROM ",
                COMMENTS,
                " WHERE ($1::uuid IS NULL OR post_id = $1)
                    AND ($2::uuid IS NULL OR user_id = $2)
                    AND ($3::uuid IS NULL OR user_id <> $3)
                    AND ($4::uuid IS NULL OR id < $4)
                  ORDER BY id DESC LIMIT $5"
            ),
            &[
                &post.map(|p| p.inner()),
                &author.map(|a| a.inner()),
                &not_author.map(|n| n.inner()),
                &before.map(|b| b.inner()),
                &limit,
            ],
        )
        .await
        .map(|rows| {
            rows.iter()
                .map(|row| ID::from(row.get::<_, uuid::Uuid>(0)))
                .collect()
        })
    }

    async fn count_comments(
        &self,
        post: Option<ID<Post>>,
        author: Option<ID<Account>>,
    ) -> Result<i64, PgErr> {
        self.query_one(
            const_format::concatcp!(
                "SELECT COUNT(*) FROM ",
                COMMENTS,
                " WHERE ($1::uuid IS NULL OR post_id = $1)
                    AND ($2::uuid IS NULL OR user_id = $2)"
            ),
            &[&post.map(|p| p.inner()), &author.map(|a| a.inner())],
        )
        .await
        .map(|row| row.get::<_, i64>(0))
    }

    async fn amend(
        &self,
        id: ID<Comment>,
        author: ID<Account>,
        content: &str,
    ) -> Result<Option<Comment>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "WITH old AS (SELECT id, user_id, post_id, content FROM ",
                COMMENTS,
                " WHERE id = $1 AND user_id = $2)
                 UPDATE ",
                COMMENTS,
                " SET content = $3
                 FROM old WHERE ",
                COMMENTS,
                ".id = old.id
                 RETURNING old.id, old.user_id, old.post_id, old.content"
            ),
            &[&id.inner(), &author.inner(), &content],
        )
        .await
        .map(|opt| opt.map(|row| comment(&row)))
    }

    async fn erase(&self, id: ID<Comment>, author: ID<Account>) -> Result<Option<Comment>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "DELETE FROM ",
                COMMENTS,
                " WHERE id = $1 AND user_id = $2 RETURNING id, user_id, post_id, content"
            ),
            &[&id.inner(), &author.inner()],
        )
        .await
        .map(|opt| opt.map(|row| comment(&row)))
    }

    async fn like(&self, like: &Like) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                LIKES,
                " (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
            ),
            &[&like.user().inner(), &like.post().inner()],
        )
        .await
        .map(|rows| rows == 1)
    }

    async fn unlike(&self, like: &Like) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "DELETE FROM ",
                LIKES,
                " WHERE user_id = $1 AND post_id = $2"
            ),
            &[&like.user().inner(), &like.post().inner()],
        )
        .await
        .map(|rows| rows == 1)
    }

    async fn liked(&self, like: &Like) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ",
                LIKES,
                " WHERE user_id = $1 AND post_id = $2"
            ),
            &[&like.user().inner(), &like.post().inner()],
        )
        .await
        .map(|opt| opt.is_some())
    }

    async fn count_likes(&self, post: ID<Post>) -> Result<i64, PgErr> {
        self.query_one(
            const_format::concatcp!("SELECT COUNT(*) FROM ", LIKES, " WHERE post_id = $1"),
            &[&post.inner()],
        )
        .await
        .map(|row| row.get::<_, i64>(0))
    }
}
