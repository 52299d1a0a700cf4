use super::*;
use crate::core::ID;
use crate::core::Unique;
use serde::Deserialize;
use serde::Serialize;

/// Full post on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBody {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userID")]
    pub user: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl From<&Post> for PostBody {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().to_string(),
            user: post.author().to_string(),
            content: post.content().to_string(),
            media: post.media().map(str::to_string),
        }
    }
}

/// Full comment on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentBody {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userID")]
    pub user: String,
    #[serde(rename = "postID")]
    pub post: String,
    pub content: String,
}

impl From<&Comment> for CommentBody {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().to_string(),
            user: comment.author().to_string(),
            post: comment.post().to_string(),
            content: comment.content().to_string(),
        }
    }
}

/// Body of POST /comments.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(rename = "postID")]
    pub post: Option<uuid::Uuid>,
    pub content: Option<String>,
}

/// Body of PUT /comments/{id}.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub content: Option<String>,
}

/// Query string of GET /posts.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(rename = "userID")]
    pub user: Option<uuid::Uuid>,
    #[serde(rename = "lastID")]
    pub last: Option<uuid::Uuid>,
    pub limit: Option<i64>,
}

/// Query string of GET /comments.
#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    #[serde(rename = "postID")]
    pub post: Option<uuid::Uuid>,
    #[serde(rename = "userID")]
    pub user: Option<uuid::Uuid>,
    #[serde(rename = "notUserID")]
    pub not_user: Option<uuid::Uuid>,
    #[serde(rename = "lastID")]
    pub last: Option<uuid::Uuid>,
    pub limit: Option<i64>,
}

/// Query string of GET /comments/count.
#[derive(Debug, Default, Deserialize)]
pub struct CountQuery {
    #[serde(rename = "postID")]
    pub post: Option<uuid::Uuid>,
    #[serde(rename = "userID")]
    pub user: Option<uuid::Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Arbitrary;

    #[test]
    fn post_serializes_with_wire_names() {
        let json = serde_json::to_value(PostBody::from(&Post::random())).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("userID").is_some());
        assert!(json.get("content").is_some());
    }

    #[test]
    fn absent_media_is_omitted_not_null() {
        let json = serde_json::to_value(PostBody::from(&Post::random())).unwrap();
        assert!(json.get("media").is_none());
    }

    #[test]
    fn present_media_is_kept() {
        let post = Post::new(
            ID::default(),
            ID::default(),
            String::from("with a picture"),
            Some(String::from("public/media/1.png")),
        );
        let json = serde_json::to_value(PostBody::from(&post)).unwrap();
        assert_eq!(json.get("media").unwrap(), "public/media/1.png");
    }

    #[test]
    fn comment_request_reads_camel_case() {
        let raw = format!(
            r#"{{"postID": "{}", "content": "nice"}}"#,
            uuid::Uuid::now_v7()
        );
        let req: CommentRequest = serde_json::from_str(&raw).unwrap();
        assert!(req.post.is_some());
        assert_eq!(req.content.as_deref(), Some("nice"));
    }
}
