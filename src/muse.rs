//! Draft generation in the caller's own voice.
//!
//! Feeds the author's latest posts to the Gemini REST API and returns a
//! single suggested post. Purely advisory: nothing here is persisted,
//! the client decides whether to publish the draft.

use crate::auth::Auth;
use crate::core::MUSE_CONTEXT;
use crate::feed::FeedStore;
use crate::feed::Post;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Debug, serde::Deserialize)]
struct Generated {
    candidates: Vec<Candidate>,
}
#[derive(Debug, serde::Deserialize)]
struct Candidate {
    content: Content,
}
#[derive(Debug, serde::Deserialize)]
struct Content {
    parts: Vec<Part>,
}
#[derive(Debug, serde::Deserialize)]
struct Part {
    text: String,
}

/// Client for the generative model behind GET /muse.
pub struct Muse {
    http: reqwest::Client,
    key: String,
}

impl Muse {
    /// Key from GEMINI_API_KEY.
    pub fn from_env() -> Self {
        Self {
            http: reqwest::Client::new(),
            key: std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| String::default()),
        }
    }

    /// One generation round trip. Sampling is left wide open so repeated
    /// drafts differ.
    pub async fn draft(&self, posts: &[Post]) -> anyhow::Result<String> {
        let url = format!("{}/{}:generateContent", ENDPOINT, MODEL);
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": Self::prompt(posts)}]}],
            "generationConfig": {
                "temperature": 1,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 8192,
            }
        });
        let response = self
            .http
            .post(&url)
            .query(&[("key", &self.key)])
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(
            response.status().is_success(),
            "model answered {}",
            response.status()
        );
        response
            .json::<Generated>()
            .await?
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("model answered without a candidate"))
    }

    fn prompt(posts: &[Post]) -> String {
        let voice = posts
            .iter()
            .map(|p| format!("- {}", p.content()))
            .collect::<Vec<_>>()
            .join("\n");
        match voice.is_empty() {
            true => String::from(
                "Write a short first post for a microblog account. Reply with the post text only.",
            ),
            false => format!(
                "Here are my recent posts:\n{}\n\nWrite one new post that sounds like me. Reply with the post text only.",
                voice
            ),
        }
    }
}

pub async fn compose(
    db: web::Data<Arc<Client>>,
    muse: web::Data<Muse>,
    auth: Auth,
) -> impl Responder {
    let posts = match db.recent(auth.user(), MUSE_CONTEXT).await {
        Ok(posts) => posts,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    match muse.draft(&posts).await {
        Ok(text) => HttpResponse::Ok().body(text),
        Err(e) => HttpResponse::BadGateway().body(e.to_string()),
    }
}
