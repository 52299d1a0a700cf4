//! Microblog Server Binary
//!
//! Runs the HTTP server for accounts, sessions, posts, comments, likes,
//! and generated drafts. Serves uploaded media from `public/`.

use warble::*;

#[tokio::main]
async fn main() {
    log();
    kys();
    server::run().await.unwrap();
}
