//! Interactive Client Binary
//!
//! Terminal client for a running server. Resumes a remembered session,
//! keeps it fresh in the background, and drives the feed from a prompt.

use warble::*;

#[tokio::main]
async fn main() {
    log();
    kys();
    client::CLI::new().run().await;
}
