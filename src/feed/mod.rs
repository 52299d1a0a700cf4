//! Posts, comments, and likes.
//!
//! The public surface of the microblog. Everything here is time-ordered
//! by uuid v7 primary key, so feeds sort and paginate on the id itself.
//!
//! ## Entities
//!
//! - `Post`: Published post with optional media
//! - `Comment`: Comment on a post
//! - `Like`: One (user, post) like
//!
//! ## Storage
//!
//! - `FeedStore`: SQL behind the feed, implemented on `Arc<Client>`
mod comment;
mod dto;
mod handlers;
mod like;
mod post;
mod repository;

pub use comment::*;
pub use dto::*;
pub use handlers::*;
pub use like::*;
pub use post::*;
pub use repository::*;
