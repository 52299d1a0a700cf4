use super::*;
use crate::auth::Auth;
use crate::core::ID;
use crate::core::Unique;
use crate::media;
use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

/// Multipart body of POST /posts.
#[derive(MultipartForm)]
pub struct PostForm {
    pub content: Option<Text<String>>,
    pub media: Option<TempFile>,
}

/// Multipart body of PUT /posts/{id}. A present `removeMedia` field
/// clears stored media unless a replacement file rides along.
#[derive(MultipartForm)]
pub struct PostEdit {
    pub content: Option<Text<String>>,
    pub media: Option<TempFile>,
    #[multipart(rename = "removeMedia")]
    pub remove_media: Option<Text<String>>,
}

pub async fn posts(db: web::Data<Arc<Client>>, query: web::Query<FeedQuery>) -> impl Responder {
    let listed = db
        .posts(
            query.user.map(ID::from),
            query.last.map(ID::from),
            query.limit,
        )
        .await;
    match listed {
        Ok(ids) => HttpResponse::Ok().json(serde_json::json!({
            "posts": ids
                .iter()
                .map(|id| serde_json::json!({"_id": id.to_string()}))
                .collect::<Vec<_>>()
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn post(db: web::Data<Arc<Client>>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match db.post(ID::from(path.into_inner())).await {
        Ok(Some(post)) => HttpResponse::Ok().json(PostBody::from(&post)),
        Ok(None) => HttpResponse::NotFound().body("Not Found"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn publish(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    MultipartForm(form): MultipartForm<PostForm>,
) -> impl Responder {
    if form.media.as_ref().is_some_and(|m| !media::accepts(m)) {
        return HttpResponse::BadRequest().body("File Type Unsupported");
    }
    let Some(content) = form.content else {
        return HttpResponse::BadRequest().body("Missing Arguments");
    };
    let stored = match &form.media {
        Some(file) => match media::persist(file, media::MEDIA) {
            Ok(path) => Some(path),
            Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        },
        None => None,
    };
    let post = Post::new(ID::default(), auth.user(), content.into_inner(), stored);
    match db.publish(&post).await {
        Ok(()) => HttpResponse::Created().json(PostBody::from(&post)),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn revise(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
    MultipartForm(form): MultipartForm<PostEdit>,
) -> impl Responder {
    if form.media.as_ref().is_some_and(|m| !media::accepts(m)) {
        return HttpResponse::BadRequest().body("File Type Unsupported");
    }
    let id = ID::from(path.into_inner());
    let before = match db.post(id).await {
        Ok(Some(post)) => post,
        Ok(None) => return HttpResponse::NotFound().finish(),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    if before.author() != auth.user() {
        return HttpResponse::Forbidden().finish();
    }
    let stored = match &form.media {
        Some(file) => match media::persist(file, media::MEDIA) {
            Ok(path) => Some(path),
            Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        },
        None => None,
    };
    let clear = form.remove_media.is_some() && stored.is_none();
    let content = form.content.as_ref().map(|c| c.as_str());
    match db
        .revise(id, auth.user(), content, stored.as_deref(), clear)
        .await
    {
        Ok(Some(old)) => {
            if stored.is_some() || clear {
                if let Some(replaced) = old.media() {
                    media::unlink(replaced);
                }
            }
            HttpResponse::Ok().json(PostBody::from(&old))
        }
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn retract(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> impl Responder {
    let id = ID::from(path.into_inner());
    let before = match db.post(id).await {
        Ok(Some(post)) => post,
        Ok(None) => return HttpResponse::NotFound().body("Not Found"),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    if before.author() != auth.user() {
        return HttpResponse::Forbidden().finish();
    }
    match db.retract(id, auth.user()).await {
        Ok(Some(deleted)) => {
            if let Some(stored) = deleted.media() {
                media::unlink(stored);
            }
            log::info!("retracted post {}", deleted.id());
            HttpResponse::Ok().json(PostBody::from(&deleted))
        }
        Ok(None) => HttpResponse::NotFound().body("Not Found"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn comments(
    db: web::Data<Arc<Client>>,
    query: web::Query<CommentQuery>,
) -> impl Responder {
    let listed = db
        .comments(
            query.post.map(ID::from),
            query.user.map(ID::from),
            query.not_user.map(ID::from),
            query.last.map(ID::from),
            query.limit,
        )
        .await;
    match listed {
        Ok(ids) => HttpResponse::Ok().json(serde_json::json!({
            "comments": ids
                .iter()
                .map(|id| serde_json::json!({"_id": id.to_string()}))
                .collect::<Vec<_>>()
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn comment_count(
    db: web::Data<Arc<Client>>,
    query: web::Query<CountQuery>,
) -> impl Responder {
    match db
        .count_comments(query.post.map(ID::from), query.user.map(ID::from))
        .await
    {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({"count": count})),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn comment(db: web::Data<Arc<Client>>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match db.comment(ID::from(path.into_inner())).await {
        Ok(Some(comment)) => HttpResponse::Ok().json(CommentBody::from(&comment)),
        Ok(None) => HttpResponse::NotFound().body("not found"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn remark(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    req: web::Json<CommentRequest>,
) -> impl Responder {
    let (Some(post), Some(content)) = (req.post, &req.content) else {
        return HttpResponse::BadRequest().body("Missing Arguments");
    };
    let comment = Comment::new(
        ID::default(),
        auth.user(),
        ID::from(post),
        content.clone(),
    );
    match db.remark(&comment).await {
        Ok(()) => HttpResponse::Created().json(CommentBody::from(&comment)),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn amend(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
    req: web::Json<CommentUpdate>,
) -> impl Responder {
    let Some(content) = &req.content else {
        return HttpResponse::BadRequest().body("Missing Arguments");
    };
    let id = ID::from(path.into_inner());
    let before = match db.comment(id).await {
        Ok(Some(comment)) => comment,
        Ok(None) => return HttpResponse::NotFound().finish(),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    if before.author() != auth.user() {
        return HttpResponse::Forbidden().finish();
    }
    match db.amend(id, auth.user(), content).await {
        Ok(Some(old)) => HttpResponse::Ok().json(CommentBody::from(&old)),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn erase(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> impl Responder {
    let id = ID::from(path.into_inner());
    let before = match db.comment(id).await {
        Ok(Some(comment)) => comment,
        Ok(None) => return HttpResponse::NotFound().finish(),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    if before.author() != auth.user() {
        return HttpResponse::Forbidden().finish();
    }
    match db.erase(id, auth.user()).await {
        Ok(Some(deleted)) => HttpResponse::Ok().json(CommentBody::from(&deleted)),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn liked(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> impl Responder {
    let like = Like::new(auth.user(), ID::from(path.into_inner()));
    match db.liked(&like).await {
        Ok(liked) => HttpResponse::Ok().json(serde_json::json!({"liked": liked})),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn like_count(
    db: web::Data<Arc<Client>>,
    path: web::Path<uuid::Uuid>,
) -> impl Responder {
    match db.count_likes(ID::from(path.into_inner())).await {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({"count": count})),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn like(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> impl Responder {
    let like = Like::new(auth.user(), ID::from(path.into_inner()));
    match db.like(&like).await {
        Ok(true) => HttpResponse::Created().finish(),
        Ok(false) => HttpResponse::Conflict().body("Post Already Liked"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn unlike(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> impl Responder {
    let like = Like::new(auth.user(), ID::from(path.into_inner()));
    match db.unlike(&like).await {
        Ok(true) => HttpResponse::Ok().finish(),
        Ok(false) => HttpResponse::NotFound().body("Not Found"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
