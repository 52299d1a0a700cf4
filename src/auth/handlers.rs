use super::*;
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

/// Multipart body of POST /users/register. Fields are optional so their
/// absence answers 400 rather than a deserialization error.
#[derive(MultipartForm)]
pub struct RegisterForm {
    pub username: Option<Text<String>>,
    pub password: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub avatar: Option<TempFile>,
}

/// Multipart body of PUT /users.
#[derive(MultipartForm)]
pub struct UpdateForm {
    pub username: Option<Text<String>>,
    pub avatar: Option<TempFile>,
}

pub async fn register(
    db: web::Data<Arc<Client>>,
    MultipartForm(form): MultipartForm<RegisterForm>,
) -> impl Responder {
    if form.avatar.as_ref().is_some_and(|a| !media::accepts(a)) {
        return HttpResponse::BadRequest().body("File Type Unsupported");
    }
    let (Some(username), Some(password), Some(email), Some(avatar)) =
        (form.username, form.password, form.email, form.avatar)
    else {
        return HttpResponse::BadRequest().body("Missing Arguments");
    };
    match db.taken(&email).await {
        Ok(false) => {}
        Ok(true) => return HttpResponse::Conflict().body("Email Taken"),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    }
    let hashword = match password::hash(&password) {
        Ok(h) => h,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let stored = match media::persist(&avatar, media::AVATARS) {
        Ok(path) => path,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let account = Account::new(
        ID::default(),
        username.into_inner(),
        email.into_inner(),
        stored,
    );
    if let Err(e) = db.create(&account, &hashword).await {
        return HttpResponse::InternalServerError().body(e.to_string());
    }
    log::info!("registered {}", account.id());
    HttpResponse::Created().json(Profile::from(&account))
}

pub async fn login(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let (Some(email), Some(password)) = (&req.email, &req.password) else {
        return HttpResponse::BadRequest().body("Missing Arguments");
    };
    match rotation::login(db.get_ref(), crypto.get_ref(), email, password).await {
        Ok(grant) => HttpResponse::Ok().json(GrantResponse::from(grant)),
        Err(e) if e.refusal() => HttpResponse::Unauthorized()
            .json(serde_json::json!({"error": "Authentication failed"})),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn google_login(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    google: web::Data<Google>,
    req: web::Json<GoogleLoginRequest>,
) -> impl Responder {
    let Some(credential) = &req.credential else {
        return HttpResponse::BadRequest().body("Missing Arguments");
    };
    let identity = match google.verify(credential).await {
        Ok(identity) => identity,
        Err(GoogleRefusal::Unreachable(e)) => {
            return HttpResponse::BadGateway().body(e.to_string());
        }
        Err(_) => {
            return HttpResponse::Unauthorized()
                .json(serde_json::json!({"error": "Authentication failed"}));
        }
    };
    let account = match db.lookup(&identity.email).await {
        Ok(Some((account, _))) => account,
        Ok(None) => {
            // first sign-in through the provider: the account gets a
            // placeholder hashword, so the password path can never match
            let hashword = match password::hash("google-signin") {
                Ok(h) => h,
                Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
            };
            let avatar = match &identity.picture {
                Some(picture) => google
                    .fetch_avatar(picture)
                    .await
                    .unwrap_or_else(|| media::DEFAULT_AVATAR.to_string()),
                None => media::DEFAULT_AVATAR.to_string(),
            };
            let account = Account::new(
                ID::default(),
                identity.name.clone(),
                identity.email.clone(),
                avatar,
            );
            if let Err(e) = db.create(&account, &hashword).await {
                return HttpResponse::InternalServerError().body(e.to_string());
            }
            log::info!("provisioned {} from provider sign-in", account.id());
            account
        }
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    match rotation::admit(db.get_ref(), crypto.get_ref(), account.id()).await {
        Ok(grant) => HttpResponse::Ok().json(GrantResponse::from(grant)),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn refresh(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    req: web::Json<RefreshRequest>,
) -> impl Responder {
    let Some(token) = &req.refresh_token else {
        return HttpResponse::BadRequest().finish();
    };
    match rotation::rotate(db.get_ref(), crypto.get_ref(), token).await {
        Ok(grant) => HttpResponse::Ok().json(GrantResponse::from(grant)),
        Err(e) if e.refusal() => HttpResponse::Forbidden().body("Invalid Request"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn logout(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    req: web::Json<RefreshRequest>,
) -> impl Responder {
    let Some(token) = &req.refresh_token else {
        return HttpResponse::BadRequest().finish();
    };
    match rotation::logout(db.get_ref(), crypto.get_ref(), token).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) if e.refusal() => HttpResponse::Forbidden().body("Invalid Request"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn profile(db: web::Data<Arc<Client>>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match db.fetch(ID::from(path.into_inner())).await {
        Ok(Some(account)) => HttpResponse::Ok().json(Profile::from(&account)),
        Ok(None) => HttpResponse::NotFound().body("User does not exist"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn update(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    MultipartForm(form): MultipartForm<UpdateForm>,
) -> impl Responder {
    if form.avatar.as_ref().is_some_and(|a| !media::accepts(a)) {
        return HttpResponse::BadRequest().body("File Type Unsupported");
    }
    let before = match db.fetch(auth.user()).await {
        Ok(Some(account)) => account,
        Ok(None) => return HttpResponse::NotFound().body("User does not exist"),
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    if form.username.is_none() && form.avatar.is_none() {
        return HttpResponse::BadRequest().body("Missing Arguments");
    }
    let stored = match &form.avatar {
        Some(avatar) => match media::persist(avatar, media::AVATARS) {
            Ok(path) => Some(path),
            Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        },
        None => None,
    };
    let username = form.username.as_ref().map(|u| u.as_str());
    match db.update(auth.user(), username, stored.as_deref()).await {
        Ok(Some(old)) => {
            if stored.is_some() {
                media::unlink(before.avatar());
            }
            HttpResponse::Ok().json(Profile::from(&old))
        }
        Ok(None) => HttpResponse::NotFound().body("User does not exist"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
