//! HTTP server assembly.
//!
//! Wires the credential lifecycle, the feed, drafting, and static media
//! into one actix-web application behind credentials-aware CORS for the
//! browser client.

use crate::auth;
use crate::core::DEFAULT_BIND;
use crate::core::DEFAULT_ORIGIN;
use crate::feed;
use crate::muse;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let client = crate::pg::db().await;
    crate::pg::migrate(&client).await.expect("migrations must apply");
    let crypto = web::Data::new(auth::Crypto::from_env());
    let google = web::Data::new(auth::Google::from_env());
    let muse = web::Data::new(muse::Muse::from_env());
    let client = web::Data::new(client);
    let origin = std::env::var("CLIENT_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
    log::info!("starting server for {}", origin);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allowed_origin(&origin)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials(),
            )
            .app_data(crypto.clone())
            .app_data(google.clone())
            .app_data(muse.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .route("/muse", web::get().to(crate::muse::compose))
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/google-login", web::post().to(auth::google_login))
                    .route("/refresh-token", web::post().to(auth::refresh))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/{id}", web::get().to(auth::profile))
                    .route("", web::put().to(auth::update)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(feed::posts))
                    .route("", web::post().to(feed::publish))
                    .route("/{id}", web::get().to(feed::post))
                    .route("/{id}", web::put().to(feed::revise))
                    .route("/{id}", web::delete().to(feed::retract)),
            )
            .service(
                // fixed segments register ahead of the id catch-all
                web::scope("/comments")
                    .route("/count", web::get().to(feed::comment_count))
                    .route("", web::get().to(feed::comments))
                    .route("", web::post().to(feed::remark))
                    .route("/{id}", web::get().to(feed::comment))
                    .route("/{id}", web::put().to(feed::amend))
                    .route("/{id}", web::delete().to(feed::erase)),
            )
            .service(
                web::scope("/likes")
                    .route("/count/{id}", web::get().to(feed::like_count))
                    .route("/{id}", web::get().to(feed::liked))
                    .route("/{id}", web::post().to(feed::like))
                    .route("/{id}", web::delete().to(feed::unlike)),
            )
            .service(actix_files::Files::new("/public", "public"))
    })
    .workers(num_cpus::get())
    .bind(std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from(DEFAULT_BIND)))?
    .run()
    .await
}
