//! HTTP surface: request/response schemas, handlers, and route wiring.
//!
//! Responses follow the envelope convention of the original API:
//! `result` 1/0 everywhere except login/register, which use `success`
//! for legacy client compatibility.

pub mod posts;
pub mod reports;
pub mod users;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;

/// Bare success envelope.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub result: u8,
}

impl Ack {
    pub fn ok() -> Self {
        Self { result: 1 }
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Ack::ok())
}

/// Register every route and the shared body-deserialization boundary.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed or unparseable bodies get the same envelope as every
    // other validation failure.
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _| AppError::Validation(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/", web::get().to(index))
        .service(
            web::scope("/users")
                .route("/login", web::post().to(users::login))
                .route("/logout", web::post().to(users::logout))
                .route("/register", web::post().to(users::register))
                .route("/by_id/{user_id}", web::get().to(users::get_by_id))
                .route("/register_fcm", web::post().to(users::register_fcm)),
        )
        .service(
            web::scope("/posts")
                .route("/all", web::get().to(posts::all))
                .route("/by_id/{post_id}", web::get().to(posts::by_id))
                .route("/search/{start}/{end}", web::get().to(posts::search))
                .route("/my_page", web::get().to(posts::my_page))
                .route("/create", web::post().to(posts::create))
                .route("/add_passenger", web::post().to(posts::add_passenger))
                .route("/add_driver", web::post().to(posts::add_driver))
                .route("/update/{post_id}", web::put().to(posts::replace_by_path)),
        )
        // Legacy singular path kept for client compatibility.
        .route("/post/update", web::post().to(posts::replace))
        .route("/report", web::post().to(reports::create));
}
