//! Ride post handlers.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Ack;
use crate::error::{AppError, Result};
use crate::middleware::SessionUser;
use crate::models::{NewPost, Post};
use crate::state::AppState;

/// A post document as clients submit it. The `id` is only meaningful
/// for the full-update endpoint; `driver`, `uploader`, and `passengers`
/// are ignored on creation, where the server decides slot assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct PostBody {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub depart_time: DateTime<Utc>,
    #[validate(length(min = 1, message = "start is required"))]
    pub start: String,
    #[validate(length(min = 1, message = "dest is required"))]
    pub dest: String,
    #[serde(default)]
    pub memo: String,
    pub driver_needed: bool,
    #[serde(default)]
    pub driver: Option<Uuid>,
    #[serde(default)]
    pub uploader: Option<Uuid>,
    #[serde(default)]
    pub passengers: Vec<Uuid>,
    #[validate(range(min = 1, message = "total_seats must be positive"))]
    pub total_seats: i32,
}

impl PostBody {
    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))
    }

    /// Full replacement document. Fields the client may not dictate on
    /// creation are taken verbatim here, as full update is trusted by
    /// contract; a missing uploader falls back to the caller.
    fn into_post(self, id: Uuid, caller: Uuid) -> Post {
        Post {
            id,
            // Server-owned; the storage layer never writes it on replace.
            created_at: Utc::now(),
            depart_time: self.depart_time,
            start: self.start,
            dest: self.dest,
            memo: self.memo,
            driver_needed: self.driver_needed,
            driver: self.driver,
            uploader: self.uploader.unwrap_or(caller),
            passengers: self.passengers,
            total_seats: self.total_seats,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub post: PostBody,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub result: u8,
    pub post_id: Uuid,
}

/// POST /posts/create
pub async fn create(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner().post;
    body.check()?;

    let new_post = NewPost::from_submission(
        user.user_id,
        body.depart_time,
        body.start,
        body.dest,
        body.memo,
        body.driver_needed,
        body.passengers,
        body.total_seats,
    );

    let post = state.post_service().create(new_post).await?;

    Ok(HttpResponse::Ok().json(CreatePostResponse {
        result: 1,
        post_id: post.id,
    }))
}

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub result: u8,
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub result: u8,
    pub post: Post,
}

/// GET /posts/all
pub async fn all(state: web::Data<AppState>, _user: SessionUser) -> Result<HttpResponse> {
    let posts = state.posts.list_all().await?;
    Ok(HttpResponse::Ok().json(PostsResponse { result: 1, posts }))
}

/// GET /posts/by_id/{post_id}
pub async fn by_id(
    state: web::Data<AppState>,
    _user: SessionUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match state.posts.find_by_id(path.into_inner()).await? {
        Some(post) => Ok(HttpResponse::Ok().json(PostResponse { result: 1, post })),
        None => Err(AppError::NotFound("post not found".into())),
    }
}

/// GET /posts/search/{start}/{end}
pub async fn search(
    state: web::Data<AppState>,
    _user: SessionUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (start, end) = path.into_inner();
    let posts = state.posts.search(&start, &end).await?;
    Ok(HttpResponse::Ok().json(PostsResponse { result: 1, posts }))
}

/// GET /posts/my_page — posts the caller uploads, drives, or rides on.
pub async fn my_page(state: web::Data<AppState>, user: SessionUser) -> Result<HttpResponse> {
    let posts = state.posts.list_for_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(PostsResponse { result: 1, posts }))
}

#[derive(Debug, Deserialize)]
pub struct AddPassengerRequest {
    #[serde(default)]
    pub post_id: Option<Uuid>,
}

/// POST /posts/add_passenger
pub async fn add_passenger(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<AddPassengerRequest>,
) -> Result<HttpResponse> {
    let post_id = body
        .post_id
        .ok_or_else(|| AppError::Validation("post_id is required".into()))?;

    state
        .post_service()
        .add_passenger(user.user_id, post_id)
        .await?;

    Ok(HttpResponse::Ok().json(Ack::ok()))
}

#[derive(Debug, Deserialize)]
pub struct AddDriverRequest {
    #[serde(default)]
    pub post_id: Option<Uuid>,
    /// Seats the driver offers; replaces the post's seat count.
    #[serde(default)]
    pub avail: Option<i32>,
}

/// POST /posts/add_driver
pub async fn add_driver(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<AddDriverRequest>,
) -> Result<HttpResponse> {
    let post_id = body
        .post_id
        .ok_or_else(|| AppError::Validation("post_id is required".into()))?;
    let avail = body
        .avail
        .ok_or_else(|| AppError::Validation("avail is required".into()))?;
    if avail < 1 {
        return Err(AppError::Validation("avail must be positive".into()));
    }

    state
        .post_service()
        .add_driver(user.user_id, post_id, avail)
        .await?;

    Ok(HttpResponse::Ok().json(Ack::ok()))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub post: PostBody,
}

/// POST /post/update — full replacement, id taken from the body.
pub async fn replace(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner().post;
    body.check()?;
    let post_id = body
        .id
        .ok_or_else(|| AppError::Validation("post id is required".into()))?;

    let caller = user.user_id;
    state
        .post_service()
        .replace(caller, body.into_post(post_id, caller))
        .await?;

    Ok(HttpResponse::Ok().json(Ack::ok()))
}

/// PUT /posts/update/{post_id} — full replacement, id taken from the path.
pub async fn replace_by_path(
    state: web::Data<AppState>,
    user: SessionUser,
    path: web::Path<Uuid>,
    body: web::Json<PostBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    body.check()?;

    let caller = user.user_id;
    state
        .post_service()
        .replace(caller, body.into_post(path.into_inner(), caller))
        .await?;

    Ok(HttpResponse::Ok().json(Ack::ok()))
}
