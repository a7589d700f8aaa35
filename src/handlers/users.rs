//! Login, registration, and user lookup handlers.

use actix_web::{cookie::Cookie, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Ack;
use crate::error::{AppError, Result};
use crate::middleware::{SessionUser, SESSION_COOKIE};
use crate::models::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub needs_register: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            needs_register: false,
            user_id: None,
            error: Some(error.into()),
        }
    }
}

/// POST /users/login
///
/// A missing token is answered immediately, before the verifier is
/// called. Verification failures and bans land in the `success:false`
/// envelope rather than an HTTP error, which is what the clients expect.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let token = match body.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => return Ok(HttpResponse::Ok().json(LoginResponse::failure("token is required"))),
    };

    match state.auth_service().login(&token).await {
        Ok(outcome) => {
            let cookie = Cookie::build(SESSION_COOKIE, outcome.session_token.clone())
                .path("/")
                .http_only(true)
                .finish();

            Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
                success: !outcome.needs_register,
                needs_register: outcome.needs_register,
                user_id: Some(outcome.user_id),
                error: None,
            }))
        }
        Err(AppError::Verification(msg)) | Err(AppError::Forbidden(msg)) => {
            Ok(HttpResponse::Ok().json(LoginResponse::failure(msg)))
        }
        Err(e) => Err(e),
    }
}

/// POST /users/logout
pub async fn logout(state: web::Data<AppState>, user: SessionUser) -> Result<HttpResponse> {
    state.auth_service().logout(&user.token).await?;

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();

    Ok(HttpResponse::Ok().cookie(removal).json(Ack::ok()))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub phnum: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /users/register — completes registration with a phone number.
pub async fn register(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let phnum = match body.phnum.as_deref().map(str::trim) {
        Some(phnum) if !phnum.is_empty() => phnum.to_string(),
        _ => {
            return Ok(HttpResponse::Ok().json(RegisterResponse {
                success: false,
                error: Some("phnum is required".into()),
            }))
        }
    };

    match state.auth_service().register(user.user_id, &phnum).await {
        Ok(()) => Ok(HttpResponse::Ok().json(RegisterResponse {
            success: true,
            error: None,
        })),
        Err(AppError::NotFound(msg)) => Ok(HttpResponse::Ok().json(RegisterResponse {
            success: false,
            error: Some(msg),
        })),
        Err(e) => Err(e),
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub result: u8,
    pub user: User,
}

/// GET /users/by_id/{user_id}
pub async fn get_by_id(
    state: web::Data<AppState>,
    _user: SessionUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match state.users.find_by_id(path.into_inner()).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponse { result: 1, user })),
        None => Err(AppError::NotFound("user not found".into())),
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterFcmRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// POST /users/register_fcm — stores the device push token.
pub async fn register_fcm(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<RegisterFcmRequest>,
) -> Result<HttpResponse> {
    let token = match body.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => return Err(AppError::Validation("token is required".into())),
    };

    if state.users.set_fcm_token(user.user_id, &token).await? {
        Ok(HttpResponse::Ok().json(Ack::ok()))
    } else {
        Err(AppError::NotFound("user not found".into()))
    }
}
