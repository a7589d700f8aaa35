//! Session gate.
//!
//! `SessionUser` is the extractor every session-gated handler takes as
//! an argument. It resolves the session cookie against the store before
//! any handler logic runs; requests without a valid session are rejected
//! with 401 and never touch persistence.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "rideshare_session";

/// Identity of the logged-in caller, plus the token backing it so
/// logout can destroy the session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub token: String,
}

impl FromRequest for SessionUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string());

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("application state not configured".into()))?;
            let token =
                token.ok_or_else(|| AppError::Unauthorized("missing session cookie".into()))?;

            match state.sessions.find_user(&token).await? {
                Some(user_id) => Ok(SessionUser { user_id, token }),
                None => Err(AppError::Unauthorized("invalid or expired session".into()).into()),
            }
        })
    }
}
