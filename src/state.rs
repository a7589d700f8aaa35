//! Shared application state.
//!
//! Collaborators are injected as trait objects so the handler set can be
//! built over Postgres in production and over in-memory doubles in
//! tests.

use std::sync::Arc;

use crate::db::{PostRepository, ReportRepository, SessionStore, UserRepository};
use crate::services::{AuthService, IdentityVerifier, Notifier, PostService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            Arc::clone(&self.users),
            Arc::clone(&self.sessions),
            Arc::clone(&self.verifier),
        )
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(
            Arc::clone(&self.posts),
            Arc::clone(&self.users),
            Arc::clone(&self.notifier),
        )
    }
}
