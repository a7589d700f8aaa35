//! Database access layer.
//!
//! Each collaborator is a trait so the handler set can be constructed
//! with either the Postgres implementations below or in-memory doubles
//! in tests. All implementations must be safe to share across request
//! tasks.

mod posts;
mod reports;
mod sessions;
mod users;

pub use posts::PgPostRepository;
pub use reports::PgReportRepository;
pub use sessions::{generate_session_token, PgSessionStore};
pub use users::PgUserRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewPost, Post, Report, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user from a verified identity. Phone number and push
    /// token start out unset.
    async fn create(&self, name: &str, email: &str) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Attach a phone number; returns false when the user is gone.
    async fn set_phone_number(&self, id: Uuid, phnum: &str) -> Result<bool>;

    /// Attach or replace the push token; returns false when the user is gone.
    async fn set_fcm_token(&self, id: Uuid, token: &str) -> Result<bool>;

    /// Push tokens for the given users, skipping users without one.
    async fn fcm_tokens(&self, ids: &[Uuid]) -> Result<Vec<String>>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, new_post: &NewPost) -> Result<Post>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    async fn list_all(&self) -> Result<Vec<Post>>;

    /// Posts from `start` to `dest`, newest first.
    async fn search(&self, start: &str, dest: &str) -> Result<Vec<Post>>;

    /// Posts where the user is uploader, driver, or passenger.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Post>>;

    /// Overwrite every mutable field of the stored post. Returns false
    /// when no post with that id exists. `created_at` stays server-owned.
    async fn replace(&self, post: &Post) -> Result<bool>;

    /// Append a passenger iff a driver is assigned, the user is not
    /// already aboard, and a seat is free. The check and the write are a
    /// single conditional update; returns whether the update applied.
    async fn try_add_passenger(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Assign a driver and their seat capacity iff no driver is set and
    /// the capacity covers the passengers already aboard. Returns
    /// whether the update applied.
    async fn try_assign_driver(&self, post_id: Uuid, user_id: Uuid, seats: i32) -> Result<bool>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, reporter: Uuid, reported: &str, title: &str, body: &str)
        -> Result<Report>;
}

/// Maps opaque session tokens to user identities.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Establish a session and return its token.
    async fn create(&self, user_id: Uuid) -> Result<String>;

    /// Resolve a token to a user id; None for unknown or expired tokens.
    async fn find_user(&self, token: &str) -> Result<Option<Uuid>>;

    async fn destroy(&self, token: &str) -> Result<()>;
}
