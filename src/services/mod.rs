//! Business logic layer.

mod auth;
mod notify;
mod posts;
mod verify;

pub use auth::{AuthService, LoginOutcome};
pub use notify::{FcmNotifier, Notifier, NullNotifier};
pub use posts::PostService;
pub use verify::{GoogleVerifier, IdentityVerifier, VerifiedIdentity};
