use std::sync::Arc;
use uuid::Uuid;

use crate::db::{SessionStore, UserRepository};
use crate::error::{AppError, Result};
use crate::services::IdentityVerifier;

/// Result of a verified login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user_id: Uuid,
    pub session_token: String,
    /// True when the account was just created and still needs the
    /// phone-number registration step.
    pub needs_register: bool,
}

/// Login/registration flow: verify the provider token, look the email
/// up, create the account on first contact, and establish a session.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self {
            users,
            sessions,
            verifier,
        }
    }

    /// Exchange a provider token for a session.
    ///
    /// Fails with `Verification` for bad tokens and `Forbidden` for
    /// banned accounts; both are mapped to the login envelope by the
    /// handler rather than surfaced as HTTP errors.
    pub async fn login(&self, provider_token: &str) -> Result<LoginOutcome> {
        let identity = self.verifier.verify(provider_token).await?;

        let (user, needs_register) = match self.users.find_by_email(&identity.email).await? {
            Some(existing) => (existing, false),
            None => {
                let created = self.users.create(&identity.name, &identity.email).await?;
                tracing::info!(user_id = %created.id, "created account on first login");
                (created, true)
            }
        };

        if user.banned {
            return Err(AppError::Forbidden("account is banned".into()));
        }

        let session_token = self.sessions.create(user.id).await?;

        Ok(LoginOutcome {
            user_id: user.id,
            session_token,
            needs_register,
        })
    }

    /// Complete registration by attaching a phone number to the
    /// session's user.
    pub async fn register(&self, user_id: Uuid, phnum: &str) -> Result<()> {
        if self.users.set_phone_number(user_id, phnum).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("user not found".into()))
        }
    }

    pub async fn logout(&self, session_token: &str) -> Result<()> {
        self.sessions.destroy(session_token).await
    }
}
