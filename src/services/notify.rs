use async_trait::async_trait;
use serde_json::json;

use crate::error::{AppError, Result};

/// Delivers a push notification to a single device token.
///
/// Dispatch is always fire-and-forget from the caller's point of view:
/// failures are logged by the fan-out task and never reach the request
/// that triggered them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, fcm_token: &str, title: &str, body: &str) -> Result<()>;
}

const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// Sends notifications through Firebase Cloud Messaging.
pub struct FcmNotifier {
    http: reqwest::Client,
    server_key: String,
}

impl FcmNotifier {
    pub fn new(server_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_key,
        }
    }
}

#[async_trait]
impl Notifier for FcmNotifier {
    async fn send(&self, fcm_token: &str, title: &str, body: &str) -> Result<()> {
        let response = self
            .http
            .post(FCM_SEND_URL)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&json!({
                "to": fcm_token,
                "notification": { "title": title, "body": body },
            }))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("FCM request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "FCM send failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Drops notifications when push delivery is not configured.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _fcm_token: &str, title: &str, _body: &str) -> Result<()> {
        tracing::debug!(%title, "push delivery disabled, dropping notification");
        Ok(())
    }
}
