use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Identity attested by the third-party provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: String,
}

/// Exchanges an opaque client token for a verified identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity>;
}

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize)]
struct TokenInfo {
    email: String,
    name: Option<String>,
    aud: Option<String>,
}

/// Verifies Google ID tokens against the tokeninfo endpoint.
pub struct GoogleVerifier {
    http: reqwest::Client,
    /// Expected OAuth client id; when set, tokens minted for another
    /// application are rejected.
    client_id: Option<String>,
}

impl GoogleVerifier {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
        }
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| AppError::Verification(format!("identity provider unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Verification(
                "identity provider rejected the token".into(),
            ));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::Verification(format!("malformed tokeninfo response: {e}")))?;

        if let Some(expected) = &self.client_id {
            if info.aud.as_deref() != Some(expected.as_str()) {
                return Err(AppError::Verification(
                    "token was issued for another application".into(),
                ));
            }
        }

        let name = info.name.unwrap_or_else(|| info.email.clone());
        Ok(VerifiedIdentity {
            email: info.email,
            name,
        })
    }
}
