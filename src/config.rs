//! Configuration loaded from environment variables.

use anyhow::bail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub push: PushConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production).
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins.
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth client id the identity tokens must be minted for. Unset
    /// skips the audience check (local development).
    pub google_client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// FCM server key; push delivery is disabled when unset.
    pub fcm_server_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                bail!("CORS_ALLOWED_ORIGINS must be set in production")
            }
            Err(_) => "http://localhost:3000".to_string(),
        };

        if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
            bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("RIDESHARE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("RIDESHARE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/rideshare".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                google_client_id: std::env::var("GOOGLE_CLIENT_ID").ok(),
            },
            push: PushConfig {
                fcm_server_key: std::env::var("FCM_SERVER_KEY").ok(),
            },
            session: SessionConfig {
                ttl_days: std::env::var("SESSION_TTL_DAYS")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(30),
            },
        })
    }
}
