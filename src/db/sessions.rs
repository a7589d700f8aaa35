use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

use super::SessionStore;
use crate::error::Result;

/// Opaque 256-bit session token, hex encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct PgSessionStore {
    pool: PgPool,
    ttl_days: i64,
}

impl PgSessionStore {
    pub fn new(pool: PgPool, ttl_days: i64) -> Self {
        Self { pool, ttl_days }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user_id: Uuid) -> Result<String> {
        let token = generate_session_token();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(now)
        .bind(now + Duration::days(self.ttl_days))
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    async fn find_user(&self, token: &str) -> Result<Option<Uuid>> {
        let row = sqlx::query_as::<_, (Uuid,)>(
            "SELECT user_id FROM sessions WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id,)| user_id))
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
