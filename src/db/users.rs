use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::UserRepository;
use crate::error::Result;
use crate::models::User;

const USER_COLUMNS: &str = "id, name, email, phnum, banned, fcm_token, created_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, name: &str, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_phone_number(&self, id: Uuid, phnum: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET phnum = $1 WHERE id = $2")
            .bind(phnum)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_fcm_token(&self, id: Uuid, token: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET fcm_token = $1 WHERE id = $2")
            .bind(token)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fcm_tokens(&self, ids: &[Uuid]) -> Result<Vec<String>> {
        let tokens = sqlx::query_as::<_, (String,)>(
            "SELECT fcm_token FROM users WHERE id = ANY($1) AND fcm_token IS NOT NULL",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens.into_iter().map(|(token,)| token).collect())
    }
}
