use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ReportRepository;
use crate::error::Result;
use crate::models::Report;

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(
        &self,
        reporter: Uuid,
        reported: &str,
        title: &str,
        body: &str,
    ) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (id, reporter, reported, title, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, reporter, reported, title, body, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reporter)
        .bind(reported)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }
}
