use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An abuse report filed by a user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    /// User who filed the report.
    pub reporter: Uuid,
    /// Email address of the reported party.
    pub reported: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
