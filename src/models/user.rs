use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered rider/driver.
///
/// Created on first verified login with name and email only; the phone
/// number arrives through the separate registration step and the push
/// token through `register_fcm`. Users are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phnum: Option<String>,
    pub banned: bool,
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
}
