//! Abuse report handler.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::SessionUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ReportBody {
    /// Email of the reported party.
    #[validate(length(min = 1, message = "reported is required"))]
    pub reported: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub report: ReportBody,
}

#[derive(Debug, Serialize)]
pub struct CreateReportResponse {
    pub result: u8,
    pub report_id: Uuid,
}

/// POST /report
pub async fn create(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<CreateReportRequest>,
) -> Result<HttpResponse> {
    let report = body.into_inner().report;
    report
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .reports
        .create(user.user_id, &report.reported, &report.title, &report.body)
        .await?;

    Ok(HttpResponse::Ok().json(CreateReportResponse {
        result: 1,
        report_id: created.id,
    }))
}
