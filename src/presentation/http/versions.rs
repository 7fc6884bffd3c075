use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::versions::get_version::GetVersion;
use crate::application::use_cases::versions::list_versions::ListVersions;
use crate::application::use_cases::versions::rollback_version::RollbackVersion;
use crate::bootstrap::app_context::AppContext;
use crate::domain::consultations::consultation::ConsultationVersion;
use crate::presentation::http::auth::{Bearer, current_user};
use crate::presentation::http::consultations::ConsultationResponse;
use crate::presentation::http::intake_error_status;

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub id: Uuid,
    pub consultation_id: Uuid,
    pub version_number: i32,
    pub contact_info: Option<Value>,
    pub business_context: Option<Value>,
    pub pain_points: Option<Value>,
    pub goals_objectives: Option<Value>,
    pub status: String,
    pub completion_percentage: i32,
    pub change_summary: String,
    pub changed_fields: Vec<String>,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ConsultationVersion> for VersionResponse {
    fn from(v: ConsultationVersion) -> Self {
        VersionResponse {
            id: v.id,
            consultation_id: v.consultation_id,
            version_number: v.version_number,
            contact_info: v.sections.contact_info,
            business_context: v.sections.business_context,
            pain_points: v.sections.pain_points,
            goals_objectives: v.sections.goals_objectives,
            status: v.status.as_str().to_string(),
            completion_percentage: v.completion_percentage,
            change_summary: v.change_summary,
            changed_fields: v.changed_fields,
            created_by: v.created_by,
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionListResponse {
    pub items: Vec<VersionResponse>,
}

#[utoipa::path(get, path = "/api/consultations/{id}/versions", tag = "Versions",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 200, body = VersionListResponse)))]
pub async fn list_versions(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<VersionListResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let versions = ctx.version_repo();
    let uc = ListVersions {
        repo: repo.as_ref(),
        versions: versions.as_ref(),
    };
    let rows = uc.execute(id, user_id).await.map_err(intake_error_status)?;
    Ok(Json(VersionListResponse {
        items: rows.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(get, path = "/api/consultations/{id}/versions/{version}", tag = "Versions",
    params(
        ("id" = Uuid, Path, description = "Consultation ID"),
        ("version" = i32, Path, description = "Version number")
    ),
    responses((status = 200, body = VersionResponse), (status = 404)))]
pub async fn get_version(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<VersionResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let versions = ctx.version_repo();
    let uc = GetVersion {
        repo: repo.as_ref(),
        versions: versions.as_ref(),
    };
    let row = uc
        .execute(id, user_id, version)
        .await
        .map_err(intake_error_status)?;
    Ok(Json(row.into()))
}

#[utoipa::path(post, path = "/api/consultations/{id}/versions/{version}/rollback", tag = "Versions",
    params(
        ("id" = Uuid, Path, description = "Consultation ID"),
        ("version" = i32, Path, description = "Version number to restore")
    ),
    responses((status = 200, body = ConsultationResponse)))]
pub async fn rollback_version(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let versions = ctx.version_repo();
    let uc = RollbackVersion {
        repo: repo.as_ref(),
        versions: versions.as_ref(),
    };
    let row = uc
        .execute(id, user_id, version)
        .await
        .map_err(intake_error_status)?;
    Ok(Json(row.into()))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/consultations/:id/versions", get(list_versions))
        .route("/consultations/:id/versions/:version", get(get_version))
        .route(
            "/consultations/:id/versions/:version/rollback",
            post(rollback_version),
        )
        .with_state(ctx)
}
