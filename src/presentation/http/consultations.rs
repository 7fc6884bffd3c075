use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::consultations::change_status::ChangeStatus;
use crate::application::use_cases::consultations::create_consultation::CreateConsultation;
use crate::application::use_cases::consultations::delete_consultation::DeleteConsultation;
use crate::application::use_cases::consultations::get_consultation_bundle::GetConsultationBundle;
use crate::application::use_cases::consultations::list_consultations::ListConsultations;
use crate::application::use_cases::consultations::update_sections::{
    SectionChanges, UpdateSections,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;
use crate::presentation::http::auth::{Bearer, current_user};
use crate::presentation::http::drafts::DraftResponse;
use crate::presentation::http::intake_error_status;

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsultationResponse {
    pub id: Uuid,
    pub contact_info: Option<Value>,
    pub business_context: Option<Value>,
    pub pain_points: Option<Value>,
    pub goals_objectives: Option<Value>,
    pub status: String,
    pub completion_percentage: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Consultation> for ConsultationResponse {
    fn from(c: Consultation) -> Self {
        ConsultationResponse {
            id: c.id,
            contact_info: c.sections.contact_info,
            business_context: c.sections.business_context,
            pain_points: c.sections.pain_points,
            goals_objectives: c.sections.goals_objectives,
            status: c.status.as_str().to_string(),
            completion_percentage: c.completion_percentage,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsultationListResponse {
    pub items: Vec<ConsultationResponse>,
}

/// Detail bundle for the wizard: the record, the caller's autosaved draft (if
/// any) and how many versions exist.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConsultationDetailResponse {
    pub consultation: ConsultationResponse,
    pub draft: Option<DraftResponse>,
    pub version_count: i64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateConsultationRequest {
    pub contact_info: Option<Value>,
    pub business_context: Option<Value>,
    pub pain_points: Option<Value>,
    pub goals_objectives: Option<Value>,
}

/// Sections are tri-state on update: absent = untouched, null = cleared,
/// object = replaced.
#[derive(Debug, Clone)]
pub enum SectionField {
    NotProvided,
    Null,
    Some(Value),
}

impl Default for SectionField {
    fn default() -> Self {
        SectionField::NotProvided
    }
}

fn deserialize_section_field<'de, D>(deserializer: D) -> Result<SectionField, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(|opt| match opt {
        None => SectionField::Null,
        Some(value) => SectionField::Some(value),
    })
}

impl SectionField {
    fn into_change(self) -> Option<Option<Value>> {
        match self {
            SectionField::NotProvided => None,
            SectionField::Null => Some(None),
            SectionField::Some(v) => Some(Some(v)),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateConsultationRequest {
    #[serde(default, deserialize_with = "deserialize_section_field")]
    #[schema(value_type = Option<serde_json::Value>)]
    pub contact_info: SectionField,
    #[serde(default, deserialize_with = "deserialize_section_field")]
    #[schema(value_type = Option<serde_json::Value>)]
    pub business_context: SectionField,
    #[serde(default, deserialize_with = "deserialize_section_field")]
    #[schema(value_type = Option<serde_json::Value>)]
    pub pain_points: SectionField,
    #[serde(default, deserialize_with = "deserialize_section_field")]
    #[schema(value_type = Option<serde_json::Value>)]
    pub goals_objectives: SectionField,
}

impl UpdateConsultationRequest {
    fn into_changes(self) -> SectionChanges {
        SectionChanges {
            contact_info: self.contact_info.into_change(),
            business_context: self.business_context.into_change(),
            pain_points: self.pain_points.into_change(),
            goals_objectives: self.goals_objectives.into_change(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListConsultationsQuery {
    pub status: Option<String>,
}

#[utoipa::path(get, path = "/api/consultations", tag = "Consultations",
    params(("status" = Option<String>, Query, description = "Filter by status (draft/completed/archived)")),
    responses((status = 200, body = ConsultationListResponse)))]
pub async fn list_consultations(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    q: Option<Query<ListConsultationsQuery>>,
) -> Result<Json<ConsultationListResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let status = match q.and_then(|Query(v)| v.status) {
        Some(raw) => Some(ConsultationStatus::parse(&raw).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };

    let repo = ctx.consultation_repo();
    let uc = ListConsultations {
        repo: repo.as_ref(),
    };
    let rows = uc
        .execute(user_id, status)
        .await
        .map_err(intake_error_status)?;
    Ok(Json(ConsultationListResponse {
        items: rows.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(post, path = "/api/consultations", tag = "Consultations",
    request_body = CreateConsultationRequest,
    responses((status = 200, body = ConsultationResponse)))]
pub async fn create_consultation(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<CreateConsultationRequest>,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let sections = SectionSet::new(
        req.contact_info,
        req.business_context,
        req.pain_points,
        req.goals_objectives,
    );

    let repo = ctx.consultation_repo();
    let uc = CreateConsultation {
        repo: repo.as_ref(),
    };
    let row = uc
        .execute(user_id, sections)
        .await
        .map_err(intake_error_status)?;
    Ok(Json(row.into()))
}

#[utoipa::path(get, path = "/api/consultations/{id}", tag = "Consultations",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 200, body = ConsultationDetailResponse)))]
pub async fn get_consultation(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationDetailResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let uc = GetConsultationBundle {
        consultations: ctx.consultation_repo(),
        drafts: ctx.draft_repo(),
        versions: ctx.version_repo(),
    };
    let bundle = uc.execute(id, user_id).await.map_err(intake_error_status)?;
    Ok(Json(ConsultationDetailResponse {
        consultation: bundle.consultation.into(),
        draft: bundle.draft.map(Into::into),
        version_count: bundle.version_count,
    }))
}

#[utoipa::path(put, path = "/api/consultations/{id}", tag = "Consultations",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    request_body = UpdateConsultationRequest,
    responses((status = 200, body = ConsultationResponse)))]
pub async fn update_consultation(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateConsultationRequest>,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let versions = ctx.version_repo();
    let uc = UpdateSections {
        repo: repo.as_ref(),
        versions: versions.as_ref(),
    };
    let row = uc
        .execute(id, user_id, req.into_changes())
        .await
        .map_err(intake_error_status)?;
    Ok(Json(row.into()))
}

#[utoipa::path(post, path = "/api/consultations/{id}/complete", tag = "Consultations",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 200, body = ConsultationResponse)))]
pub async fn complete_consultation(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    transition(ctx, bearer, id, ConsultationStatus::Completed).await
}

#[utoipa::path(post, path = "/api/consultations/{id}/archive", tag = "Consultations",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 200, body = ConsultationResponse)))]
pub async fn archive_consultation(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    transition(ctx, bearer, id, ConsultationStatus::Archived).await
}

async fn transition(
    ctx: AppContext,
    bearer: Bearer,
    id: Uuid,
    target: ConsultationStatus,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let versions = ctx.version_repo();
    let uc = ChangeStatus {
        repo: repo.as_ref(),
        versions: versions.as_ref(),
    };
    let row = uc
        .execute(id, user_id, target)
        .await
        .map_err(intake_error_status)?;
    Ok(Json(row.into()))
}

#[utoipa::path(delete, path = "/api/consultations/{id}", tag = "Consultations",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 204)))]
pub async fn delete_consultation(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let drafts = ctx.draft_repo();
    let versions = ctx.version_repo();
    let uc = DeleteConsultation {
        repo: repo.as_ref(),
        drafts: drafts.as_ref(),
        versions: versions.as_ref(),
    };
    uc.execute(id, user_id).await.map_err(intake_error_status)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/consultations",
            get(list_consultations).post(create_consultation),
        )
        .route(
            "/consultations/:id",
            get(get_consultation)
                .put(update_consultation)
                .delete(delete_consultation),
        )
        .route("/consultations/:id/complete", post(complete_consultation))
        .route("/consultations/:id/archive", post(archive_consultation))
        .with_state(ctx)
}
