use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::drafts::apply_draft::ApplyDraft;
use crate::application::use_cases::drafts::discard_draft::DiscardDraft;
use crate::application::use_cases::drafts::get_draft::GetDraft;
use crate::application::use_cases::drafts::save_draft::SaveDraft;
use crate::bootstrap::app_context::AppContext;
use crate::domain::consultations::consultation::ConsultationDraft;
use crate::domain::consultations::sections::SectionSet;
use crate::presentation::http::auth::{Bearer, current_user};
use crate::presentation::http::consultations::ConsultationResponse;
use crate::presentation::http::intake_error_status;

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftResponse {
    pub id: Uuid,
    pub consultation_id: Uuid,
    pub contact_info: Option<Value>,
    pub business_context: Option<Value>,
    pub pain_points: Option<Value>,
    pub goals_objectives: Option<Value>,
    pub auto_saved: bool,
    pub notes: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ConsultationDraft> for DraftResponse {
    fn from(d: ConsultationDraft) -> Self {
        DraftResponse {
            id: d.id,
            consultation_id: d.consultation_id,
            contact_info: d.sections.contact_info,
            business_context: d.sections.business_context,
            pain_points: d.sections.pain_points,
            goals_objectives: d.sections.goals_objectives,
            auto_saved: d.auto_saved,
            notes: d.notes,
            updated_at: d.updated_at,
        }
    }
}

fn default_auto_saved() -> bool {
    true
}

/// The wizard always sends its full working copy, so there is no tri-state
/// here: an absent section is an empty one.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDraftRequest {
    pub contact_info: Option<Value>,
    pub business_context: Option<Value>,
    pub pain_points: Option<Value>,
    pub goals_objectives: Option<Value>,
    #[serde(default = "default_auto_saved")]
    pub auto_saved: bool,
    pub notes: Option<String>,
}

#[utoipa::path(put, path = "/api/consultations/{id}/draft", tag = "Drafts",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    request_body = SaveDraftRequest,
    responses((status = 200, body = DraftResponse)))]
pub async fn save_draft(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveDraftRequest>,
) -> Result<Json<DraftResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let drafts = ctx.draft_repo();
    let uc = SaveDraft {
        repo: repo.as_ref(),
        drafts: drafts.as_ref(),
    };
    let sections = SectionSet::new(
        req.contact_info,
        req.business_context,
        req.pain_points,
        req.goals_objectives,
    );
    let draft = uc
        .execute(id, user_id, sections, req.auto_saved, req.notes)
        .await
        .map_err(intake_error_status)?;
    Ok(Json(draft.into()))
}

#[utoipa::path(get, path = "/api/consultations/{id}/draft", tag = "Drafts",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 200, body = DraftResponse), (status = 404)))]
pub async fn get_draft(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let drafts = ctx.draft_repo();
    let uc = GetDraft {
        drafts: drafts.as_ref(),
    };
    let draft = uc.execute(id, user_id).await.map_err(intake_error_status)?;
    Ok(Json(draft.into()))
}

#[utoipa::path(delete, path = "/api/consultations/{id}/draft", tag = "Drafts",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 204), (status = 404)))]
pub async fn discard_draft(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let drafts = ctx.draft_repo();
    let uc = DiscardDraft {
        drafts: drafts.as_ref(),
    };
    uc.execute(id, user_id).await.map_err(intake_error_status)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/consultations/{id}/draft/apply", tag = "Drafts",
    params(("id" = Uuid, Path, description = "Consultation ID")),
    responses((status = 200, body = ConsultationResponse)))]
pub async fn apply_draft(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationResponse>, StatusCode> {
    let user_id = current_user(&ctx.cfg, bearer)?;
    let repo = ctx.consultation_repo();
    let drafts = ctx.draft_repo();
    let versions = ctx.version_repo();
    let uc = ApplyDraft {
        repo: repo.as_ref(),
        drafts: drafts.as_ref(),
        versions: versions.as_ref(),
    };
    let row = uc.execute(id, user_id).await.map_err(intake_error_status)?;
    Ok(Json(row.into()))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/consultations/:id/draft",
            put(save_draft).get(get_draft).delete(discard_draft),
        )
        .route("/consultations/:id/draft/apply", post(apply_draft))
        .with_state(ctx)
}
