pub mod auth;
pub mod consultations;
pub mod drafts;
pub mod health;
pub mod versions;

use axum::http::StatusCode;

use crate::application::intake_error::IntakeError;

/// Maps intake failures onto HTTP statuses. Server-side failures are logged
/// here so handlers can stay as thin pass-throughs.
pub(crate) fn intake_error_status(err: IntakeError) -> StatusCode {
    match err {
        IntakeError::NotFound | IntakeError::DraftNotFound | IntakeError::VersionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        IntakeError::Validation(msg) => {
            tracing::debug!(reason = %msg, "intake_validation_rejected");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IntakeError::InvalidTransition { from, to } => {
            tracing::debug!(%from, %to, "intake_transition_rejected");
            StatusCode::CONFLICT
        }
        IntakeError::Archived => StatusCode::CONFLICT,
        IntakeError::Other(e) => {
            tracing::error!(error = ?e, "intake_request_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
