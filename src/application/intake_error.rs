use crate::domain::consultations::status::ConsultationStatus;

#[derive(thiserror::Error, Debug)]
pub enum IntakeError {
    #[error("consultation not found")]
    NotFound,
    #[error("draft not found")]
    DraftNotFound,
    #[error("version {0} not found")]
    VersionNotFound(i32),
    #[error("{0}")]
    Validation(String),
    #[error("cannot transition consultation from {from} to {to}")]
    InvalidTransition {
        from: ConsultationStatus,
        to: ConsultationStatus,
    },
    #[error("archived consultations are read-only")]
    Archived,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
