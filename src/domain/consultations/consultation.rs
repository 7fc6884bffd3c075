use uuid::Uuid;

use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;

#[derive(Debug, Clone)]
pub struct Consultation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sections: SectionSet,
    pub status: ConsultationStatus,
    pub completion_percentage: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Autosaved working copy, one per (consultation, user). Upserted, never versioned.
#[derive(Debug, Clone)]
pub struct ConsultationDraft {
    pub id: Uuid,
    pub consultation_id: Uuid,
    pub user_id: Uuid,
    pub sections: SectionSet,
    pub auto_saved: bool,
    pub notes: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Immutable snapshot taken at an update/complete/archive/rollback event.
#[derive(Debug, Clone)]
pub struct ConsultationVersion {
    pub id: Uuid,
    pub consultation_id: Uuid,
    pub version_number: i32,
    pub sections: SectionSet,
    pub status: ConsultationStatus,
    pub completion_percentage: i32,
    pub change_summary: String,
    pub changed_fields: Vec<String>,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
