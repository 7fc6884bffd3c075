use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::consultations::consultation::ConsultationVersion;
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;

/// Snapshot to append. `version_number` is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub consultation_id: Uuid,
    pub sections: SectionSet,
    pub status: ConsultationStatus,
    pub completion_percentage: i32,
    pub change_summary: String,
    pub changed_fields: Vec<String>,
    pub created_by: Uuid,
}

#[async_trait]
pub trait VersionRepository: Send + Sync {
    async fn append(&self, version: &NewVersion) -> anyhow::Result<ConsultationVersion>;

    async fn list_for_consultation(
        &self,
        consultation_id: Uuid,
    ) -> anyhow::Result<Vec<ConsultationVersion>>;

    async fn get_by_number(
        &self,
        consultation_id: Uuid,
        version_number: i32,
    ) -> anyhow::Result<Option<ConsultationVersion>>;

    async fn count_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<i64>;

    async fn delete_all_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<u64>;
}
