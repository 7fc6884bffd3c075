use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::consultations::consultation::ConsultationDraft;
use crate::domain::consultations::sections::SectionSet;

#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Insert or replace the draft row keyed by (consultation, user).
    async fn upsert(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
        sections: &SectionSet,
        auto_saved: bool,
        notes: Option<String>,
    ) -> anyhow::Result<ConsultationDraft>;

    async fn get(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ConsultationDraft>>;

    async fn delete(&self, consultation_id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;

    async fn delete_all_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<u64>;

    /// Remove auto-saved drafts not touched since `cutoff`. Manual drafts stay.
    async fn delete_stale_autosaves(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<u64>;
}
