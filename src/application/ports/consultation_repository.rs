use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;

#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    async fn create_for_user(
        &self,
        user_id: Uuid,
        sections: &SectionSet,
        completion: i32,
    ) -> anyhow::Result<Consultation>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<ConsultationStatus>,
    ) -> anyhow::Result<Vec<Consultation>>;

    // Ownership-scoped: rows of other users read as absent.
    async fn get_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Consultation>>;

    async fn update_sections(
        &self,
        id: Uuid,
        user_id: Uuid,
        sections: &SectionSet,
        completion: i32,
    ) -> anyhow::Result<Option<Consultation>>;

    async fn update_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        status: ConsultationStatus,
    ) -> anyhow::Result<Option<Consultation>>;

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;
}
