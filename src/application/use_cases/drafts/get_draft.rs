use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::draft_repository::DraftRepository;
use crate::domain::consultations::consultation::ConsultationDraft;

pub struct GetDraft<'a, D: DraftRepository + ?Sized> {
    pub drafts: &'a D,
}

impl<'a, D: DraftRepository + ?Sized> GetDraft<'a, D> {
    pub async fn execute(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
    ) -> Result<ConsultationDraft, IntakeError> {
        self.drafts
            .get(consultation_id, user_id)
            .await?
            .ok_or(IntakeError::DraftNotFound)
    }
}
