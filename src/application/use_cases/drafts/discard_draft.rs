use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::draft_repository::DraftRepository;

pub struct DiscardDraft<'a, D: DraftRepository + ?Sized> {
    pub drafts: &'a D,
}

impl<'a, D: DraftRepository + ?Sized> DiscardDraft<'a, D> {
    pub async fn execute(&self, consultation_id: Uuid, user_id: Uuid) -> Result<(), IntakeError> {
        if self.drafts.delete(consultation_id, user_id).await? {
            Ok(())
        } else {
            Err(IntakeError::DraftNotFound)
        }
    }
}
