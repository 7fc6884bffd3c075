use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::status::ConsultationStatus;

pub struct ListConsultations<'a, R: ConsultationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ConsultationRepository + ?Sized> ListConsultations<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        status: Option<ConsultationStatus>,
    ) -> Result<Vec<Consultation>, IntakeError> {
        Ok(self.repo.list_for_user(user_id, status).await?)
    }
}
