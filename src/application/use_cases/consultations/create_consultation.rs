use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::validation::validate_sections;
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::sections::SectionSet;

pub struct CreateConsultation<'a, R: ConsultationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ConsultationRepository + ?Sized> CreateConsultation<'a, R> {
    /// Creation starts in `draft` and records no version; history begins with
    /// the first update.
    pub async fn execute(
        &self,
        user_id: Uuid,
        sections: SectionSet,
    ) -> Result<Consultation, IntakeError> {
        validate_sections(&sections)?;
        let completion = sections.completion_percentage();
        let row = self
            .repo
            .create_for_user(user_id, &sections, completion)
            .await?;
        Ok(row)
    }
}
