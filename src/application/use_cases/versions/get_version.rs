use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::version_repository::VersionRepository;
use crate::domain::consultations::consultation::ConsultationVersion;

pub struct GetVersion<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub versions: &'a V,
}

impl<'a, R, V> GetVersion<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub async fn execute(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
        version_number: i32,
    ) -> Result<ConsultationVersion, IntakeError> {
        self.repo
            .get_for_user(consultation_id, user_id)
            .await?
            .ok_or(IntakeError::NotFound)?;
        self.versions
            .get_by_number(consultation_id, version_number)
            .await?
            .ok_or(IntakeError::VersionNotFound(version_number))
    }
}
