use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::version_repository::VersionRepository;
use crate::domain::consultations::consultation::ConsultationVersion;

pub struct ListVersions<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub versions: &'a V,
}

impl<'a, R, V> ListVersions<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub async fn execute(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<ConsultationVersion>, IntakeError> {
        // Ownership gate; the version table itself is not user-scoped.
        self.repo
            .get_for_user(consultation_id, user_id)
            .await?
            .ok_or(IntakeError::NotFound)?;
        Ok(self.versions.list_for_consultation(consultation_id).await?)
    }
}
