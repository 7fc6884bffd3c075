use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::draft_repository::DraftRepository;
use crate::application::ports::version_repository::VersionRepository;

pub struct DeleteConsultation<'a, R, D, V>
where
    R: ConsultationRepository + ?Sized,
    D: DraftRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub drafts: &'a D,
    pub versions: &'a V,
}

impl<'a, R, D, V> DeleteConsultation<'a, R, D, V>
where
    R: ConsultationRepository + ?Sized,
    D: DraftRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    /// Removes the row first (ownership-scoped), then bulk-deletes its version
    /// log and any drafts. This is the only path that deletes versions.
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<(), IntakeError> {
        if !self.repo.delete_owned(id, user_id).await? {
            return Err(IntakeError::NotFound);
        }
        let removed_versions = self.versions.delete_all_for_consultation(id).await?;
        let removed_drafts = self.drafts.delete_all_for_consultation(id).await?;
        tracing::debug!(
            consultation_id = %id,
            removed_versions,
            removed_drafts,
            "consultation_deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::consultations::test_support::{
        FakeDrafts, FakeRepo, FakeVersions,
    };
    use crate::domain::consultations::sections::SectionSet;
    use crate::domain::consultations::status::ConsultationStatus;

    #[tokio::test]
    async fn delete_cascades_to_versions_and_drafts() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let drafts = FakeDrafts::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);
        versions.seed(created.id, user);
        drafts
            .upsert(created.id, user, &SectionSet::default(), true, None)
            .await
            .unwrap();

        let uc = DeleteConsultation {
            repo: &repo,
            drafts: &drafts,
            versions: &versions,
        };
        uc.execute(created.id, user).await.unwrap();

        assert!(repo.get_for_user(created.id, user).await.unwrap().is_none());
        assert!(versions.all().is_empty());
        assert!(drafts.get(created.id, user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn foreign_delete_leaves_versions_alone() {
        let owner = Uuid::new_v4();
        let repo = FakeRepo::default();
        let drafts = FakeDrafts::default();
        let versions = FakeVersions::default();
        let created = repo.seed(owner, SectionSet::default(), ConsultationStatus::Draft);
        versions.seed(created.id, owner);

        let uc = DeleteConsultation {
            repo: &repo,
            drafts: &drafts,
            versions: &versions,
        };
        let err = uc.execute(created.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, IntakeError::NotFound));
        assert_eq!(versions.all().len(), 1);
    }
}
