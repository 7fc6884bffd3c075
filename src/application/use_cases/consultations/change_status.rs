use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::version_repository::{NewVersion, VersionRepository};
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::status::ConsultationStatus;

pub struct ChangeStatus<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub versions: &'a V,
}

impl<'a, R, V> ChangeStatus<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    /// Moves the consultation along the status graph and appends a version.
    pub async fn execute(
        &self,
        id: Uuid,
        user_id: Uuid,
        target: ConsultationStatus,
    ) -> Result<Consultation, IntakeError> {
        let current = self
            .repo
            .get_for_user(id, user_id)
            .await?
            .ok_or(IntakeError::NotFound)?;
        if !current.status.can_transition_to(target) {
            return Err(IntakeError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let updated = self
            .repo
            .update_status(id, user_id, target)
            .await?
            .ok_or(IntakeError::NotFound)?;

        let change_summary = match target {
            ConsultationStatus::Completed => "completed consultation".to_string(),
            ConsultationStatus::Archived => "archived consultation".to_string(),
            other => format!("moved consultation to {other}"),
        };
        self.versions
            .append(&NewVersion {
                consultation_id: updated.id,
                sections: updated.sections.clone(),
                status: updated.status,
                completion_percentage: updated.completion_percentage,
                change_summary,
                changed_fields: vec!["status".to_string()],
                created_by: user_id,
            })
            .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::consultations::test_support::{FakeRepo, FakeVersions};
    use crate::domain::consultations::sections::SectionSet;

    #[tokio::test]
    async fn complete_then_archive() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let uc = ChangeStatus {
            repo: &repo,
            versions: &versions,
        };
        let completed = uc
            .execute(created.id, user, ConsultationStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, ConsultationStatus::Completed);

        let archived = uc
            .execute(created.id, user, ConsultationStatus::Archived)
            .await
            .unwrap();
        assert_eq!(archived.status, ConsultationStatus::Archived);

        let stored = versions.all();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].change_summary, "completed consultation");
        assert_eq!(stored[1].change_summary, "archived consultation");
        assert_eq!(stored[1].version_number, 2);
    }

    #[tokio::test]
    async fn archived_is_terminal() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Archived);

        let uc = ChangeStatus {
            repo: &repo,
            versions: &versions,
        };
        let err = uc
            .execute(created.id, user, ConsultationStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IntakeError::InvalidTransition {
                from: ConsultationStatus::Archived,
                to: ConsultationStatus::Completed,
            }
        ));
        assert!(versions.all().is_empty());
    }

    #[tokio::test]
    async fn completed_cannot_go_back_to_draft() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Completed);

        let uc = ChangeStatus {
            repo: &repo,
            versions: &versions,
        };
        let err = uc
            .execute(created.id, user, ConsultationStatus::Draft)
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::InvalidTransition { .. }));
    }
}
