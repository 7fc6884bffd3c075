use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::version_repository::{NewVersion, VersionRepository};
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::sections::changed_fields;
use crate::domain::consultations::status::ConsultationStatus;

pub struct RollbackVersion<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub versions: &'a V,
}

impl<'a, R, V> RollbackVersion<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    /// Copies the snapshot's sections back onto the consultation (last write
    /// wins) and records the rollback itself as a new version. Status is left
    /// untouched; the snapshot row is never modified.
    pub async fn execute(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
        version_number: i32,
    ) -> Result<Consultation, IntakeError> {
        let current = self
            .repo
            .get_for_user(consultation_id, user_id)
            .await?
            .ok_or(IntakeError::NotFound)?;
        if current.status == ConsultationStatus::Archived {
            return Err(IntakeError::Archived);
        }

        let snapshot = self
            .versions
            .get_by_number(consultation_id, version_number)
            .await?
            .ok_or(IntakeError::VersionNotFound(version_number))?;

        let changed = changed_fields(
            &current.sections,
            current.status,
            &snapshot.sections,
            current.status,
        );
        let completion = snapshot.sections.completion_percentage();
        let updated = self
            .repo
            .update_sections(consultation_id, user_id, &snapshot.sections, completion)
            .await?
            .ok_or(IntakeError::NotFound)?;

        self.versions
            .append(&NewVersion {
                consultation_id,
                sections: updated.sections.clone(),
                status: updated.status,
                completion_percentage: updated.completion_percentage,
                change_summary: format!("rolled back to version {version_number}"),
                changed_fields: changed,
                created_by: user_id,
            })
            .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::use_cases::consultations::test_support::{FakeRepo, FakeVersions};
    use crate::application::use_cases::consultations::update_sections::{
        SectionChanges, UpdateSections,
    };
    use crate::domain::consultations::sections::SectionSet;

    #[tokio::test]
    async fn rollback_restores_sections_and_appends() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let update = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        // v1: contact info filled in
        update
            .execute(
                created.id,
                user,
                SectionChanges {
                    contact_info: Some(Some(json!({"name": "Acme"}))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // v2: contact info renamed
        update
            .execute(
                created.id,
                user,
                SectionChanges {
                    contact_info: Some(Some(json!({"name": "Acme Corp"}))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let uc = RollbackVersion {
            repo: &repo,
            versions: &versions,
        };
        let restored = uc.execute(created.id, user, 1).await.unwrap();
        assert_eq!(
            restored.sections.contact_info,
            Some(json!({"name": "Acme"}))
        );

        let stored = versions.all();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2].change_summary, "rolled back to version 1");
        assert_eq!(stored[2].changed_fields, vec!["contact_info"]);
        // the rolled-back-from snapshot is untouched
        assert_eq!(
            stored[1].sections.contact_info,
            Some(json!({"name": "Acme Corp"}))
        );
    }

    #[tokio::test]
    async fn unknown_version_is_reported() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let uc = RollbackVersion {
            repo: &repo,
            versions: &versions,
        };
        let err = uc.execute(created.id, user, 7).await.unwrap_err();
        assert!(matches!(err, IntakeError::VersionNotFound(7)));
    }

    #[tokio::test]
    async fn archived_cannot_roll_back() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Archived);
        versions.seed(created.id, user);

        let uc = RollbackVersion {
            repo: &repo,
            versions: &versions,
        };
        let err = uc.execute(created.id, user, 1).await.unwrap_err();
        assert!(matches!(err, IntakeError::Archived));
    }
}
