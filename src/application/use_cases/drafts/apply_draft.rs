use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::draft_repository::DraftRepository;
use crate::application::ports::version_repository::VersionRepository;
use crate::application::use_cases::consultations::update_sections::{
    SectionChanges, UpdateSections,
};
use crate::domain::consultations::consultation::Consultation;

pub struct ApplyDraft<'a, R, D, V>
where
    R: ConsultationRepository + ?Sized,
    D: DraftRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub drafts: &'a D,
    pub versions: &'a V,
}

impl<'a, R, D, V> ApplyDraft<'a, R, D, V>
where
    R: ConsultationRepository + ?Sized,
    D: DraftRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    /// Promotes the caller's draft into a regular section update (all four
    /// sections replaced with the draft's working copy), then discards the
    /// draft. The update path takes care of validation and versioning.
    pub async fn execute(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Consultation, IntakeError> {
        let draft = self
            .drafts
            .get(consultation_id, user_id)
            .await?
            .ok_or(IntakeError::DraftNotFound)?;

        let update = UpdateSections {
            repo: self.repo,
            versions: self.versions,
        };
        let changes = SectionChanges {
            contact_info: Some(draft.sections.contact_info.clone()),
            business_context: Some(draft.sections.business_context.clone()),
            pain_points: Some(draft.sections.pain_points.clone()),
            goals_objectives: Some(draft.sections.goals_objectives.clone()),
        };
        let updated = update.execute(consultation_id, user_id, changes).await?;

        if let Err(e) = self.drafts.delete(consultation_id, user_id).await {
            tracing::warn!(consultation_id = %consultation_id, error = ?e, "draft_discard_after_apply_failed");
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::use_cases::consultations::test_support::{
        FakeDrafts, FakeRepo, FakeVersions,
    };
    use crate::domain::consultations::sections::SectionSet;
    use crate::domain::consultations::status::ConsultationStatus;

    #[tokio::test]
    async fn apply_updates_row_and_discards_draft() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let drafts = FakeDrafts::default();
        let versions = FakeVersions::default();
        let created = repo.seed(
            user,
            SectionSet {
                contact_info: Some(json!({"name": "old"})),
                business_context: Some(json!({"industry": "retail"})),
                ..Default::default()
            },
            ConsultationStatus::Draft,
        );
        drafts
            .upsert(
                created.id,
                user,
                &SectionSet {
                    contact_info: Some(json!({"name": "new"})),
                    ..Default::default()
                },
                true,
                None,
            )
            .await
            .unwrap();

        let uc = ApplyDraft {
            repo: &repo,
            drafts: &drafts,
            versions: &versions,
        };
        let updated = uc.execute(created.id, user).await.unwrap();

        // draft's working copy replaces all four sections
        assert_eq!(updated.sections.contact_info, Some(json!({"name": "new"})));
        assert_eq!(updated.sections.business_context, None);
        assert_eq!(updated.completion_percentage, 25);
        assert!(drafts.get(created.id, user).await.unwrap().is_none());
        assert_eq!(versions.all().len(), 1);
    }

    #[tokio::test]
    async fn apply_without_draft_fails() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let uc = ApplyDraft {
            repo: &repo,
            drafts: &FakeDrafts::default(),
            versions: &FakeVersions::default(),
        };
        let err = uc.execute(created.id, user).await.unwrap_err();
        assert!(matches!(err, IntakeError::DraftNotFound));
    }
}
