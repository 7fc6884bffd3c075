use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::draft_repository::DraftRepository;
use crate::application::validation::{validate_notes, validate_sections};
use crate::domain::consultations::consultation::ConsultationDraft;
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;

pub struct SaveDraft<'a, R, D>
where
    R: ConsultationRepository + ?Sized,
    D: DraftRepository + ?Sized,
{
    pub repo: &'a R,
    pub drafts: &'a D,
}

impl<'a, R, D> SaveDraft<'a, R, D>
where
    R: ConsultationRepository + ?Sized,
    D: DraftRepository + ?Sized,
{
    /// Autosave upsert for (consultation, caller). The draft always carries
    /// the full working copy, so the row is replaced rather than patched.
    pub async fn execute(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
        sections: SectionSet,
        auto_saved: bool,
        notes: Option<String>,
    ) -> Result<ConsultationDraft, IntakeError> {
        let consultation = self
            .repo
            .get_for_user(consultation_id, user_id)
            .await?
            .ok_or(IntakeError::NotFound)?;
        if consultation.status == ConsultationStatus::Archived {
            return Err(IntakeError::Archived);
        }
        validate_sections(&sections)?;
        validate_notes(notes.as_deref())?;
        let draft = self
            .drafts
            .upsert(consultation_id, user_id, &sections, auto_saved, notes)
            .await?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::use_cases::consultations::test_support::{FakeDrafts, FakeRepo};

    #[tokio::test]
    async fn second_save_replaces_first() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let drafts = FakeDrafts::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let uc = SaveDraft {
            repo: &repo,
            drafts: &drafts,
        };
        let first = uc
            .execute(
                created.id,
                user,
                SectionSet {
                    contact_info: Some(json!({"name": "v1"})),
                    ..Default::default()
                },
                true,
                None,
            )
            .await
            .unwrap();
        let second = uc
            .execute(
                created.id,
                user,
                SectionSet {
                    contact_info: Some(json!({"name": "v2"})),
                    ..Default::default()
                },
                false,
                Some("call back tuesday".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.sections.contact_info, Some(json!({"name": "v2"})));
        assert!(!second.auto_saved);
        assert_eq!(second.notes.as_deref(), Some("call back tuesday"));
    }

    #[tokio::test]
    async fn draft_against_archived_consultation_is_rejected() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let drafts = FakeDrafts::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Archived);

        let uc = SaveDraft {
            repo: &repo,
            drafts: &drafts,
        };
        let err = uc
            .execute(created.id, user, SectionSet::default(), true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Archived));
    }

    #[tokio::test]
    async fn draft_for_missing_consultation_is_rejected() {
        let uc = SaveDraft {
            repo: &FakeRepo::default(),
            drafts: &FakeDrafts::default(),
        };
        let err = uc
            .execute(Uuid::new_v4(), Uuid::new_v4(), SectionSet::default(), true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::NotFound));
    }
}
