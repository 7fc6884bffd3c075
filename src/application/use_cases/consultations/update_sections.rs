use serde_json::Value;
use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::version_repository::{NewVersion, VersionRepository};
use crate::application::validation::validate_sections;
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::sections::{SectionSet, changed_fields};
use crate::domain::consultations::status::ConsultationStatus;

/// Per-section patch. None => untouched; Some(None) => cleared;
/// Some(Some(value)) => replaced.
#[derive(Debug, Clone, Default)]
pub struct SectionChanges {
    pub contact_info: Option<Option<Value>>,
    pub business_context: Option<Option<Value>>,
    pub pain_points: Option<Option<Value>>,
    pub goals_objectives: Option<Option<Value>>,
}

impl SectionChanges {
    pub fn apply_to(&self, current: &SectionSet) -> SectionSet {
        fn pick(change: &Option<Option<Value>>, current: &Option<Value>) -> Option<Value> {
            match change {
                None => current.clone(),
                Some(v) => v.clone(),
            }
        }
        SectionSet {
            contact_info: pick(&self.contact_info, &current.contact_info),
            business_context: pick(&self.business_context, &current.business_context),
            pain_points: pick(&self.pain_points, &current.pain_points),
            goals_objectives: pick(&self.goals_objectives, &current.goals_objectives),
        }
    }
}

pub struct UpdateSections<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    pub repo: &'a R,
    pub versions: &'a V,
}

impl<'a, R, V> UpdateSections<'a, R, V>
where
    R: ConsultationRepository + ?Sized,
    V: VersionRepository + ?Sized,
{
    /// Applies a partial section update, recomputes completion and appends a
    /// version snapshot of the new state. A patch that changes nothing is a
    /// no-op and records no version.
    pub async fn execute(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: SectionChanges,
    ) -> Result<Consultation, IntakeError> {
        let current = self
            .repo
            .get_for_user(id, user_id)
            .await?
            .ok_or(IntakeError::NotFound)?;
        if current.status == ConsultationStatus::Archived {
            return Err(IntakeError::Archived);
        }

        let next = changes.apply_to(&current.sections);
        validate_sections(&next)?;

        let changed = changed_fields(&current.sections, current.status, &next, current.status);
        if changed.is_empty() {
            return Ok(current);
        }

        let completion = next.completion_percentage();
        let updated = self
            .repo
            .update_sections(id, user_id, &next, completion)
            .await?
            .ok_or(IntakeError::NotFound)?;

        self.versions
            .append(&NewVersion {
                consultation_id: updated.id,
                sections: updated.sections.clone(),
                status: updated.status,
                completion_percentage: updated.completion_percentage,
                change_summary: format!("updated {}", changed.join(", ")),
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

    fn changes_with_contact(value: Value) -> SectionChanges {
        SectionChanges {
            contact_info: Some(Some(value)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn update_records_version_and_completion() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let uc = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        let updated = uc
            .execute(
                created.id,
                user,
                changes_with_contact(json!({"name": "Acme", "email": "a@b.co"})),
            )
            .await
            .unwrap();

        assert_eq!(updated.completion_percentage, 25);
        let stored = versions.all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].version_number, 1);
        assert_eq!(stored[0].changed_fields, vec!["contact_info"]);
        assert_eq!(stored[0].change_summary, "updated contact_info");
    }

    #[tokio::test]
    async fn noop_patch_records_nothing() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let sections = SectionSet {
            contact_info: Some(json!({"name": "Acme"})),
            ..Default::default()
        };
        let created = repo.seed(user, sections.clone(), ConsultationStatus::Draft);

        let uc = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        let updated = uc
            .execute(created.id, user, changes_with_contact(json!({"name": "Acme"})))
            .await
            .unwrap();

        assert_eq!(updated.completion_percentage, created.completion_percentage);
        assert!(versions.all().is_empty());
    }

    #[tokio::test]
    async fn clearing_a_section_drops_completion() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let sections = SectionSet {
            contact_info: Some(json!({"name": "Acme"})),
            pain_points: Some(json!({"main": "churn"})),
            ..Default::default()
        };
        let created = repo.seed(user, sections, ConsultationStatus::Draft);

        let uc = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        let updated = uc
            .execute(
                created.id,
                user,
                SectionChanges {
                    pain_points: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.completion_percentage, 25);
        assert_eq!(versions.all()[0].changed_fields, vec!["pain_points"]);
    }

    #[tokio::test]
    async fn archived_is_read_only() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Archived);

        let uc = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        let err = uc
            .execute(created.id, user, changes_with_contact(json!({"name": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Archived));
    }

    #[tokio::test]
    async fn invalid_section_shape_is_rejected() {
        let user = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);

        let uc = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        let err = uc
            .execute(created.id, user, changes_with_contact(json!(["not", "an", "object"])))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Validation(_)));
        assert!(versions.all().is_empty());
    }

    #[tokio::test]
    async fn foreign_consultation_reads_as_missing() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let repo = FakeRepo::default();
        let versions = FakeVersions::default();
        let created = repo.seed(owner, SectionSet::default(), ConsultationStatus::Draft);

        let uc = UpdateSections {
            repo: &repo,
            versions: &versions,
        };
        let err = uc
            .execute(created.id, intruder, changes_with_contact(json!({"k": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::NotFound));
    }
}
