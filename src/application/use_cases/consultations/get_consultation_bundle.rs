use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::intake_error::IntakeError;
use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::draft_repository::DraftRepository;
use crate::application::ports::version_repository::VersionRepository;
use crate::domain::consultations::consultation::{Consultation, ConsultationDraft};

#[derive(Debug)]
pub struct ConsultationBundle {
    pub consultation: Consultation,
    pub draft: Option<ConsultationDraft>,
    pub version_count: i64,
}

enum BundlePart {
    Consultation(anyhow::Result<Option<Consultation>>),
    Draft(anyhow::Result<Option<ConsultationDraft>>),
}

/// Detail read for the wizard: the row and the caller's draft are fetched by
/// two spawned tasks and joined over a channel. Holds `Arc`s because the
/// reads need `'static` repositories.
pub struct GetConsultationBundle {
    pub consultations: Arc<dyn ConsultationRepository>,
    pub drafts: Arc<dyn DraftRepository>,
    pub versions: Arc<dyn VersionRepository>,
}

impl GetConsultationBundle {
    pub async fn execute(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<ConsultationBundle, IntakeError> {
        let (tx, mut rx) = mpsc::channel::<BundlePart>(2);

        let consultations = self.consultations.clone();
        let consultation_tx = tx.clone();
        tokio::spawn(async move {
            let res = consultations.get_for_user(id, user_id).await;
            let _ = consultation_tx.send(BundlePart::Consultation(res)).await;
        });

        let drafts = self.drafts.clone();
        tokio::spawn(async move {
            let res = drafts.get(id, user_id).await;
            let _ = tx.send(BundlePart::Draft(res)).await;
        });

        let mut consultation = None;
        let mut draft = None;
        for _ in 0..2 {
            match rx.recv().await {
                Some(BundlePart::Consultation(res)) => consultation = res?,
                Some(BundlePart::Draft(res)) => draft = res?,
                None => {
                    return Err(IntakeError::Other(anyhow::anyhow!(
                        "bundle fetch task dropped"
                    )));
                }
            }
        }

        let consultation = consultation.ok_or(IntakeError::NotFound)?;
        let version_count = self.versions.count_for_consultation(id).await?;
        Ok(ConsultationBundle {
            consultation,
            draft,
            version_count,
        })
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
    async fn joins_row_and_draft() {
        let user = Uuid::new_v4();
        let repo = Arc::new(FakeRepo::default());
        let drafts = Arc::new(FakeDrafts::default());
        let versions = Arc::new(FakeVersions::default());
        let created = repo.seed(user, SectionSet::default(), ConsultationStatus::Draft);
        drafts
            .upsert(
                created.id,
                user,
                &SectionSet {
                    contact_info: Some(json!({"name": "wip"})),
                    ..Default::default()
                },
                true,
                None,
            )
            .await
            .unwrap();

        let uc = GetConsultationBundle {
            consultations: repo,
            drafts,
            versions,
        };
        let bundle = uc.execute(created.id, user).await.unwrap();
        assert_eq!(bundle.consultation.id, created.id);
        assert!(bundle.draft.is_some());
        assert_eq!(bundle.version_count, 0);
    }

    #[tokio::test]
    async fn missing_row_is_not_found_even_with_draft() {
        let user = Uuid::new_v4();
        let uc = GetConsultationBundle {
            consultations: Arc::new(FakeRepo::default()),
            drafts: Arc::new(FakeDrafts::default()),
            versions: Arc::new(FakeVersions::default()),
        };
        let err = uc.execute(Uuid::new_v4(), user).await.unwrap_err();
        assert!(matches!(err, IntakeError::NotFound));
    }
}
