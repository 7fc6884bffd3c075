use crate::application::ports::draft_repository::DraftRepository;

pub struct SweepStaleDrafts<'a, D: DraftRepository + ?Sized> {
    pub drafts: &'a D,
}

impl<'a, D: DraftRepository + ?Sized> SweepStaleDrafts<'a, D> {
    /// Drops auto-saved drafts untouched for `retention_days`. Drafts the user
    /// saved explicitly are kept until discarded or applied.
    pub async fn execute(&self, retention_days: i64) -> anyhow::Result<u64> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(retention_days);
        let removed = self.drafts.delete_stale_autosaves(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, retention_days, "stale_autosave_drafts_swept");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::application::use_cases::consultations::test_support::FakeDrafts;
    use crate::domain::consultations::sections::SectionSet;

    #[tokio::test]
    async fn fresh_and_manual_drafts_survive() {
        let drafts = FakeDrafts::default();
        drafts
            .upsert(Uuid::new_v4(), Uuid::new_v4(), &SectionSet::default(), true, None)
            .await
            .unwrap();
        drafts
            .upsert(Uuid::new_v4(), Uuid::new_v4(), &SectionSet::default(), false, None)
            .await
            .unwrap();

        let uc = SweepStaleDrafts { drafts: &drafts };
        // both rows were touched just now, so a 30-day sweep removes nothing
        assert_eq!(uc.execute(30).await.unwrap(), 0);
        // a cutoff in the future removes only the auto-saved row
        let removed = drafts
            .delete_stale_autosaves(chrono::Utc::now() + chrono::Duration::days(1))
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
