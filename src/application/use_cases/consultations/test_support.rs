//! In-memory port fakes shared by the use-case tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::application::ports::draft_repository::DraftRepository;
use crate::application::ports::version_repository::{NewVersion, VersionRepository};
use crate::domain::consultations::consultation::{
    Consultation, ConsultationDraft, ConsultationVersion,
};
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;

#[derive(Default)]
pub(crate) struct FakeRepo {
    rows: Mutex<HashMap<Uuid, Consultation>>,
}

impl FakeRepo {
    pub(crate) fn seed(
        &self,
        user_id: Uuid,
        sections: SectionSet,
        status: ConsultationStatus,
    ) -> Consultation {
        let now = chrono::Utc::now();
        let row = Consultation {
            id: Uuid::new_v4(),
            user_id,
            completion_percentage: sections.completion_percentage(),
            sections,
            status,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());
        row
    }
}

#[async_trait]
impl ConsultationRepository for FakeRepo {
    async fn create_for_user(
        &self,
        user_id: Uuid,
        sections: &SectionSet,
        completion: i32,
    ) -> anyhow::Result<Consultation> {
        let now = chrono::Utc::now();
        let row = Consultation {
            id: Uuid::new_v4(),
            user_id,
            sections: sections.clone(),
            status: ConsultationStatus::Draft,
            completion_percentage: completion,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<ConsultationStatus>,
    ) -> anyhow::Result<Vec<Consultation>> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<Consultation> = rows
            .values()
            .filter(|c| c.user_id == user_id && status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    async fn get_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Consultation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn update_sections(
        &self,
        id: Uuid,
        user_id: Uuid,
        sections: &SectionSet,
        completion: i32,
    ) -> anyhow::Result<Option<Consultation>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id).filter(|c| c.user_id == user_id) else {
            return Ok(None);
        };
        row.sections = sections.clone();
        row.completion_percentage = completion;
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }

    async fn update_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        status: ConsultationStatus,
    ) -> anyhow::Result<Option<Consultation>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id).filter(|c| c.user_id == user_id) else {
            return Ok(None);
        };
        row.status = status;
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get(&id) {
            Some(c) if c.user_id == user_id => {
                rows.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeVersions {
    rows: Mutex<Vec<ConsultationVersion>>,
}

impl FakeVersions {
    pub(crate) fn all(&self) -> Vec<ConsultationVersion> {
        self.rows.lock().unwrap().clone()
    }

    pub(crate) fn seed(&self, consultation_id: Uuid, created_by: Uuid) -> ConsultationVersion {
        let mut rows = self.rows.lock().unwrap();
        let number = rows
            .iter()
            .filter(|v| v.consultation_id == consultation_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1;
        let row = ConsultationVersion {
            id: Uuid::new_v4(),
            consultation_id,
            version_number: number,
            sections: SectionSet::default(),
            status: ConsultationStatus::Draft,
            completion_percentage: 0,
            change_summary: "seeded".to_string(),
            changed_fields: vec![],
            created_by,
            created_at: chrono::Utc::now(),
        };
        rows.push(row.clone());
        row
    }
}

#[async_trait]
impl VersionRepository for FakeVersions {
    async fn append(&self, version: &NewVersion) -> anyhow::Result<ConsultationVersion> {
        let mut rows = self.rows.lock().unwrap();
        let number = rows
            .iter()
            .filter(|v| v.consultation_id == version.consultation_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1;
        let row = ConsultationVersion {
            id: Uuid::new_v4(),
            consultation_id: version.consultation_id,
            version_number: number,
            sections: version.sections.clone(),
            status: version.status,
            completion_percentage: version.completion_percentage,
            change_summary: version.change_summary.clone(),
            changed_fields: version.changed_fields.clone(),
            created_by: version.created_by,
            created_at: chrono::Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_for_consultation(
        &self,
        consultation_id: Uuid,
    ) -> anyhow::Result<Vec<ConsultationVersion>> {
        let mut out: Vec<ConsultationVersion> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.consultation_id == consultation_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(out)
    }

    async fn get_by_number(
        &self,
        consultation_id: Uuid,
        version_number: i32,
    ) -> anyhow::Result<Option<ConsultationVersion>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.consultation_id == consultation_id && v.version_number == version_number)
            .cloned())
    }

    async fn count_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.consultation_id == consultation_id)
            .count() as i64)
    }

    async fn delete_all_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|v| v.consultation_id != consultation_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub(crate) struct FakeDrafts {
    rows: Mutex<HashMap<(Uuid, Uuid), ConsultationDraft>>,
}

#[async_trait]
impl DraftRepository for FakeDrafts {
    async fn upsert(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
        sections: &SectionSet,
        auto_saved: bool,
        notes: Option<String>,
    ) -> anyhow::Result<ConsultationDraft> {
        let mut rows = self.rows.lock().unwrap();
        let key = (consultation_id, user_id);
        let id = rows.get(&key).map(|d| d.id).unwrap_or_else(Uuid::new_v4);
        let row = ConsultationDraft {
            id,
            consultation_id,
            user_id,
            sections: sections.clone(),
            auto_saved,
            notes,
            updated_at: chrono::Utc::now(),
        };
        rows.insert(key, row.clone());
        Ok(row)
    }

    async fn get(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ConsultationDraft>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(consultation_id, user_id))
            .cloned())
    }

    async fn delete(&self, consultation_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .remove(&(consultation_id, user_id))
            .is_some())
    }

    async fn delete_all_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(cid, _), _| *cid != consultation_id);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_stale_autosaves(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, d| !(d.auto_saved && d.updated_at < cutoff));
        Ok((before - rows.len()) as u64)
    }
}
