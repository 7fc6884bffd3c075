use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::draft_repository::DraftRepository;
use crate::domain::consultations::consultation::ConsultationDraft;
use crate::domain::consultations::sections::SectionSet;
use crate::infrastructure::db::PgPool;

const RETURNING: &str = "id, consultation_id, user_id, contact_info, business_context, \
                         pain_points, goals_objectives, auto_saved, notes, updated_at";

pub struct SqlxDraftRepository {
    pub pool: PgPool,
}

impl SqlxDraftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_draft(r: &PgRow) -> ConsultationDraft {
    ConsultationDraft {
        id: r.get("id"),
        consultation_id: r.get("consultation_id"),
        user_id: r.get("user_id"),
        sections: SectionSet::new(
            r.get("contact_info"),
            r.get("business_context"),
            r.get("pain_points"),
            r.get("goals_objectives"),
        ),
        auto_saved: r.get("auto_saved"),
        notes: r.try_get("notes").ok(),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl DraftRepository for SqlxDraftRepository {
    async fn upsert(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
        sections: &SectionSet,
        auto_saved: bool,
        notes: Option<String>,
    ) -> anyhow::Result<ConsultationDraft> {
        let sql = format!(
            "INSERT INTO consultation_drafts \
               (consultation_id, user_id, contact_info, business_context, pain_points, \
                goals_objectives, auto_saved, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (consultation_id, user_id) DO UPDATE SET \
                contact_info = EXCLUDED.contact_info, \
                business_context = EXCLUDED.business_context, \
                pain_points = EXCLUDED.pain_points, \
                goals_objectives = EXCLUDED.goals_objectives, \
                auto_saved = EXCLUDED.auto_saved, \
                notes = EXCLUDED.notes, \
                updated_at = now() \
             RETURNING {RETURNING}"
        );
        let row = sqlx::query(&sql)
            .bind(consultation_id)
            .bind(user_id)
            .bind(&sections.contact_info)
            .bind(&sections.business_context)
            .bind(&sections.pain_points)
            .bind(&sections.goals_objectives)
            .bind(auto_saved)
            .bind(notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(map_draft(&row))
    }

    async fn get(
        &self,
        consultation_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ConsultationDraft>> {
        let sql = format!(
            "SELECT {RETURNING} FROM consultation_drafts \
             WHERE consultation_id = $1 AND user_id = $2"
        );
        let row = sqlx::query(&sql)
            .bind(consultation_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_draft))
    }

    async fn delete(&self, consultation_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "DELETE FROM consultation_drafts WHERE consultation_id = $1 AND user_id = $2",
        )
        .bind(consultation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_all_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM consultation_drafts WHERE consultation_id = $1")
            .bind(consultation_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_stale_autosaves(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<u64> {
        let res =
            sqlx::query("DELETE FROM consultation_drafts WHERE auto_saved AND updated_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        Ok(res.rows_affected())
    }
}
