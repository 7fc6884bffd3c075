use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::consultation_repository::ConsultationRepository;
use crate::domain::consultations::consultation::Consultation;
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;
use crate::infrastructure::db::PgPool;

const RETURNING: &str = "id, user_id, contact_info, business_context, pain_points, \
                         goals_objectives, status, completion_percentage, created_at, updated_at";

pub struct SqlxConsultationRepository {
    pub pool: PgPool,
}

impl SqlxConsultationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_consultation(r: &PgRow) -> anyhow::Result<Consultation> {
    let status_str: String = r.get("status");
    let status = ConsultationStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown consultation status in DB: {status_str}"))?;
    Ok(Consultation {
        id: r.get("id"),
        user_id: r.get("user_id"),
        sections: SectionSet::new(
            r.get("contact_info"),
            r.get("business_context"),
            r.get("pain_points"),
            r.get("goals_objectives"),
        ),
        status,
        completion_percentage: r.get("completion_percentage"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl ConsultationRepository for SqlxConsultationRepository {
    async fn create_for_user(
        &self,
        user_id: Uuid,
        sections: &SectionSet,
        completion: i32,
    ) -> anyhow::Result<Consultation> {
        let sql = format!(
            "INSERT INTO consultations \
               (user_id, contact_info, business_context, pain_points, goals_objectives, \
                status, completion_percentage) \
             VALUES ($1, $2, $3, $4, $5, 'draft', $6) \
             RETURNING {RETURNING}"
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(&sections.contact_info)
            .bind(&sections.business_context)
            .bind(&sections.pain_points)
            .bind(&sections.goals_objectives)
            .bind(completion)
            .fetch_one(&self.pool)
            .await?;
        map_consultation(&row)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<ConsultationStatus>,
    ) -> anyhow::Result<Vec<Consultation>> {
        let rows = if let Some(s) = status {
            let sql = format!(
                "SELECT {RETURNING} FROM consultations \
                 WHERE user_id = $1 AND status = $2 \
                 ORDER BY updated_at DESC LIMIT 100"
            );
            sqlx::query(&sql)
                .bind(user_id)
                .bind(s.as_str())
                .fetch_all(&self.pool)
                .await?
        } else {
            let sql = format!(
                "SELECT {RETURNING} FROM consultations \
                 WHERE user_id = $1 \
                 ORDER BY updated_at DESC LIMIT 100"
            );
            sqlx::query(&sql)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
        };
        rows.iter().map(map_consultation).collect()
    }

    async fn get_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Consultation>> {
        let sql = format!("SELECT {RETURNING} FROM consultations WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_consultation).transpose()
    }

    async fn update_sections(
        &self,
        id: Uuid,
        user_id: Uuid,
        sections: &SectionSet,
        completion: i32,
    ) -> anyhow::Result<Option<Consultation>> {
        let sql = format!(
            "UPDATE consultations SET \
                contact_info = $1, \
                business_context = $2, \
                pain_points = $3, \
                goals_objectives = $4, \
                completion_percentage = $5, \
                updated_at = now() \
             WHERE id = $6 AND user_id = $7 \
             RETURNING {RETURNING}"
        );
        let row = sqlx::query(&sql)
            .bind(&sections.contact_info)
            .bind(&sections.business_context)
            .bind(&sections.pain_points)
            .bind(&sections.goals_objectives)
            .bind(completion)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_consultation).transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        status: ConsultationStatus,
    ) -> anyhow::Result<Option<Consultation>> {
        let sql = format!(
            "UPDATE consultations SET status = $1, updated_at = now() \
             WHERE id = $2 AND user_id = $3 \
             RETURNING {RETURNING}"
        );
        let row = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_consultation).transpose()
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM consultations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
