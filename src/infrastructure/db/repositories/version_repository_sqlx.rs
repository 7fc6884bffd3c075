use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::version_repository::{NewVersion, VersionRepository};
use crate::domain::consultations::consultation::ConsultationVersion;
use crate::domain::consultations::sections::SectionSet;
use crate::domain::consultations::status::ConsultationStatus;
use crate::infrastructure::db::PgPool;

const RETURNING: &str = "id, consultation_id, version_number, contact_info, business_context, \
                         pain_points, goals_objectives, status, completion_percentage, \
                         change_summary, changed_fields, created_by, created_at";

pub struct SqlxVersionRepository {
    pub pool: PgPool,
}

impl SqlxVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_version(r: &PgRow) -> anyhow::Result<ConsultationVersion> {
    let status_str: String = r.get("status");
    let status = ConsultationStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown consultation status in DB: {status_str}"))?;
    Ok(ConsultationVersion {
        id: r.get("id"),
        consultation_id: r.get("consultation_id"),
        version_number: r.get("version_number"),
        sections: SectionSet::new(
            r.get("contact_info"),
            r.get("business_context"),
            r.get("pain_points"),
            r.get("goals_objectives"),
        ),
        status,
        completion_percentage: r.get("completion_percentage"),
        change_summary: r.get("change_summary"),
        changed_fields: r.get("changed_fields"),
        created_by: r.get("created_by"),
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl VersionRepository for SqlxVersionRepository {
    async fn append(&self, version: &NewVersion) -> anyhow::Result<ConsultationVersion> {
        // Number assignment happens in the same statement so concurrent
        // appends cannot hand out the same version_number.
        let sql = format!(
            "INSERT INTO consultation_versions \
               (consultation_id, version_number, contact_info, business_context, pain_points, \
                goals_objectives, status, completion_percentage, change_summary, changed_fields, \
                created_by) \
             SELECT $1, COALESCE(MAX(version_number), 0) + 1, $2, $3, $4, $5, $6, $7, $8, $9, $10 \
             FROM consultation_versions WHERE consultation_id = $1 \
             RETURNING {RETURNING}"
        );
        let row = sqlx::query(&sql)
            .bind(version.consultation_id)
            .bind(&version.sections.contact_info)
            .bind(&version.sections.business_context)
            .bind(&version.sections.pain_points)
            .bind(&version.sections.goals_objectives)
            .bind(version.status.as_str())
            .bind(version.completion_percentage)
            .bind(&version.change_summary)
            .bind(&version.changed_fields)
            .bind(version.created_by)
            .fetch_one(&self.pool)
            .await?;
        map_version(&row)
    }

    async fn list_for_consultation(
        &self,
        consultation_id: Uuid,
    ) -> anyhow::Result<Vec<ConsultationVersion>> {
        let sql = format!(
            "SELECT {RETURNING} FROM consultation_versions \
             WHERE consultation_id = $1 \
             ORDER BY version_number DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(consultation_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_version).collect()
    }

    async fn get_by_number(
        &self,
        consultation_id: Uuid,
        version_number: i32,
    ) -> anyhow::Result<Option<ConsultationVersion>> {
        let sql = format!(
            "SELECT {RETURNING} FROM consultation_versions \
             WHERE consultation_id = $1 AND version_number = $2"
        );
        let row = sqlx::query(&sql)
            .bind(consultation_id)
            .bind(version_number)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_version).transpose()
    }

    async fn count_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM consultation_versions WHERE consultation_id = $1",
        )
        .bind(consultation_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete_all_for_consultation(&self, consultation_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM consultation_versions WHERE consultation_id = $1")
            .bind(consultation_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
