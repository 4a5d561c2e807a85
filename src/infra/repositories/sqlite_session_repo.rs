use crate::domain::{models::session::ClinicalSession, ports::SessionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqlitePool, Row};
use chrono::{DateTime, Utc};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepo {
    async fn create(&self, session: &ClinicalSession) -> Result<ClinicalSession, AppError> {
        sqlx::query_as::<_, ClinicalSession>(
            r#"INSERT INTO sessions (id, patient_id, therapist_id, session_date, status, notes, deleted_at, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&session.id)
            .bind(&session.patient_id)
            .bind(&session.therapist_id)
            .bind(session.session_date)
            .bind(&session.status)
            .bind(&session.notes)
            .bind(session.deleted_at)
            .bind(session.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_last_for_patient(&self, patient_id: &str) -> Result<Option<ClinicalSession>, AppError> {
        sqlx::query_as::<_, ClinicalSession>(
            "SELECT * FROM sessions WHERE patient_id = ? AND deleted_at IS NULL ORDER BY session_date DESC, created_at DESC LIMIT 1"
        )
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_for_patient(&self, patient_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM sessions WHERE patient_id = ? AND deleted_at IS NULL")
            .bind(patient_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_for_patient_with_status(&self, patient_id: &str, status: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM sessions WHERE patient_id = ? AND status = ? AND deleted_at IS NULL")
            .bind(patient_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE sessions SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Session not found".into()));
        }
        Ok(())
    }
}
