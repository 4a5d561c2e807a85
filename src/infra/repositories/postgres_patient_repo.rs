use crate::domain::{
    models::{patient::{Patient, PatientWithRefs, PatientStatus}, listing::{ListParams, PatientSortField}},
    ports::PatientRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use chrono::{DateTime, Utc};

pub struct PostgresPatientRepo {
    pool: PgPool,
}

impl PostgresPatientRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for PostgresPatientRepo {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError> {
        sqlx::query_as::<_, Patient>(
            r#"INSERT INTO patients (id, first_name, last_name, email, phone, status, company_id, primary_therapist_id, deleted_at, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#
        )
            .bind(&patient.id).bind(&patient.first_name).bind(&patient.last_name)
            .bind(&patient.email).bind(&patient.phone).bind(&patient.status)
            .bind(&patient.company_id).bind(&patient.primary_therapist_id)
            .bind(patient.deleted_at).bind(patient.created_at).bind(patient.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, AppError> {
        sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_with_refs(&self, params: &ListParams<PatientSortField>) -> Result<Vec<PatientWithRefs>, AppError> {
        let order_by = match params.sort_field.column() {
            Some(column) => format!("{} {} NULLS LAST, p.id ASC", column, params.sort_order.as_sql()),
            None => "p.created_at DESC, p.id ASC".to_string(),
        };
        let sql = format!(
            r#"SELECT p.id, p.first_name, p.last_name, p.email, p.phone, p.status, p.company_id,
                      p.primary_therapist_id, p.deleted_at, p.created_at, p.updated_at,
                      c.name AS company_name, u.full_name AS therapist_name
               FROM patients p
               LEFT JOIN companies c ON c.id = p.company_id
               LEFT JOIN users u ON u.id = p.primary_therapist_id
               WHERE p.deleted_at IS NULL AND p.status = $1
               ORDER BY {}
               LIMIT $2"#,
            order_by
        );
        sqlx::query_as::<_, PatientWithRefs>(&sql)
            .bind(PatientStatus::Active.as_str())
            .bind(params.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM patients WHERE deleted_at IS NULL AND status = $1")
            .bind(PatientStatus::Active.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_active_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM patients WHERE deleted_at IS NULL AND status = $1 AND created_at >= $2")
            .bind(PatientStatus::Active.as_str())
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE patients SET deleted_at = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL")
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Patient not found".into()));
        }
        Ok(())
    }
}
