use crate::domain::{
    models::{company::Company, listing::{ListParams, CompanySortField}},
    ports::CompanyRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use chrono::{DateTime, Utc};

pub struct PostgresCompanyRepo {
    pool: PgPool,
}

impl PostgresCompanyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepo {
    async fn create(&self, company: &Company) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(
            r#"INSERT INTO companies (id, name, email, phone, address, industry, billing_contact_name, billing_contact_email, billing_contact_phone, is_active, deleted_at, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING *"#
        )
            .bind(&company.id).bind(&company.name).bind(&company.email).bind(&company.phone)
            .bind(&company.address).bind(&company.industry).bind(&company.billing_contact_name)
            .bind(&company.billing_contact_email).bind(&company.billing_contact_phone)
            .bind(company.is_active).bind(company.deleted_at).bind(company.created_at).bind(company.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, params: &ListParams<CompanySortField>) -> Result<Vec<Company>, AppError> {
        let sql = format!(
            "SELECT * FROM companies WHERE deleted_at IS NULL AND is_active = TRUE ORDER BY {} {} NULLS LAST, id ASC LIMIT $1",
            params.sort_field.column(),
            params.sort_order.as_sql(),
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(params.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM companies WHERE deleted_at IS NULL AND is_active = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE companies SET deleted_at = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL")
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Company not found".into()));
        }
        Ok(())
    }
}
