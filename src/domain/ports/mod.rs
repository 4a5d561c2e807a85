use crate::domain::models::{
    user::User, company::Company, patient::{Patient, PatientWithRefs},
    session::ClinicalSession, role::Role,
    listing::{ListParams, CompanySortField, PatientSortField},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Inserts the fixed role catalog; rows that already exist are left untouched.
    async fn seed_defaults(&self) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Role>, AppError>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: &Company) -> Result<Company, AppError>;
    /// Soft-deleted companies are not returned.
    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError>;
    async fn list_active(&self, params: &ListParams<CompanySortField>) -> Result<Vec<Company>, AppError>;
    async fn count_active(&self) -> Result<i64, AppError>;
    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, AppError>;
    async fn list_active_with_refs(&self, params: &ListParams<PatientSortField>) -> Result<Vec<PatientWithRefs>, AppError>;
    async fn count_active(&self) -> Result<i64, AppError>;
    async fn count_active_created_since(&self, since: DateTime<Utc>) -> Result<i64, AppError>;
    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &ClinicalSession) -> Result<ClinicalSession, AppError>;
    async fn find_last_for_patient(&self, patient_id: &str) -> Result<Option<ClinicalSession>, AppError>;
    async fn count_for_patient(&self, patient_id: &str) -> Result<i64, AppError>;
    async fn count_for_patient_with_status(&self, patient_id: &str, status: &str) -> Result<i64, AppError>;
    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}
