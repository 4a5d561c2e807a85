pub mod sqlite_user_repo;
pub mod sqlite_role_repo;
pub mod sqlite_company_repo;
pub mod sqlite_patient_repo;
pub mod sqlite_session_repo;

pub mod postgres_user_repo;
pub mod postgres_role_repo;
pub mod postgres_company_repo;
pub mod postgres_patient_repo;
pub mod postgres_session_repo;
