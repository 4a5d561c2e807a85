use std::sync::Arc;
use crate::domain::ports::{
    UserRepository, RoleRepository, CompanyRepository, PatientRepository, SessionRepository,
};
use crate::domain::services::{
    auth_service::AuthService, dashboard_service::DashboardService, directory_service::DirectoryService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub role_repo: Arc<dyn RoleRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub patient_repo: Arc<dyn PatientRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub auth_service: Arc<AuthService>,
    pub dashboard_service: Arc<DashboardService>,
    pub directory_service: Arc<DirectoryService>,
}

impl AppState {
    /// Wires services on top of an already-connected set of repositories.
    pub fn assemble(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        role_repo: Arc<dyn RoleRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        patient_repo: Arc<dyn PatientRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Result<Self, crate::error::AppError> {
        let auth_service = Arc::new(AuthService::new(user_repo.clone(), &config)?);
        let dashboard_service = Arc::new(DashboardService::new(patient_repo.clone(), session_repo.clone()));
        let directory_service = Arc::new(DirectoryService::new(company_repo.clone()));

        Ok(Self {
            config,
            user_repo,
            role_repo,
            company_repo,
            patient_repo,
            session_repo,
            auth_service,
            dashboard_service,
            directory_service,
        })
    }
}
