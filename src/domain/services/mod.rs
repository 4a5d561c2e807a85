pub mod auth_service;
pub mod dashboard_service;
pub mod directory_service;
