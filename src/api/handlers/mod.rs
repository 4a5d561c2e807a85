pub mod auth;
pub mod company;
pub mod dashboard;
pub mod health;
pub mod patient;
pub mod role;
