pub mod auth;
pub mod company;
pub mod listing;
pub mod patient;
pub mod role;
pub mod session;
pub mod user;
