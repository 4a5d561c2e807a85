use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Role {
    pub name: String,
    pub description: String,
}

pub const DEFAULT_ROLES: [(&str, &str); 5] = [
    ("ADMIN", "Full access to clinic administration"),
    ("PSYCHOLOGIST", "Manages own patients and clinical sessions"),
    ("RECEPTIONIST", "Schedules appointments and maintains patient contact data"),
    ("ACCOUNTANT", "Handles company billing and invoicing"),
    ("COORDINATOR", "Coordinates client companies and therapist assignments"),
];

pub fn default_roles() -> Vec<Role> {
    DEFAULT_ROLES
        .iter()
        .map(|(name, description)| Role {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
}
