use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub company_id: Option<String>,
    pub primary_therapist_id: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewPatientParams {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: PatientStatus,
    pub company_id: Option<String>,
    pub primary_therapist_id: Option<String>,
}

impl Patient {
    pub fn new(params: NewPatientParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            phone: params.phone,
            status: params.status.to_string(),
            company_id: params.company_id,
            primary_therapist_id: params.primary_therapist_id,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patient row joined with the display names of its weak references.
#[derive(Debug, FromRow, Clone)]
pub struct PatientWithRefs {
    #[sqlx(flatten)]
    pub patient: Patient,
    pub company_name: Option<String>,
    pub therapist_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientStatus {
    Active,
    Inactive,
    Discharged,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "active",
            PatientStatus::Inactive => "inactive",
            PatientStatus::Discharged => "discharged",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PatientStatus::Active),
            "inactive" => Ok(PatientStatus::Inactive),
            "discharged" => Ok(PatientStatus::Discharged),
            other => Err(format!("Unknown patient status '{}'", other)),
        }
    }
}
