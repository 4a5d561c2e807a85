use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use std::fmt;
use std::str::FromStr;

/// A scheduled or completed appointment. Not to be confused with the auth token.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ClinicalSession {
    pub id: String,
    pub patient_id: String,
    pub therapist_id: Option<String>,
    pub session_date: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ClinicalSession {
    pub fn new(patient_id: String, session_date: DateTime<Utc>, status: SessionStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id,
            therapist_id: None,
            session_date,
            status: status.to_string(),
            notes: None,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            "no_show" => Ok(SessionStatus::NoShow),
            other => Err(format!("Unknown session status '{}'", other)),
        }
    }
}
