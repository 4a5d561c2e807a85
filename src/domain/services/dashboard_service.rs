use std::cmp::Ordering;
use std::sync::Arc;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{
    models::{
        listing::{ListParams, PatientSortField, SortOrder},
        patient::PatientWithRefs,
        session::{ClinicalSession, SessionStatus},
    },
    ports::{PatientRepository, SessionRepository},
};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastSession {
    pub id: String,
    pub date: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub company: Option<EntityRef>,
    pub primary_therapist: Option<EntityRef>,
    pub last_session: Option<LastSession>,
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub created_at: DateTime<Utc>,
}

impl PatientSummary {
    fn last_session_date(&self) -> DateTime<Utc> {
        self.last_session
            .as_ref()
            .map(|s| s.date)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientsDashboard {
    pub patients: Vec<PatientSummary>,
    pub total: i64,
    pub new_this_month: i64,
    pub returned: usize,
}

pub struct DashboardService {
    patients: Arc<dyn PatientRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl DashboardService {
    pub fn new(patients: Arc<dyn PatientRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { patients, sessions }
    }

    #[instrument(name = "DashboardService: list_patients", skip(self))]
    pub async fn list_patients(&self, params: ListParams<PatientSortField>, now: DateTime<Utc>) -> Result<PatientsDashboard, AppError> {
        let page = self.patients.list_active_with_refs(&params).await?;

        let mut patients = try_join_all(page.into_iter().map(|row| self.enrich(row))).await?;

        if params.sort_field == PatientSortField::LastSession {
            sort_by_last_session(&mut patients, params.sort_order);
        }

        let (total, new_this_month) = tokio::try_join!(
            self.patients.count_active(),
            self.patients.count_active_created_since(start_of_month(now)),
        )?;

        debug!(returned = patients.len(), total, new_this_month, "Assembled patients dashboard");

        Ok(PatientsDashboard {
            returned: patients.len(),
            patients,
            total,
            new_this_month,
        })
    }

    async fn enrich(&self, row: PatientWithRefs) -> Result<PatientSummary, AppError> {
        let patient_id = row.patient.id.as_str();
        let (last, total, completed) = tokio::try_join!(
            self.sessions.find_last_for_patient(patient_id),
            self.sessions.count_for_patient(patient_id),
            self.sessions.count_for_patient_with_status(patient_id, SessionStatus::Completed.as_str()),
        )?;

        Ok(summarize(row, last, total, completed))
    }
}

fn summarize(row: PatientWithRefs, last: Option<ClinicalSession>, total: i64, completed: i64) -> PatientSummary {
    let PatientWithRefs { patient, company_name, therapist_name } = row;

    let company = patient.company_id.clone().map(|id| EntityRef {
        id,
        name: company_name.unwrap_or_default(),
    });
    let primary_therapist = patient.primary_therapist_id.clone().map(|id| EntityRef {
        id,
        name: therapist_name.unwrap_or_default(),
    });

    PatientSummary {
        full_name: format!("{} {}", patient.first_name, patient.last_name),
        id: patient.id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        email: patient.email,
        phone: patient.phone,
        status: patient.status,
        company,
        primary_therapist,
        last_session: last.map(|s| LastSession {
            id: s.id,
            date: s.session_date,
            status: s.status,
        }),
        total_sessions: total,
        completed_sessions: completed,
        created_at: patient.created_at,
    }
}

/// Stable sort; patients without sessions compare as the Unix epoch.
pub fn sort_by_last_session(patients: &mut [PatientSummary], order: SortOrder) {
    patients.sort_by(|a, b| {
        let ord: Ordering = a.last_session_date().cmp(&b.last_session_date());
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
