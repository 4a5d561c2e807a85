use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::domain::models::{company::Company, patient::Patient, session::ClinicalSession};
use crate::domain::services::directory_service::BillingContact;

/// Success envelope shared by every JSON route.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data) }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), data: Some(data) }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), data: None }
    }
}

/// Created company as echoed back to the caller: `isActive` mirrors the request and is
/// omitted when the request left it out.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCompanyResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub billing_contact: BillingContact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl CreatedCompanyResponse {
    pub fn new(company: Company, requested_is_active: Option<bool>) -> Self {
        Self {
            id: company.id,
            name: company.name,
            email: company.email,
            phone: company.phone,
            address: company.address,
            industry: company.industry,
            billing_contact: BillingContact {
                name: company.billing_contact_name,
                email: company.billing_contact_email,
                phone: company.billing_contact_phone,
            },
            is_active: requested_is_active,
            created_at: company.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub company_id: Option<String>,
    pub primary_therapist_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
            status: p.status,
            company_id: p.company_id,
            primary_therapist_id: p.primary_therapist_id,
            created_at: p.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub patient_id: String,
    pub therapist_id: Option<String>,
    pub date: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ClinicalSession> for SessionResponse {
    fn from(s: ClinicalSession) -> Self {
        Self {
            id: s.id,
            patient_id: s.patient_id,
            therapist_id: s.therapist_id,
            date: s.session_date,
            status: s.status,
            notes: s.notes,
            created_at: s.created_at,
        }
    }
}
