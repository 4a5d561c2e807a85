use chrono::{DateTime, Utc};
use serde::Deserialize;
use crate::domain::models::listing::{
    parse_limit, CompanySortField, ListParams, PatientSortField, SortOrder,
};
use crate::error::AppError;

/// Fields are optional so missing values surface as 400s instead of extractor rejections.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Raw listing query; every value is parsed by hand so bad input maps to a 400 envelope.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub limit: Option<String>,
    #[serde(alias = "sort_by")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListQuery {
    fn limit(&self) -> Result<i64, AppError> {
        let raw = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(v.parse::<i64>().map_err(|_| {
                AppError::Validation(format!("limit must be an integer, got '{}'", v))
            })?),
        };
        parse_limit(raw)
    }

    pub fn patient_params(&self) -> Result<ListParams<PatientSortField>, AppError> {
        Ok(ListParams {
            limit: self.limit()?,
            sort_field: PatientSortField::parse(self.sort_by.as_deref())?,
            sort_order: SortOrder::parse(self.order.as_deref())?,
        })
    }

    pub fn company_params(&self) -> Result<ListParams<CompanySortField>, AppError> {
        Ok(ListParams {
            limit: self.limit()?,
            sort_field: CompanySortField::parse(self.sort_by.as_deref())?,
            sort_order: SortOrder::parse(self.order.as_deref())?,
        })
    }
}

#[derive(Deserialize)]
pub struct BillingContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub billing_contact: Option<BillingContactRequest>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub company_id: Option<String>,
    pub primary_therapist_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub therapist_id: Option<String>,
    pub notes: Option<String>,
}
