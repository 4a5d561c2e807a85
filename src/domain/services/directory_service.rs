use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::domain::{
    models::{company::Company, listing::{CompanySortField, ListParams}},
    ports::CompanyRepository,
};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BillingContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub billing_contact: BillingContact,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanySummary {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            industry: c.industry,
            billing_contact: BillingContact {
                name: c.billing_contact_name,
                email: c.billing_contact_email,
                phone: c.billing_contact_phone,
            },
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyListing {
    pub companies: Vec<CompanySummary>,
    pub total: i64,
}

pub struct DirectoryService {
    companies: Arc<dyn CompanyRepository>,
}

impl DirectoryService {
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self { companies }
    }

    #[instrument(name = "DirectoryService: list_companies", skip(self))]
    pub async fn list_companies(&self, params: ListParams<CompanySortField>) -> Result<CompanyListing, AppError> {
        let (rows, total) = tokio::try_join!(
            self.companies.list_active(&params),
            self.companies.count_active(),
        )?;

        Ok(CompanyListing {
            companies: rows.into_iter().map(CompanySummary::from).collect(),
            total,
        })
    }
}
