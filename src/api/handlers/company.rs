use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson, query::ApiQuery};
use crate::api::dtos::{
    requests::{CreateCompanyRequest, ListQuery},
    responses::{ApiResponse, CreatedCompanyResponse},
};
use crate::domain::models::company::{Company, NewCompanyParams};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = query.company_params()?;
    let listing = state.directory_service.list_companies(params).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

pub async fn create_company(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiJson(payload): ApiJson<CreateCompanyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = non_blank(payload.name)
        .ok_or(AppError::Validation("Company name is required".into()))?;
    let email = non_blank(payload.email)
        .ok_or(AppError::Validation("Company email is required".into()))?;

    let billing = payload.billing_contact;
    let requested_is_active = payload.is_active;

    let company = Company::new(NewCompanyParams {
        name,
        email,
        phone: payload.phone,
        address: payload.address,
        industry: payload.industry,
        billing_contact_name: billing.as_ref().and_then(|b| b.name.clone()),
        billing_contact_email: billing.as_ref().and_then(|b| b.email.clone()),
        billing_contact_phone: billing.and_then(|b| b.phone),
        is_active: requested_is_active,
    });

    let created = state.company_repo.create(&company).await?;
    info!("Created company: {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Company created successfully",
            CreatedCompanyResponse::new(created, requested_is_active),
        )),
    ))
}

pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.company_repo.soft_delete(&company_id, Utc::now()).await?;
    info!("Soft-deleted company {}", company_id);
    Ok(Json(ApiResponse::message_only("Company deleted")))
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
