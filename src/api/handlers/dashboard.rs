use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, query::ApiQuery};
use crate::api::dtos::{requests::ListQuery, responses::ApiResponse};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = query.patient_params()?;
    let dashboard = state.dashboard_service.list_patients(params, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(dashboard)))
}
