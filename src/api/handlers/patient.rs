use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::{
    requests::{CreatePatientRequest, CreateSessionRequest},
    responses::{ApiResponse, PatientResponse, SessionResponse},
};
use crate::api::handlers::company::non_blank;
use crate::domain::models::{
    patient::{NewPatientParams, Patient, PatientStatus},
    session::{ClinicalSession, SessionStatus},
};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiJson(payload): ApiJson<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let first_name = non_blank(payload.first_name)
        .ok_or(AppError::Validation("firstName is required".into()))?;
    let last_name = non_blank(payload.last_name)
        .ok_or(AppError::Validation("lastName is required".into()))?;

    let status = match payload.status.as_deref() {
        None => PatientStatus::Active,
        Some(raw) => raw.parse::<PatientStatus>().map_err(AppError::Validation)?,
    };

    let company_id = non_blank(payload.company_id);
    let primary_therapist_id = non_blank(payload.primary_therapist_id);
    ensure_company(&state, company_id.as_deref()).await?;
    ensure_therapist(&state, primary_therapist_id.as_deref(), "primaryTherapistId").await?;

    let patient = Patient::new(NewPatientParams {
        first_name,
        last_name,
        email: non_blank(payload.email),
        phone: non_blank(payload.phone),
        status,
        company_id,
        primary_therapist_id,
    });

    let created = state.patient_repo.create(&patient).await?;
    info!("Created patient {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Patient created successfully", PatientResponse::from(created))),
    ))
}

pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.patient_repo.soft_delete(&patient_id, Utc::now()).await?;
    info!("Soft-deleted patient {}", patient_id);
    Ok(Json(ApiResponse::message_only("Patient deleted")))
}

pub async fn schedule_session(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(patient_id): Path<String>,
    ApiJson(payload): ApiJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = payload.date
        .ok_or(AppError::Validation("Session date is required".into()))?;

    let status = match payload.status.as_deref() {
        None => SessionStatus::Scheduled,
        Some(raw) => raw.parse::<SessionStatus>().map_err(AppError::Validation)?,
    };

    let patient = state.patient_repo.find_by_id(&patient_id).await?
        .ok_or(AppError::NotFound("Patient not found".into()))?;

    let requested_therapist = non_blank(payload.therapist_id);
    ensure_therapist(&state, requested_therapist.as_deref(), "therapistId").await?;

    let mut session = ClinicalSession::new(patient.id, date, status);
    session.therapist_id = requested_therapist.or(patient.primary_therapist_id);
    session.notes = payload.notes;

    let created = state.session_repo.create(&session).await?;
    info!("Scheduled session {} for patient {}", created.id, patient_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Session scheduled", SessionResponse::from(created))),
    ))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.session_repo.soft_delete(&session_id, Utc::now()).await?;
    info!("Soft-deleted session {}", session_id);
    Ok(Json(ApiResponse::message_only("Session deleted")))
}

async fn ensure_company(state: &AppState, company_id: Option<&str>) -> Result<(), AppError> {
    let Some(id) = company_id else { return Ok(()) };
    match state.company_repo.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(format!("companyId '{}' does not reference a company", id))),
    }
}

async fn ensure_therapist(state: &AppState, user_id: Option<&str>, field: &str) -> Result<(), AppError> {
    let Some(id) = user_id else { return Ok(()) };
    match state.user_repo.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(format!("{} '{}' does not reference a user", field, id))),
    }
}
