use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::responses::ApiResponse;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.role_repo.list().await?;
    Ok(Json(ApiResponse::ok(roles)))
}
