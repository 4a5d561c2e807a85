use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::LoginRequest, responses::ApiResponse};
use crate::api::extractors::{auth::{AuthUser, AUTH_COOKIE}, json::ApiJson};
use crate::domain::models::auth::TOKEN_TTL_HOURS;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.filter(|e| !e.trim().is_empty());
    let password = payload.password.filter(|p| !p.is_empty());

    let (email, password) = match (email, password) {
        (Some(e), Some(p)) => (e, p),
        _ => return Err(AppError::Validation("Email and password are required".into())),
    };

    let result = state.auth_service.login(&email, &password).await?;

    set_auth_cookie(&cookies, &result.token);

    Ok(Json(ApiResponse::with_message("Login successful", result)))
}

pub async fn me(user: AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ApiResponse::ok(user.0)))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build((AUTH_COOKIE, "")).path("/").into());
    info!("User logged out");
    Ok(Json(ApiResponse::message_only("Logged out")))
}

fn set_auth_cookie(cookies: &Cookies, token: &str) {
    let mut cookie = Cookie::new(AUTH_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(Duration::hours(TOKEN_TTL_HOURS));
    cookies.add(cookie);
}
