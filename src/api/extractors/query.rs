use axum::{
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use crate::error::AppError;

/// `Query<T>` whose rejections render through the uniform error envelope as 400s.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: QueryRejection) -> AppError {
    AppError::ValidationWithDetails {
        message: "Malformed query string".to_string(),
        details: json!({ "reason": rejection.body_text() }),
    }
}
