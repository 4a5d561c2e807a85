use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::session::SessionState;
use crate::domain::models::auth::LoginResult;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

/// HTTP client for the clinic API that owns the caller's session state.
/// Failures are surfaced once; nothing is retried.
pub struct ClinicClient {
    http: Client,
    base_url: String,
    state: SessionState,
}

impl ClinicClient {
    pub fn new(base_url: impl Into<String>, state: SessionState) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        self.state = std::mem::take(&mut self.state).begin_login();

        let request = self.http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));

        match send::<LoginResult>(request).await {
            Ok(result) => {
                debug!("Login succeeded for {}", result.user.email);
                self.state = std::mem::take(&mut self.state).login_succeeded(result.user, result.token);
                Ok(())
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.state = std::mem::take(&mut self.state).login_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Clears local state; the server-side cookie is cleared best-effort.
    pub async fn logout(&mut self) {
        if let Err(e) = self.http.post(self.url("/api/auth/logout")).send().await {
            warn!("Logout request failed: {}", e);
        }
        self.state = std::mem::take(&mut self.state).logout();
    }

    pub async fn me(&self) -> Result<Value, ClientError> {
        self.authed_get("/api/auth/me").await
    }

    pub async fn companies(&self, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        let token = self.state.token().ok_or(ClientError::NotAuthenticated)?;
        send(self.http.get(self.url("/api/companies")).query(query).bearer_auth(token)).await
    }

    pub async fn dashboard_patients(&self, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        let token = self.state.token().ok_or(ClientError::NotAuthenticated)?;
        send(self.http.get(self.url("/api/dashboard/patients")).query(query).bearer_auth(token)).await
    }

    async fn authed_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let token = self.state.token().ok_or(ClientError::NotAuthenticated)?;
        send(self.http.get(self.url(path)).bearer_auth(token)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let body: Envelope<T> = response
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    if !status.is_success() || !body.success {
        return Err(ClientError::Api {
            status,
            message: body.message.unwrap_or_else(|| status.to_string()),
        });
    }

    body.data.ok_or_else(|| ClientError::Decode("missing data".to_string()))
}
