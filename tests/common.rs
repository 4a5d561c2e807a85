use clinic_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::{
        company::{Company, NewCompanyParams},
        patient::{NewPatientParams, Patient, PatientStatus},
        session::{ClinicalSession, SessionStatus},
        user::User,
    },
    domain::services::auth_service::hash_password,
    infra::factory::{run_sqlite_migrations, sqlite_state},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    Router,
};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_PASSWORD: &str = "s3cret-pass";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_password_verification(true).await
    }

    pub async fn with_password_verification(verify_passwords: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            verify_passwords,
        };

        let state = Arc::new(sqlite_state(config, pool.clone()).expect("Failed to assemble state"));
        state.role_repo.seed_defaults().await.expect("Failed to seed roles");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn create_user(&self, email: &str, full_name: &str, role: &str, is_active: bool) -> User {
        let mut user = User::new(
            email.to_string(),
            hash_password(TEST_PASSWORD).unwrap(),
            full_name.to_string(),
            role.to_string(),
        );
        user.is_active = is_active;
        self.state.user_repo.create(&user).await.unwrap()
    }

    /// Creates an active admin and returns a bearer token for it.
    pub async fn admin_token(&self) -> String {
        let email = format!("admin-{}@clinic.test", Uuid::new_v4());
        self.create_user(&email, "Clinic Admin", "ADMIN", true).await;
        self.login(&email, TEST_PASSWORD).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        body_json["data"]["token"].as_str().expect("No token in body").to_string()
    }

    pub async fn create_company(&self, name: &str, is_active: bool) -> Company {
        let company = Company::new(NewCompanyParams {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', "-")),
            phone: None,
            address: None,
            industry: Some("Services".to_string()),
            billing_contact_name: Some(format!("{} Billing", name)),
            billing_contact_email: None,
            billing_contact_phone: None,
            is_active: Some(is_active),
        });
        self.state.company_repo.create(&company).await.unwrap()
    }

    pub async fn create_patient(&self, first_name: &str, status: PatientStatus, created_at: DateTime<Utc>) -> Patient {
        self.create_patient_with_refs(first_name, status, created_at, None, None).await
    }

    pub async fn create_patient_with_refs(
        &self,
        first_name: &str,
        status: PatientStatus,
        created_at: DateTime<Utc>,
        company_id: Option<String>,
        therapist_id: Option<String>,
    ) -> Patient {
        let mut patient = Patient::new(NewPatientParams {
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: None,
            phone: None,
            status,
            company_id,
            primary_therapist_id: therapist_id,
        });
        patient.created_at = created_at;
        patient.updated_at = created_at;
        self.state.patient_repo.create(&patient).await.unwrap()
    }

    pub async fn create_session(&self, patient_id: &str, date: DateTime<Utc>, status: SessionStatus) -> ClinicalSession {
        let session = ClinicalSession::new(patient_id.to_string(), date, status);
        self.state.session_repo.create(&session).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    pub async fn send_json(&self, method: &str, uri: &str, token: Option<&str>, body: Value) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.router.clone().oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
