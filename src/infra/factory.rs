use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_user_repo::PostgresUserRepo, postgres_role_repo::PostgresRoleRepo,
    postgres_company_repo::PostgresCompanyRepo, postgres_patient_repo::PostgresPatientRepo,
    postgres_session_repo::PostgresSessionRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_role_repo::SqliteRoleRepo,
    sqlite_company_repo::SqliteCompanyRepo, sqlite_patient_repo::SqlitePatientRepo,
    sqlite_session_repo::SqliteSessionRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url
            .parse::<PgConnectOptions>()
            .map_err(|e| AppError::Config(format!("Invalid Postgres URL: {}", e)))?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        postgres_state(config.clone(), pool)?
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Config(format!("Invalid SQLite connection string: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        sqlite_state(config.clone(), pool)?
    };

    state.role_repo.seed_defaults().await?;
    info!("Role catalog seeded");

    Ok(state)
}

pub fn sqlite_state(config: Config, pool: SqlitePool) -> Result<AppState, AppError> {
    AppState::assemble(
        config,
        Arc::new(SqliteUserRepo::new(pool.clone())),
        Arc::new(SqliteRoleRepo::new(pool.clone())),
        Arc::new(SqliteCompanyRepo::new(pool.clone())),
        Arc::new(SqlitePatientRepo::new(pool.clone())),
        Arc::new(SqliteSessionRepo::new(pool)),
    )
}

pub fn postgres_state(config: Config, pool: PgPool) -> Result<AppState, AppError> {
    AppState::assemble(
        config,
        Arc::new(PostgresUserRepo::new(pool.clone())),
        Arc::new(PostgresRoleRepo::new(pool.clone())),
        Arc::new(PostgresCompanyRepo::new(pool.clone())),
        Arc::new(PostgresPatientRepo::new(pool.clone())),
        Arc::new(PostgresSessionRepo::new(pool)),
    )
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run Postgres migrations: {}", e)))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run SQLite migrations: {}", e)))
}
