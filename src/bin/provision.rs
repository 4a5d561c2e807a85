//! Seeds the role catalog and creates a clinic user.
//!
//! Usage: provision <email> <full name> [role] [password]
//! When no password is given a random one is generated and printed once.

use clinic_backend::{
    config::Config,
    domain::models::{role::DEFAULT_ROLES, user::User},
    domain::services::auth_service::hash_password,
    error::AppError,
    infra::factory::bootstrap_state,
};
use rand::{distributions::Alphanumeric, Rng};

#[tokio::main]
async fn main() {
    let _guard = clinic_backend::init_logging();

    if let Err(e) = provision(std::env::args().skip(1).collect()).await {
        eprintln!("provisioning failed: {}", e);
        std::process::exit(1);
    }
}

async fn provision(args: Vec<String>) -> Result<(), AppError> {
    let (email, full_name) = match (args.first(), args.get(1)) {
        (Some(e), Some(n)) => (e.clone(), n.clone()),
        _ => {
            return Err(AppError::Validation(
                "usage: provision <email> <full name> [role] [password]".into(),
            ))
        }
    };
    let role = args.get(2).cloned().unwrap_or_else(|| "ADMIN".to_string());
    if !DEFAULT_ROLES.iter().any(|(name, _)| *name == role) {
        return Err(AppError::Validation(format!("Unknown role '{}'", role)));
    }

    let generated = args.get(3).is_none();
    let password = args.get(3).cloned().unwrap_or_else(|| {
        rand::thread_rng().sample_iter(&Alphanumeric).take(24).map(char::from).collect()
    });

    let config = Config::from_env()?;
    let state = bootstrap_state(&config).await?;

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(format!("User {} already exists", email)));
    }

    let user = User::new(email, hash_password(&password)?, full_name, role);
    let created = state.user_repo.create(&user).await?;

    println!("Created user {} ({}) with role {}", created.email, created.id, created.role);
    if generated {
        println!("Generated password: {}", password);
    }
    Ok(())
}
