use std::sync::Arc;
use crate::domain::{
    models::auth::{Claims, LoginResult, UserProfile, TOKEN_AUDIENCE, TOKEN_TTL_HOURS},
    ports::UserRepository,
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    issuer: String,
    verify_passwords: bool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid JWT public key PEM: {}", e)))?;

        if !config.verify_passwords {
            warn!("Password verification is DISABLED: any password is accepted for active users");
        }

        Ok(Self {
            users,
            issuer: config.auth_issuer.clone(),
            verify_passwords: config.verify_passwords,
            encoding_key,
            decoding_key,
        })
    }

    #[instrument(name = "AuthService: login", skip(self, password), fields(user_email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation("Email and password are required".into()));
        }

        let user = match self.users.find_by_email(email).await? {
            Some(u) if u.is_active => u,
            Some(_) => {
                warn!("Login rejected: account inactive");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                warn!("Login rejected: unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if self.verify_passwords {
            let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
                tracing::error!("Failed to parse stored password hash: {:?}", e);
                AppError::Internal
            })?;

            if Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_err() {
                warn!("Login rejected: password mismatch");
                return Err(AppError::InvalidCredentials);
            }
        }

        let token = self.issue_token(&user.id, &user.email, &user.role, Utc::now())?;
        info!("User logged in: {}", user.id);

        Ok(LoginResult {
            user: UserProfile::from(&user),
            token,
        })
    }

    pub fn issue_token(&self, user_id: &str, email: &str, role: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    /// Returns the claims of a valid, unexpired token and `None` for anything else.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_verifiable_phc_string() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"correct horse", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"battery staple", &parsed).is_err());
    }
}
