//! Browser-side authentication session, modelled as an explicit state machine.
//!
//! Transitions are pure: each consumes the current state and returns the next one.
//! Persistence is an explicit `persist`/`restore` pair over a JSON string; what the
//! caller does with that string (local storage, a file) is outside this module.

use serde::{Deserialize, Serialize};
use crate::domain::models::auth::UserProfile;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated { user: UserProfile, token: String },
    Failed { error: String },
}

/// Flattened view consumed by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    user: UserProfile,
    token: String,
}

impl SessionState {
    pub fn begin_login(self) -> Self {
        SessionState::Authenticating
    }

    /// Only an in-flight login can succeed; stray completions leave the state untouched.
    pub fn login_succeeded(self, user: UserProfile, token: String) -> Self {
        match self {
            SessionState::Authenticating => SessionState::Authenticated { user, token },
            other => other,
        }
    }

    pub fn login_failed(self, error: impl Into<String>) -> Self {
        match self {
            SessionState::Authenticating => SessionState::Failed { error: error.into() },
            other => other,
        }
    }

    pub fn logout(self) -> Self {
        SessionState::Anonymous
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token.as_str()),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        match self {
            SessionState::Anonymous => AuthSnapshot {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: false,
                error: None,
            },
            SessionState::Authenticating => AuthSnapshot {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: true,
                error: None,
            },
            SessionState::Authenticated { user, token } => AuthSnapshot {
                user: Some(user.clone()),
                token: Some(token.clone()),
                is_authenticated: true,
                is_loading: false,
                error: None,
            },
            SessionState::Failed { error } => AuthSnapshot {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: false,
                error: Some(error.clone()),
            },
        }
    }

    /// Serializes the authenticated session; every other state persists as nothing.
    pub fn persist(&self) -> Option<String> {
        match self {
            SessionState::Authenticated { user, token } => serde_json::to_string(&PersistedSession {
                user: user.clone(),
                token: token.clone(),
            })
            .ok(),
            _ => None,
        }
    }

    /// Rebuilds the session on startup. Absent or corrupt storage yields `Anonymous`.
    pub fn restore(stored: Option<&str>) -> Self {
        stored
            .and_then(|raw| serde_json::from_str::<PersistedSession>(raw).ok())
            .filter(|p| !p.token.is_empty())
            .map(|p| SessionState::Authenticated { user: p.user, token: p.token })
            .unwrap_or_default()
    }
}
