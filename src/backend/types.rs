use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Authenticated actor as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub identities: Option<Vec<Identity>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Server-issued proof of authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
    pub user: User,
}

/// Raw tokens carried by a request. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Result of a session lookup that may have refreshed the tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Current(Session),
    Refreshed(Session),
}

impl SessionState {
    pub fn session(&self) -> &Session {
        match self {
            SessionState::Current(s) | SessionState::Refreshed(s) => s,
        }
    }

    pub fn into_session(self) -> Session {
        match self {
            SessionState::Current(s) | SessionState::Refreshed(s) => s,
        }
    }

    pub fn was_refreshed(&self) -> bool {
        matches!(self, SessionState::Refreshed(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Stored as user metadata on the new account
    pub data: Value,
    #[serde(skip)]
    pub redirect_to: Option<String>,
}

/// What account creation produced. An empty `identities` list means the
/// email already belongs to a confirmed account.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user: Option<User>,
    pub identities: Vec<Identity>,
    pub session: Option<Session>,
}

impl SignUpOutcome {
    pub fn created_new_identity(&self) -> bool {
        !self.identities.is_empty()
    }
}
