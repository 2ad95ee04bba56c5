//! Login and registration flows.
//!
//! Each form validates locally, calls the backend at most once per
//! submission, and reports either an explicit navigation or a
//! [`FormError`] carrying the copy shown to the user.

use serde::Serialize;

use crate::error::ApiError;

pub mod login;
pub mod messages;
pub mod register;
pub mod state;
#[cfg(feature = "test-accounts")]
pub mod test_account;
pub mod validate;

pub use login::{LoginField, LoginForm, SignedIn};
pub use register::{RegisterField, RegisterForm, Registration, ResendOutcome};
pub use state::FormPhase;
#[cfg(feature = "test-accounts")]
pub use test_account::{TestAccountSignIn, TestCredentials};

/// Where the client should go next. `refresh` asks it to drop cached
/// state so the session guard sees the new session on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub to: String,
    pub refresh: bool,
}

impl Navigation {
    pub fn to(target: impl Into<String>) -> Self {
        Self { to: target.into(), refresh: false }
    }

    pub fn with_refresh(target: impl Into<String>) -> Self {
        Self { to: target.into(), refresh: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Caught before the backend was called, or pinned to one field.
    Invalid { field: &'static str, message: &'static str },
    /// Credentials or account refused.
    Rejected(&'static str),
    Conflict(&'static str),
    Failed(&'static str),
}

impl FormError {
    pub fn message(&self) -> &'static str {
        match self {
            FormError::Invalid { message, .. } => message,
            FormError::Rejected(message) | FormError::Conflict(message) | FormError::Failed(message) => message,
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Invalid { field, message } => ApiError::field_error(field, message),
            FormError::Rejected(message) => ApiError::unauthorized(message),
            FormError::Conflict(message) => ApiError::conflict(message),
            FormError::Failed(message) => ApiError::bad_gateway(message),
        }
    }
}
