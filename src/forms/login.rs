use crate::backend::{Backend, Session};

use super::messages::{sign_in_error, ALREADY_SUBMITTING};
use super::state::FormPhase;
use super::validate::validate_credentials;
use super::{FormError, Navigation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// A successful credential exchange and where to go afterwards.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub navigation: Navigation,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    pub(super) phase: FormPhase,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(&mut self, field: LoginField, value: impl Into<String>) {
        match field {
            LoginField::Email => self.email = value.into(),
            LoginField::Password => self.password = value.into(),
        }
        self.phase.edited();
    }

    pub fn email(&self) -> &str {
        self.email.trim()
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    /// Exchange the entered credentials for a session. On success the
    /// caller navigates to `dashboard_path` with a forced refresh.
    pub async fn submit(&mut self, backend: &dyn Backend, dashboard_path: &str) -> Result<SignedIn, FormError> {
        if !self.phase.begin() {
            return Err(FormError::Failed(ALREADY_SUBMITTING));
        }

        if let Err(e) = validate_credentials(&self.email, &self.password) {
            self.phase.fail(e.message());
            return Err(e);
        }

        let email = self.email.trim().to_string();
        tracing::info!("Sign-in attempt for {}", email);

        match backend.sign_in(&email, &self.password).await {
            Ok(session) => {
                self.phase.succeed();
                Ok(SignedIn {
                    session,
                    navigation: Navigation::with_refresh(dashboard_path),
                })
            }
            Err(e) => {
                tracing::info!("Sign-in for {} failed: {}", email, e);
                let err = sign_in_error(&e);
                self.phase.fail(err.message());
                Err(err)
            }
        }
    }
}
