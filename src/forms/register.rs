use serde_json::json;

use crate::backend::{Backend, SignUpRequest};

use super::messages::{sign_up_error, ALREADY_SUBMITTING, PASSWORDS_DO_NOT_MATCH, RESEND_FAILED};
use super::state::FormPhase;
use super::validate::validate_credentials;
use super::{FormError, Navigation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Email,
    Password,
    ConfirmPassword,
}

/// How a successful sign-up request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A confirmation email went out to `email`. Terminal display state.
    PendingConfirmation { email: String },
    /// The email already belongs to a confirmed account; no identity was created.
    AlreadyRegistered { navigation: Navigation },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    /// No registration is pending; nothing was sent.
    Skipped,
    Sent,
    Failed { message: &'static str },
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    email: String,
    password: String,
    confirm_password: String,
    phase: FormPhase,
    pending_email: Option<String>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume the confirmation screen for an earlier registration.
    pub fn pending(email: impl Into<String>) -> Self {
        Self {
            phase: FormPhase::Succeeded,
            pending_email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn edit(&mut self, field: RegisterField, value: impl Into<String>) {
        match field {
            RegisterField::Email => self.email = value.into(),
            RegisterField::Password => self.password = value.into(),
            RegisterField::ConfirmPassword => self.confirm_password = value.into(),
        }
        self.phase.edited();
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    /// Request account creation. Confirmation links point at `redirect_to`;
    /// an already registered email navigates to `login_path` instead.
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        redirect_to: &str,
        login_path: &str,
    ) -> Result<Registration, FormError> {
        if !self.phase.begin() {
            return Err(FormError::Failed(ALREADY_SUBMITTING));
        }

        if let Err(e) = self.validate() {
            self.phase.fail(e.message());
            return Err(e);
        }

        let email = self.email.trim().to_string();
        tracing::info!("Registration attempt for {}", email);

        let request = SignUpRequest {
            email: email.clone(),
            password: self.password.clone(),
            data: json!({ "role": "admin" }),
            redirect_to: Some(redirect_to.to_string()),
        };

        let outcome = match backend.sign_up(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::info!("Registration for {} failed: {}", email, e);
                let err = sign_up_error(&e);
                self.phase.fail(err.message());
                return Err(err);
            }
        };

        self.phase.succeed();
        self.password.clear();
        self.confirm_password.clear();

        if !outcome.created_new_identity() {
            tracing::info!("Registration for {} matched an existing account", email);
            return Ok(Registration::AlreadyRegistered {
                navigation: Navigation::to(login_path),
            });
        }

        self.pending_email = Some(email.clone());
        Ok(Registration::PendingConfirmation { email })
    }

    /// Send the confirmation email again. Without a pending registration
    /// this does nothing; a failure leaves the pending state as it was.
    pub async fn resend(&self, backend: &dyn Backend, redirect_to: &str) -> ResendOutcome {
        let Some(email) = self.pending_email.as_deref() else {
            return ResendOutcome::Skipped;
        };

        match backend.resend_confirmation(email, redirect_to).await {
            Ok(()) => ResendOutcome::Sent,
            Err(e) => {
                tracing::warn!("Resending confirmation to {} failed: {}", email, e);
                ResendOutcome::Failed { message: RESEND_FAILED }
            }
        }
    }

    // Mismatch first: it must win over every other local error
    fn validate(&self) -> Result<(), FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::Invalid { field: "confirm_password", message: PASSWORDS_DO_NOT_MATCH });
        }
        validate_credentials(&self.email, &self.password)
    }
}
