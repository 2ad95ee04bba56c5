//! One-click throwaway admin account for demos. Compiled only with the
//! `test-accounts` feature and served only when enabled in config.

use rand::Rng;
use serde::Serialize;
use serde_json::json;

use crate::backend::{Backend, Session, SignUpRequest};

use super::login::LoginForm;
use super::messages::{ALREADY_SUBMITTING, TEST_ACCOUNT_SIGN_IN_FAILED, TEST_ACCOUNT_SIGN_UP_FAILED};
use super::{FormError, Navigation};

pub const TEST_ACCOUNT_PASSWORD: &str = "Password123!";

/// Generated credentials, shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCredentials {
    pub email: String,
    pub password: String,
}

impl TestCredentials {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            email: format!("test{}@example.com", rng.gen_range(0..10_000)),
            password: TEST_ACCOUNT_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestAccountSignIn {
    pub credentials: TestCredentials,
    pub session: Session,
    pub navigation: Navigation,
}

impl LoginForm {
    /// Register `credentials` and sign straight in with them.
    pub async fn submit_test_account(
        &mut self,
        backend: &dyn Backend,
        credentials: TestCredentials,
        dashboard_path: &str,
    ) -> Result<TestAccountSignIn, FormError> {
        if !self.phase.begin() {
            return Err(FormError::Failed(ALREADY_SUBMITTING));
        }

        tracing::info!("Creating test account {}", credentials.email);

        let request = SignUpRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            data: json!({ "role": "admin" }),
            redirect_to: None,
        };

        if let Err(e) = backend.sign_up(&request).await {
            tracing::warn!("Test account sign-up failed: {}", e);
            self.phase.fail(TEST_ACCOUNT_SIGN_UP_FAILED);
            return Err(FormError::Failed(TEST_ACCOUNT_SIGN_UP_FAILED));
        }

        match backend.sign_in(&credentials.email, &credentials.password).await {
            Ok(session) => {
                self.phase.succeed();
                Ok(TestAccountSignIn {
                    credentials,
                    session,
                    navigation: Navigation::with_refresh(dashboard_path),
                })
            }
            Err(e) => {
                tracing::warn!("Test account {} created but sign-in failed: {}", credentials.email, e);
                self.phase.fail(TEST_ACCOUNT_SIGN_IN_FAILED);
                Err(FormError::Failed(TEST_ACCOUNT_SIGN_IN_FAILED))
            }
        }
    }
}
