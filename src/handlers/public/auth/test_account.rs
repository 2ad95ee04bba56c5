// handlers/public/auth/test_account.rs - POST /auth/login/test-account

use axum::{extract::State, http::HeaderMap};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::forms::{LoginForm, Navigation, TestCredentials};
use crate::middleware::{ApiResponse, Notice};

#[derive(Debug, Serialize)]
pub struct TestAccountView {
    pub credentials: TestCredentials,
    pub navigation: Navigation,
    pub notice: Notice,
}

/// Create a throwaway admin account, sign in as it, and hand back the
/// generated credentials. 404 unless enabled in configuration.
pub async fn test_account_post(
    State(state): State<AppState>,
) -> Result<(HeaderMap, ApiResponse<TestAccountView>), ApiError> {
    if !state.config.site.enable_test_accounts {
        return Err(ApiError::not_found("Test accounts are disabled"));
    }

    let credentials = TestCredentials::generate(&mut rand::thread_rng());

    let signed_in = LoginForm::new()
        .submit_test_account(state.backend.as_ref(), credentials, &state.config.routes.dashboard_path)
        .await?;

    let headers = super::start_session(&state, &signed_in.session);
    let notice = Notice::success(format!(
        "Test account created and logged in. Email: {}, Password: {}",
        signed_in.credentials.email, signed_in.credentials.password
    ));

    Ok((
        headers,
        ApiResponse::success(TestAccountView {
            credentials: signed_in.credentials,
            navigation: signed_in.navigation,
            notice,
        }),
    ))
}
