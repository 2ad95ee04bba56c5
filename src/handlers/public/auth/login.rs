// handlers/public/auth/login.rs - GET/POST /auth/login

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::forms::{FormPhase, LoginField, LoginForm, Navigation};
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginScreen {
    #[serde(flatten)]
    pub phase: FormPhase,
    pub fields: [&'static str; 2],
    pub register: String,
    /// Present when the one-click test account is available.
    pub test_account: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignedInView {
    pub email: Option<String>,
    pub navigation: Navigation,
}

/// GET /auth/login - empty login form
pub async fn login_get(State(state): State<AppState>) -> ApiResponse<LoginScreen> {
    let auth_root = &state.config.routes.auth_root;

    ApiResponse::success(LoginScreen {
        phase: LoginForm::new().phase().clone(),
        fields: ["email", "password"],
        register: format!("{}/register", auth_root),
        test_account: test_account_path(&state),
    })
}

/**
 * POST /auth/login - Exchange credentials for a session
 *
 * Expected Input:
 * ```json
 * { "email": "guide@example.com", "password": "..." }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "success": true,
 *   "data": {
 *     "email": "guide@example.com",
 *     "navigation": { "to": "/dashboard", "refresh": true }
 *   }
 * }
 * ```
 * plus `Set-Cookie` for the access and refresh tokens.
 *
 * Rejected credentials answer 401 with the message to show on the form.
 */
pub async fn login_post(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, ApiResponse<SignedInView>), ApiError> {
    let mut form = LoginForm::new();
    form.edit(LoginField::Email, request.email);
    form.edit(LoginField::Password, request.password);

    let signed_in = form
        .submit(state.backend.as_ref(), &state.config.routes.dashboard_path)
        .await?;

    let headers = super::start_session(&state, &signed_in.session);

    Ok((
        headers,
        ApiResponse::success(SignedInView {
            email: signed_in.session.user.email.clone(),
            navigation: signed_in.navigation,
        }),
    ))
}

#[cfg(feature = "test-accounts")]
fn test_account_path(state: &AppState) -> Option<String> {
    state
        .config
        .site
        .enable_test_accounts
        .then(|| format!("{}/test-account", state.config.routes.login_path))
}

#[cfg(not(feature = "test-accounts"))]
fn test_account_path(_state: &AppState) -> Option<String> {
    None
}
