// handlers/public/auth/register.rs - GET/POST /auth/register, POST /auth/register/resend

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::forms::messages::{ALREADY_REGISTERED, CONFIRMATION_RESENT};
use crate::forms::{FormPhase, Navigation, RegisterField, RegisterForm, Registration, ResendOutcome};
use crate::middleware::{ApiResponse, Notice};
use crate::session::cookies::{
    append_cookies, clear_pending_email_cookie, pending_email_cookie, read_cookie, PENDING_EMAIL_COOKIE,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum RegisterScreen {
    Form {
        form: FormPhase,
        fields: [&'static str; 3],
        login: String,
    },
    PendingConfirmation {
        email: String,
        message: String,
        resend: String,
        login: String,
    },
    AlreadyRegistered {
        navigation: Navigation,
        notice: Notice,
    },
}

#[derive(Debug, Serialize)]
pub struct ResendView {
    pub resent: bool,
    pub email: Option<String>,
    pub notice: Option<Notice>,
}

fn pending_screen(state: &AppState, email: String) -> RegisterScreen {
    RegisterScreen::PendingConfirmation {
        message: format!(
            "We've sent a confirmation email to {}. You need to verify your email address before you can sign in.",
            email
        ),
        email,
        resend: format!("{}/register/resend", state.config.routes.auth_root),
        login: state.config.routes.login_path.clone(),
    }
}

/// GET /auth/register - the form, or the confirmation screen while a
/// registration from this browser is pending.
pub async fn register_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse<RegisterScreen> {
    if let Some(email) = read_cookie(&headers, PENDING_EMAIL_COOKIE) {
        return ApiResponse::success(pending_screen(&state, email));
    }

    ApiResponse::success(RegisterScreen::Form {
        form: RegisterForm::new().phase().clone(),
        fields: ["email", "password", "confirm_password"],
        login: state.config.routes.login_path.clone(),
    })
}

/**
 * POST /auth/register - Create an account
 *
 * Expected Input:
 * ```json
 * { "email": "new@example.com", "password": "...", "confirm_password": "..." }
 * ```
 *
 * Outcomes:
 * - `stage: "pending_confirmation"` with the submitted email. A
 *   pending-email cookie lets the resend action find it later.
 * - `stage: "already_registered"` with `navigation` to the login form
 *   when the email already owns an account.
 * - 400 with `field_errors` for local validation (password mismatch is
 *   caught here and never reaches the backend), 409/502 otherwise.
 */
pub async fn register_post(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(HeaderMap, ApiResponse<RegisterScreen>), ApiError> {
    let mut form = RegisterForm::new();
    form.edit(RegisterField::Email, request.email);
    form.edit(RegisterField::Password, request.password);
    form.edit(RegisterField::ConfirmPassword, request.confirm_password);

    let redirect_to = state.config.email_redirect_url();
    let registration = form
        .submit(state.backend.as_ref(), &redirect_to, &state.config.routes.login_path)
        .await?;

    let secure = state.config.session.secure_cookies;
    let mut headers = HeaderMap::new();

    let screen = match registration {
        Registration::PendingConfirmation { email } => {
            append_cookies(
                &mut headers,
                pending_email_cookie(&email, state.config.session.pending_email_ttl_secs, secure),
            );
            pending_screen(&state, email)
        }
        Registration::AlreadyRegistered { navigation } => {
            append_cookies(&mut headers, clear_pending_email_cookie(secure));
            RegisterScreen::AlreadyRegistered {
                navigation,
                notice: Notice::info(ALREADY_REGISTERED),
            }
        }
    };

    Ok((headers, ApiResponse::success(screen)))
}

/// POST /auth/register/resend - resend the confirmation email for the
/// pending registration. A failure is reported but the registration stays
/// pending.
pub async fn register_resend(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse<ResendView> {
    let form = match read_cookie(&headers, PENDING_EMAIL_COOKIE) {
        Some(email) => RegisterForm::pending(email),
        None => RegisterForm::new(),
    };

    let redirect_to = state.config.email_redirect_url();
    let email = form.pending_email().map(str::to_string);

    let view = match form.resend(state.backend.as_ref(), &redirect_to).await {
        ResendOutcome::Skipped => ResendView { resent: false, email, notice: None },
        ResendOutcome::Sent => ResendView {
            resent: true,
            email,
            notice: Some(Notice::success(CONFIRMATION_RESENT)),
        },
        ResendOutcome::Failed { message } => ResendView {
            resent: false,
            email,
            notice: Some(Notice::error(message)),
        },
    };

    ApiResponse::success(view)
}
