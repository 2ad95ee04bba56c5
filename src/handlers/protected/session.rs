// handlers/protected/session.rs - POST /dashboard/sign-out

use axum::{extract::State, http::HeaderMap};
use serde::Serialize;

use crate::app::AppState;
use crate::forms::Navigation;
use crate::middleware::ApiResponse;
use crate::session::cookies::{append_cookies, clear_session_cookies};
use crate::session::{CurrentSession, SessionEvent};

#[derive(Debug, Serialize)]
pub struct SignedOutView {
    pub navigation: Navigation,
}

/// End the session with the auth service and drop the cookies. The local
/// sign-out happens even when the remote call fails.
pub async fn sign_out_post(
    State(state): State<AppState>,
    session: CurrentSession,
) -> (HeaderMap, ApiResponse<SignedOutView>) {
    if let Err(e) = state.backend.sign_out(session.access_token()).await {
        tracing::warn!("Remote sign-out for {} failed: {}", session.0.user.id, e);
    }

    state.events.publish(SessionEvent::SignedOut { user_id: Some(session.0.user.id) });

    let mut headers = HeaderMap::new();
    append_cookies(&mut headers, clear_session_cookies(state.config.session.secure_cookies));

    (
        headers,
        ApiResponse::success(SignedOutView {
            navigation: Navigation::with_refresh(state.config.routes.login_path.clone()),
        }),
    )
}
