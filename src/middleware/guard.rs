use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::app::AppState;
use crate::guard::GuardDecision;
use crate::session::cookies::{append_cookies, clear_session_cookies, session_cookies, tokens_from_headers};
use crate::session::{SessionContext, SessionEvent};

/// Session guard applied to every route.
///
/// For paths inside the matcher scope the request's tokens are resolved
/// through the backend (which refreshes them when close to expiry) before
/// the redirect decision is made. A failed check counts as signed out.
/// Requests that continue carry a [`SessionContext`] extension.
pub async fn session_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !state.scope.intercepts(&path) {
        return next.run(request).await;
    }
    let class = state.scope.classify(&path);

    let secure = state.config.session.secure_cookies;
    let tokens = tokens_from_headers(request.headers());
    let mut cookies = Vec::new();

    let session = if tokens.is_empty() {
        None
    } else {
        match state.backend.get_session(&tokens).await {
            Ok(Some(resolved)) => {
                if resolved.was_refreshed() {
                    let session = resolved.session();
                    state.events.publish(SessionEvent::Refreshed { user_id: session.user.id });
                    cookies.extend(session_cookies(session, secure));
                }
                Some(resolved.into_session())
            }
            Ok(None) => {
                state.events.publish(SessionEvent::Expired);
                cookies.extend(clear_session_cookies(secure));
                None
            }
            Err(e) => {
                // Cookies are left alone so the next request can retry
                tracing::warn!("Session check failed for {}, treating as signed out: {}", path, e);
                None
            }
        }
    };

    let decision = state.scope.decide(class, session.is_some());
    tracing::debug!(path = %path, class = ?class, signed_in = session.is_some(), decision = ?decision, "session guard");

    let mut response = match decision {
        GuardDecision::NavigateTo(target) => Redirect::to(&target).into_response(),
        GuardDecision::Continue => {
            request.extensions_mut().insert(SessionContext { session });
            next.run(request).await
        }
    };

    // Handlers that set their own session cookies (login, sign-out) win
    if !response.headers().contains_key(SET_COOKIE) {
        append_cookies(response.headers_mut(), cookies);
    }

    response
}
