// handlers/public/auth/mod.rs - Credential flows under the auth root
//
// Login, registration (with confirmation resend) and the optional one-click
// test account. Successful sign-ins set the session cookies here; the guard
// takes over from the next request on.

use axum::http::HeaderMap;

use crate::app::AppState;
use crate::backend::Session;
use crate::session::cookies::{append_cookies, session_cookies};
use crate::session::SessionEvent;

pub mod login;
pub mod register;
#[cfg(feature = "test-accounts")]
pub mod test_account;

pub use login::{login_get, login_post};
pub use register::{register_get, register_post, register_resend};
#[cfg(feature = "test-accounts")]
pub use test_account::test_account_post;

/// Cookies for a fresh session, and announce it.
fn start_session(state: &AppState, session: &Session) -> HeaderMap {
    state.events.publish(SessionEvent::SignedIn {
        user_id: session.user.id,
        email: session.user.email.clone(),
    });

    let mut headers = HeaderMap::new();
    append_cookies(&mut headers, session_cookies(session, state.config.session.secure_cookies));
    headers
}

/*
AUTH FLOW SUMMARY:

1. **Login**: POST /auth/login { email, password }
   - 200 with `navigation` to the dashboard (refresh: true) and session cookies
   - 400/401/502 with the user-facing message otherwise

2. **Register**: POST /auth/register { email, password, confirm_password }
   - pending confirmation screen for a new email, plus a short-lived
     pending-email cookie used by resend
   - `navigation` to login when the email already has an account

3. **Resend**: POST /auth/register/resend
   - uses the pending-email cookie; without one nothing is sent

4. **Test account**: POST /auth/login/test-account (feature `test-accounts`)
*/
