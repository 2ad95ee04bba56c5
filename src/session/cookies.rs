use axum::http::{
    header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::backend::{Session, SessionTokens};

pub const ACCESS_COOKIE: &str = "tour-admin-access-token";
pub const REFRESH_COOKIE: &str = "tour-admin-refresh-token";
pub const PENDING_EMAIL_COOKIE: &str = "tour-admin-pending-email";

/// Session cookies outlive the access token so an expired token can
/// still be refreshed on the next request.
const SESSION_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 7;

/// Read one cookie from every `Cookie` header on the request.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else { continue };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else { continue };
            if key.trim() == name && !val.trim().is_empty() {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}

/// Session tokens carried by a request. A bearer header overrides the
/// access-token cookie so scripted clients can skip cookies.
pub fn tokens_from_headers(headers: &HeaderMap) -> SessionTokens {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    SessionTokens {
        access_token: bearer.or_else(|| read_cookie(headers, ACCESS_COOKIE)),
        refresh_token: read_cookie(headers, REFRESH_COOKIE),
    }
}

fn build_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    match HeaderValue::from_str(&cookie) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::error!("Refusing to set cookie {}: {}", name, e);
            None
        }
    }
}

pub fn session_cookies(session: &Session, secure: bool) -> Vec<HeaderValue> {
    [
        build_cookie(ACCESS_COOKIE, &session.access_token, SESSION_COOKIE_MAX_AGE, secure),
        build_cookie(REFRESH_COOKIE, &session.refresh_token, SESSION_COOKIE_MAX_AGE, secure),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn clear_session_cookies(secure: bool) -> Vec<HeaderValue> {
    [
        build_cookie(ACCESS_COOKIE, "", 0, secure),
        build_cookie(REFRESH_COOKIE, "", 0, secure),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn pending_email_cookie(email: &str, ttl_secs: u64, secure: bool) -> Option<HeaderValue> {
    build_cookie(PENDING_EMAIL_COOKIE, email, ttl_secs as i64, secure)
}

pub fn clear_pending_email_cookie(secure: bool) -> Option<HeaderValue> {
    build_cookie(PENDING_EMAIL_COOKIE, "", 0, secure)
}

pub fn append_cookies(headers: &mut HeaderMap, cookies: impl IntoIterator<Item = HeaderValue>) {
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
}
