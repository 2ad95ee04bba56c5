use serde_json::Value;
use thiserror::Error;

/// Closed set of failures the hosted backend can report.
///
/// The HTTP adapter is the only place that inspects raw error payloads;
/// everything above it matches on these variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("email not confirmed")]
    EmailNotConfirmed,

    #[error("user already registered")]
    AlreadyRegistered,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    #[error("email address rejected: {0}")]
    InvalidEmail(String),

    #[error("session missing, expired or revoked")]
    Unauthorized,

    #[error("record not found")]
    NotFound,

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("unexpected backend response: {0}")]
    Decode(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Unreachable(err.to_string())
        }
    }
}

/// Pull the most specific message out of an auth error body. The auth
/// service has answered with `msg`, `message` and `error_description`
/// across versions.
pub(crate) fn auth_error_message(body: &Value) -> String {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or("unknown error")
        .to_string()
}

/// Map an auth endpoint failure onto [`BackendError`].
///
/// The structured `error_code` wins when present; older deployments only
/// send a message, so the well-known message fragments are the fallback.
pub(crate) fn classify_auth_error(status: u16, body: &Value) -> BackendError {
    let message = auth_error_message(body);

    if let Some(code) = body.get("error_code").and_then(Value::as_str) {
        match code {
            "invalid_credentials" => return BackendError::InvalidCredentials,
            "email_not_confirmed" => return BackendError::EmailNotConfirmed,
            "user_already_exists" | "email_exists" => return BackendError::AlreadyRegistered,
            "weak_password" => return BackendError::WeakPassword(message),
            "email_address_invalid" | "email_address_not_authorized" => {
                return BackendError::InvalidEmail(message)
            }
            "session_not_found" | "session_expired" | "refresh_token_not_found"
            | "refresh_token_already_used" | "bad_jwt" | "no_authorization" => {
                return BackendError::Unauthorized
            }
            _ => {}
        }
    }

    let lowered = message.to_lowercase();
    if lowered == "invalid login credentials" {
        BackendError::InvalidCredentials
    } else if lowered.contains("email not confirmed") {
        BackendError::EmailNotConfirmed
    } else if lowered.contains("already registered") {
        BackendError::AlreadyRegistered
    } else if lowered.contains("password") {
        BackendError::WeakPassword(message)
    } else if lowered.contains("invalid") && lowered.contains("email") {
        BackendError::InvalidEmail(message)
    } else if status == 401 || status == 403 {
        BackendError::Unauthorized
    } else {
        BackendError::Rejected { status, message }
    }
}

/// Map a data endpoint failure onto [`BackendError`].
pub(crate) fn classify_data_error(status: u16, body: &Value) -> BackendError {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();

    match status {
        401 | 403 => BackendError::Unauthorized,
        404 => BackendError::NotFound,
        // Single-row fetch that matched nothing
        406 if body.get("code").and_then(Value::as_str) == Some("PGRST116") => BackendError::NotFound,
        _ => BackendError::Rejected { status, message },
    }
}
