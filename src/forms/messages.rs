// User-facing copy for the auth forms.

use super::FormError;
use crate::backend::BackendError;

pub const INCORRECT_CREDENTIALS: &str = "The email or password you entered is incorrect. Please try again.";
pub const CONFIRM_EMAIL_FIRST: &str = "Please check your email to confirm your account before logging in.";
pub const SIGN_IN_FAILED: &str = "There was a problem signing in. Please try again.";

pub const ALREADY_REGISTERED: &str = "This email is already registered. Please try logging in instead.";
pub const WEAK_PASSWORD: &str = "Password is too weak. Please use a stronger password.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address that you have access to.";
pub const SIGN_UP_FAILED: &str = "There was a problem creating your account. Please try again.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match. Please make sure your passwords match.";

pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const ALREADY_SUBMITTING: &str = "Your request is already being processed.";

pub const CONFIRMATION_RESENT: &str = "Confirmation email resent. Please check your inbox and spam folder.";
pub const RESEND_FAILED: &str = "Error resending email. Please try again later.";

pub const TEST_ACCOUNT_SIGN_UP_FAILED: &str = "Could not create test account. Please try again.";
pub const TEST_ACCOUNT_SIGN_IN_FAILED: &str = "Test account created but could not log in automatically.";

pub fn sign_in_error(err: &BackendError) -> FormError {
    match err {
        BackendError::InvalidCredentials => FormError::Rejected(INCORRECT_CREDENTIALS),
        BackendError::EmailNotConfirmed => FormError::Rejected(CONFIRM_EMAIL_FIRST),
        BackendError::AlreadyRegistered
        | BackendError::WeakPassword(_)
        | BackendError::InvalidEmail(_)
        | BackendError::Unauthorized
        | BackendError::NotFound
        | BackendError::Rejected { .. }
        | BackendError::Unreachable(_)
        | BackendError::Decode(_) => FormError::Failed(SIGN_IN_FAILED),
    }
}

pub fn sign_up_error(err: &BackendError) -> FormError {
    match err {
        BackendError::AlreadyRegistered => FormError::Conflict(ALREADY_REGISTERED),
        BackendError::WeakPassword(_) => FormError::Invalid { field: "password", message: WEAK_PASSWORD },
        BackendError::InvalidEmail(_) => FormError::Invalid { field: "email", message: INVALID_EMAIL },
        BackendError::InvalidCredentials
        | BackendError::EmailNotConfirmed
        | BackendError::Unauthorized
        | BackendError::NotFound
        | BackendError::Rejected { .. }
        | BackendError::Unreachable(_)
        | BackendError::Decode(_) => FormError::Failed(SIGN_UP_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_failures_map_to_fixed_copy() {
        assert_eq!(sign_in_error(&BackendError::InvalidCredentials).message(), INCORRECT_CREDENTIALS);
        assert_eq!(sign_in_error(&BackendError::EmailNotConfirmed).message(), CONFIRM_EMAIL_FIRST);
        assert_eq!(
            sign_in_error(&BackendError::Unreachable("timeout".into())).message(),
            SIGN_IN_FAILED
        );
    }

    #[test]
    fn sign_up_failures_point_at_the_offending_field() {
        assert_eq!(
            sign_up_error(&BackendError::WeakPassword("too short".into())),
            FormError::Invalid { field: "password", message: WEAK_PASSWORD }
        );
        assert_eq!(
            sign_up_error(&BackendError::InvalidEmail("bad".into())),
            FormError::Invalid { field: "email", message: INVALID_EMAIL }
        );
        assert_eq!(sign_up_error(&BackendError::AlreadyRegistered).message(), ALREADY_REGISTERED);
        assert_eq!(
            sign_up_error(&BackendError::Rejected { status: 500, message: "boom".into() }).message(),
            SIGN_UP_FAILED
        );
    }
}
