//! Data access client for the hosted auth + storage service.
//!
//! [`Backend`] is the seam everything else talks through. [`HttpBackend`]
//! is the production implementation; tests substitute their own.

use async_trait::async_trait;
use serde_json::Value;

pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use error::{BackendError, BackendResult};
pub use http::HttpBackend;
pub use query::{Key, Order, Query, SortDirection};
pub use types::{Identity, Session, SessionState, SessionTokens, SignUpOutcome, SignUpRequest, User};

/// Operations consumed from the hosted backend. Implementations hold no
/// per-user state; tokens are passed on every call.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session>;

    /// Create an account. Confirmation links point at `request.redirect_to`.
    async fn sign_up(&self, request: &SignUpRequest) -> BackendResult<SignUpOutcome>;

    async fn resend_confirmation(&self, email: &str, redirect_to: &str) -> BackendResult<()>;

    async fn sign_out(&self, access_token: &str) -> BackendResult<()>;

    /// Resolve the tokens a request carries into a session, refreshing
    /// them first when they are expired or about to expire.
    async fn get_session(&self, tokens: &SessionTokens) -> BackendResult<Option<SessionState>>;

    /// Ask the auth service who owns `access_token`.
    async fn get_current_user(&self, access_token: &str) -> BackendResult<Option<User>>;

    async fn query(&self, access_token: Option<&str>, query: &Query) -> BackendResult<Vec<Value>>;

    async fn insert(&self, access_token: Option<&str>, table: &str, record: &Value) -> BackendResult<Value>;

    async fn update(&self, access_token: Option<&str>, table: &str, key: &Key, patch: &Value) -> BackendResult<()>;

    async fn delete(&self, access_token: Option<&str>, table: &str, key: &Key) -> BackendResult<()>;
}
