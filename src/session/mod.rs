pub mod cookies;
pub mod events;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::backend::Session;
use crate::error::ApiError;

pub use events::{SessionEvent, SessionEvents};

/// Session state for one request, attached by the session guard.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub session: Option<Session>,
}

/// The signed-in session of a protected request.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl CurrentSession {
    pub fn access_token(&self) -> &str {
        &self.0.access_token
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .and_then(|ctx| ctx.session.clone())
            .map(CurrentSession)
            .ok_or_else(|| ApiError::unauthorized("Sign in to continue"))
    }
}
