use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::config::AppConfig;
use crate::session::SessionEvents;
use crate::backend::{
    Backend, BackendError, BackendResult, Key, Query, Session, SessionState, SessionTokens, SignUpOutcome,
    SignUpRequest, User,
};

/// In-memory backend with scripted answers. Every call is recorded as
/// `operation:subject` so tests can assert on what was (not) sent.
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    sign_in: BackendResult<Session>,
    sign_up: BackendResult<SignUpOutcome>,
    resend: BackendResult<()>,
    session: BackendResult<Option<SessionState>>,
    user: BackendResult<Option<User>>,
    rows: HashMap<String, BackendResult<Vec<Value>>>,
    write: BackendResult<()>,
    sign_up_requests: Mutex<Vec<SignUpRequest>>,
    writes: Mutex<Vec<(String, Value)>>,
    queries: Mutex<Vec<Query>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sign_in: Err(BackendError::InvalidCredentials),
            sign_up: Err(BackendError::Rejected { status: 500, message: "unscripted".into() }),
            resend: Ok(()),
            session: Ok(None),
            user: Ok(None),
            rows: HashMap::new(),
            write: Ok(()),
            sign_up_requests: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sign_in(mut self, result: BackendResult<Session>) -> Self {
        self.sign_in = result;
        self
    }

    pub fn with_sign_up(mut self, result: BackendResult<SignUpOutcome>) -> Self {
        self.sign_up = result;
        self
    }

    pub fn with_resend(mut self, result: BackendResult<()>) -> Self {
        self.resend = result;
        self
    }

    pub fn with_session(mut self, result: BackendResult<Option<SessionState>>) -> Self {
        self.session = result;
        self
    }

    pub fn with_user(mut self, result: BackendResult<Option<User>>) -> Self {
        self.user = result;
        self
    }

    pub fn with_rows(mut self, table: &str, result: BackendResult<Vec<Value>>) -> Self {
        self.rows.insert(table.to_string(), result);
        self
    }

    /// Outcome of every insert, update and delete.
    pub fn with_write(mut self, result: BackendResult<()>) -> Self {
        self.write = result;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_sign_up(&self) -> Option<SignUpRequest> {
        self.sign_up_requests.lock().unwrap().last().cloned()
    }

    /// Bodies sent by insert and update, tagged with the call.
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<Query> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn sign_in(&self, email: &str, _password: &str) -> BackendResult<Session> {
        self.record(format!("sign_in:{}", email));
        self.sign_in.clone()
    }

    async fn sign_up(&self, request: &SignUpRequest) -> BackendResult<SignUpOutcome> {
        self.record(format!("sign_up:{}", request.email));
        self.sign_up_requests.lock().unwrap().push(request.clone());
        self.sign_up.clone()
    }

    async fn resend_confirmation(&self, email: &str, _redirect_to: &str) -> BackendResult<()> {
        self.record(format!("resend:{}", email));
        self.resend.clone()
    }

    async fn sign_out(&self, _access_token: &str) -> BackendResult<()> {
        self.record("sign_out".to_string());
        Ok(())
    }

    async fn get_session(&self, _tokens: &SessionTokens) -> BackendResult<Option<SessionState>> {
        self.record("get_session".to_string());
        self.session.clone()
    }

    async fn get_current_user(&self, _access_token: &str) -> BackendResult<Option<User>> {
        self.record("get_current_user".to_string());
        self.user.clone()
    }

    async fn query(&self, _access_token: Option<&str>, query: &Query) -> BackendResult<Vec<Value>> {
        self.record(format!("query:{}", query.table));
        self.queries.lock().unwrap().push(query.clone());
        self.rows.get(&query.table).cloned().unwrap_or_else(|| Ok(vec![]))
    }

    async fn insert(&self, _access_token: Option<&str>, table: &str, record: &Value) -> BackendResult<Value> {
        let call = format!("insert:{}", table);
        self.record(call.clone());
        self.writes.lock().unwrap().push((call, record.clone()));
        self.write.clone()?;

        // tours -> tour_id
        let mut row = record.clone();
        if let Value::Object(map) = &mut row {
            let id_column = format!("{}_id", table.trim_end_matches('s'));
            map.entry(id_column).or_insert_with(|| json!(Uuid::new_v4()));
        }
        Ok(row)
    }

    async fn update(&self, _access_token: Option<&str>, table: &str, key: &Key, patch: &Value) -> BackendResult<()> {
        let call = format!("update:{}:{}", table, key.value);
        self.record(call.clone());
        self.writes.lock().unwrap().push((call, patch.clone()));
        self.write.clone()
    }

    async fn delete(&self, _access_token: Option<&str>, table: &str, key: &Key) -> BackendResult<()> {
        self.record(format!("delete:{}:{}", table, key.value));
        self.write.clone()
    }
}

/// Development defaults against an address nothing listens on.
pub fn test_config() -> AppConfig {
    AppConfig::from_source(|key| match key {
        "SUPABASE_URL" => Some("http://127.0.0.1:9".to_string()),
        "SUPABASE_ANON_KEY" => Some("anon".to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Application state around `backend`, which stays reachable for assertions.
pub fn app_state(backend: FakeBackend) -> (AppState, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let state = AppState::new(test_config(), backend.clone(), SessionEvents::default());
    (state, backend)
}

pub fn user_for(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
        identities: None,
    }
}

/// A session valid for the next hour.
pub fn session_for(email: &str) -> Session {
    Session {
        access_token: format!("access-{}", email),
        refresh_token: format!("refresh-{}", email),
        expires_at: Utc::now().timestamp() + 3600,
        user: user_for(email),
    }
}
