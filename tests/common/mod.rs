#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::redirect::Policy;
use serde_json::{json, Value};
use uuid::Uuid;

use tour_admin::backend::HttpBackend;
use tour_admin::config::AppConfig;
use tour_admin::session::SessionEvents;
use tour_admin::{router, AppState};

/// Signs the fake service's access tokens. The app runs without a JWT
/// secret, so it has `/auth/v1/user` check them instead.
const SIGNING_KEY: &str = "hosted-test-secret";

struct Account {
    id: Uuid,
    password: String,
    confirmed: bool,
}

/// In-process stand-in for the hosted auth and data service. Every request
/// is recorded as `operation:subject`.
#[derive(Default)]
pub struct Hosted {
    accounts: Mutex<HashMap<String, Account>>,
    refresh_tokens: Mutex<HashMap<String, String>>,
    tables: Mutex<HashMap<String, Vec<Value>>>,
    broken_tables: Mutex<Vec<String>>,
    signups: Mutex<Vec<Value>>,
    requests: Mutex<Vec<String>>,
}

impl Hosted {
    pub fn add_account(&self, email: &str, password: &str, confirmed: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account { id, password: password.to_string(), confirmed },
        );
        id
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables.lock().unwrap().insert(table.to_string(), rows);
    }

    /// Reads of `table` answer 500 from now on.
    pub fn break_table(&self, table: &str) {
        self.broken_tables.lock().unwrap().push(table.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn received(&self, prefix: &str) -> bool {
        self.requests().iter().any(|r| r.starts_with(prefix))
    }

    pub fn signups(&self) -> Vec<Value> {
        self.signups.lock().unwrap().clone()
    }

    /// Access token for `email` expiring `expires_in` seconds from now
    /// (negative for one that already expired).
    pub fn access_token(&self, email: &str, expires_in: i64) -> String {
        let id = self
            .accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.id)
            .unwrap_or_else(Uuid::new_v4);
        sign(id, email, Utc::now().timestamp() + expires_in)
    }

    /// Like `access_token`, but signed with a key the service never issued.
    pub fn forged_access_token(&self, email: &str, expires_in: i64) -> String {
        let id = self.accounts.lock().unwrap().get(email).map(|a| a.id).unwrap_or_else(Uuid::new_v4);
        sign_with(id, email, Utc::now().timestamp() + expires_in, "not-the-service-key")
    }

    pub fn refresh_token(&self, email: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.refresh_tokens.lock().unwrap().insert(token.clone(), email.to_string());
        token
    }

    fn log(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }

    fn issue(&self, email: &str, id: Uuid) -> Value {
        json!({
            "access_token": sign(id, email, Utc::now().timestamp() + 3600),
            "refresh_token": self.refresh_token(email),
            "token_type": "bearer",
            "expires_in": 3600,
            "user": { "id": id, "email": email, "identities": [{ "id": id.to_string(), "provider": "email" }] }
        })
    }
}

fn sign(id: Uuid, email: &str, exp: i64) -> String {
    sign_with(id, email, exp, SIGNING_KEY)
}

fn sign_with(id: Uuid, email: &str, exp: i64, key: &str) -> String {
    let claims = json!({
        "sub": id,
        "email": email,
        "role": "authenticated",
        "aud": "authenticated",
        "exp": exp,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(key.as_bytes())).unwrap()
}

fn auth_error(code: &str, msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error_code": code, "msg": msg }))).into_response()
}

async fn token(
    State(hosted): State<Arc<Hosted>>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let grant = params.get("grant_type").cloned().unwrap_or_default();

    match grant.as_str() {
        "password" => {
            let email = body["email"].as_str().unwrap_or_default().to_string();
            let password = body["password"].as_str().unwrap_or_default();
            hosted.log(format!("token:{}", email));

            let found = hosted
                .accounts
                .lock()
                .unwrap()
                .get(&email)
                .map(|a| (a.id, a.password == password, a.confirmed));

            match found {
                Some((id, true, true)) => Json(hosted.issue(&email, id)).into_response(),
                Some((_, true, false)) => auth_error("email_not_confirmed", "Email not confirmed"),
                _ => auth_error("invalid_credentials", "Invalid login credentials"),
            }
        }
        "refresh_token" => {
            let presented = body["refresh_token"].as_str().unwrap_or_default();
            hosted.log("refresh".to_string());

            // Refresh tokens are single use
            let email = hosted.refresh_tokens.lock().unwrap().remove(presented);
            let account = email.and_then(|email| {
                let id = hosted.accounts.lock().unwrap().get(&email).map(|a| a.id)?;
                Some((email, id))
            });

            match account {
                Some((email, id)) => Json(hosted.issue(&email, id)).into_response(),
                None => auth_error("refresh_token_not_found", "Invalid Refresh Token: Refresh Token Not Found"),
            }
        }
        other => auth_error("validation_failed", &format!("unsupported grant_type {}", other)),
    }
}

async fn signup(State(hosted): State<Arc<Hosted>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    hosted.log(format!("signup:{}", email));
    hosted.signups.lock().unwrap().push(body);

    let mut accounts = hosted.accounts.lock().unwrap();

    // A confirmed account is not revealed: the user comes back without identities
    if let Some(existing) = accounts.get(&email).filter(|a| a.confirmed) {
        return Json(json!({ "id": existing.id, "email": email, "identities": [] })).into_response();
    }

    let id = Uuid::new_v4();
    accounts.insert(email.clone(), Account { id, password, confirmed: false });
    Json(json!({
        "id": id,
        "email": email,
        "identities": [{ "id": id.to_string(), "provider": "email" }]
    }))
    .into_response()
}

async fn resend(State(hosted): State<Arc<Hosted>>, Json(body): Json<Value>) -> Response {
    hosted.log(format!("resend:{}", body["email"].as_str().unwrap_or_default()));
    Json(json!({})).into_response()
}

async fn logout(State(hosted): State<Arc<Hosted>>) -> StatusCode {
    hosted.log("logout".to_string());
    StatusCode::NO_CONTENT
}

async fn user(State(hosted): State<Arc<Hosted>>, headers: HeaderMap) -> Response {
    hosted.log("user".to_string());

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    match tour_admin::auth::decode_access_token(token, Some(SIGNING_KEY)) {
        Ok(claims) if claims.exp > Utc::now().timestamp() => Json(json!({ "id": claims.sub, "email": claims.email })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error_code": "bad_jwt", "msg": "invalid JWT" })),
        )
            .into_response(),
    }
}

/// `column=eq.value` pairs; everything else in the query string is ignored.
fn eq_filters(params: &[(String, String)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(column, filter)| Some((column.clone(), filter.strip_prefix("eq.")?.to_string())))
        .collect()
}

fn row_matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| match &row[column] {
        Value::String(s) => s == expected,
        Value::Null => false,
        other => other.to_string() == *expected,
    })
}

async fn select_rows(
    State(hosted): State<Arc<Hosted>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    hosted.log(format!("select:{}", table));

    if hosted.broken_tables.lock().unwrap().contains(&table) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "relation is on fire" }))).into_response();
    }

    let filters = eq_filters(&params);
    let rows: Vec<Value> = hosted
        .rows(&table)
        .into_iter()
        .filter(|row| row_matches(row, &filters))
        .collect();
    Json(rows).into_response()
}

async fn insert_row(
    State(hosted): State<Arc<Hosted>>,
    Path(table): Path<String>,
    Json(mut record): Json<Value>,
) -> Response {
    hosted.log(format!("insert:{}", table));

    let id_column = format!("{}_id", table.trim_end_matches('s'));
    if let Value::Object(map) = &mut record {
        map.entry(id_column).or_insert_with(|| json!(Uuid::new_v4()));
    }

    hosted
        .tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .push(record.clone());
    (StatusCode::CREATED, Json(json!([record]))).into_response()
}

async fn update_rows(
    State(hosted): State<Arc<Hosted>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    Json(patch): Json<Value>,
) -> StatusCode {
    hosted.log(format!("update:{}", table));

    let filters = eq_filters(&params);
    let mut tables = hosted.tables.lock().unwrap();
    for row in tables.entry(table).or_default().iter_mut() {
        if !row_matches(row, &filters) {
            continue;
        }
        if let (Value::Object(target), Value::Object(changes)) = (row, &patch) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    StatusCode::NO_CONTENT
}

async fn delete_rows(
    State(hosted): State<Arc<Hosted>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> StatusCode {
    hosted.log(format!("delete:{}", table));

    let filters = eq_filters(&params);
    hosted
        .tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .retain(|row| !row_matches(row, &filters));
    StatusCode::NO_CONTENT
}

fn hosted_router(hosted: Arc<Hosted>) -> Router {
    Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/resend", post(resend))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/user", get(user))
        .route(
            "/rest/v1/:table",
            get(select_rows).post(insert_row).patch(update_rows).delete(delete_rows),
        )
        .with_state(hosted)
}

async fn serve(app: Router) -> Result<String> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

/// The dashboard server running against a fresh fake hosted service.
pub struct TestApp {
    pub base_url: String,
    pub hosted: Arc<Hosted>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let hosted = Arc::new(Hosted::default());
        let hosted_url = serve(hosted_router(hosted.clone())).await?;

        let config = AppConfig::from_source(|key| match key {
            "SUPABASE_URL" => Some(hosted_url.clone()),
            "SUPABASE_ANON_KEY" => Some("anon-key".to_string()),
            "ENABLE_TEST_ACCOUNTS" => Some("true".to_string()),
            _ => None,
        })?;
        let backend = HttpBackend::new(&config)?;
        let state = AppState::new(config, Arc::new(backend), SessionEvents::default());
        let base_url = serve(router(state)).await?;

        // Redirects are what the guard tests look at
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;

        let app = Self { base_url, hosted, client };
        app.wait_ready(Duration::from_secs(5)).await?;
        Ok(app)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a confirmed account, sign in through the login form and
    /// return the `Cookie` header to send with later requests.
    pub async fn signed_in(&self, email: &str) -> Result<String> {
        self.hosted.add_account(email, "Password123!", true);

        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": "Password123!" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::OK, "login failed with {}", res.status());

        Ok(cookie_header(&res))
    }
}

/// `Set-Cookie` headers of a response folded into one `Cookie` header.
pub fn cookie_header(res: &reqwest::Response) -> String {
    set_cookies(res)
        .iter()
        .filter_map(|c| c.split(';').next())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn set_cookies(res: &reqwest::Response) -> Vec<String> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub fn location(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
