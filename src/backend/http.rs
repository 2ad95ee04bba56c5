use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::error::{classify_auth_error, classify_data_error, BackendError, BackendResult};
use super::query::{Key, Query};
use super::types::{Session, SessionState, SessionTokens, SignUpOutcome, SignUpRequest, User};
use super::Backend;
use crate::auth::{decode_access_token, AccessClaims, TokenError};
use crate::config::AppConfig;

/// REST client for the hosted service: `/auth/v1/*` for identity and
/// `/rest/v1/{table}` for rows.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    anon_key: String,
    jwt_secret: Option<String>,
    refresh_margin_secs: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now + secs))
            .unwrap_or(now);

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .user_agent(concat!("tour-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Unreachable(format!("failed to build http client: {}", e)))?;

        // Joining relative paths onto a base without a trailing slash would
        // drop its last segment
        let mut base = config.backend.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client,
            base,
            anon_key: config.backend.anon_key.clone(),
            jwt_secret: config.backend.jwt_secret.clone(),
            refresh_margin_secs: config.session.refresh_margin_secs,
        })
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Decode(format!("bad endpoint '{}': {}", path, e)))
    }

    fn request(&self, method: Method, url: Url, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    async fn read_body(response: Response) -> BackendResult<(u16, Value)> {
        let status = response.status();
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Ok((status.as_u16(), Value::Null));
        }

        if status.is_success() {
            let body = serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))?;
            Ok((status.as_u16(), body))
        } else {
            // Gateways answer with HTML or plain text
            let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }));
            Ok((status.as_u16(), body))
        }
    }

    async fn send_auth(&self, builder: RequestBuilder) -> BackendResult<Value> {
        let response = builder.send().await?;
        let (status, body) = Self::read_body(response).await?;
        if (200..300).contains(&status) {
            Ok(body)
        } else {
            Err(classify_auth_error(status, &body))
        }
    }

    async fn send_data(&self, builder: RequestBuilder) -> BackendResult<Value> {
        let response = builder.send().await?;
        let (status, body) = Self::read_body(response).await?;
        if (200..300).contains(&status) {
            Ok(body)
        } else {
            Err(classify_data_error(status, &body))
        }
    }

    async fn refresh(&self, refresh_token: &str) -> BackendResult<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");

        let body = self
            .send_auth(self.request(Method::POST, url, None).json(&json!({ "refresh_token": refresh_token })))
            .await?;

        let token: TokenResponse = serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    /// The user an unexpired access token speaks for. Without a signing
    /// secret the claims are unverified, so the auth service is asked.
    async fn vouch_for(&self, access_token: &str, claims: &AccessClaims) -> BackendResult<Option<User>> {
        if self.jwt_secret.is_some() {
            return Ok(Some(claims.user()));
        }
        self.get_current_user(access_token).await
    }

    fn table_url(&self, table: &str) -> BackendResult<Url> {
        self.endpoint(&format!("rest/v1/{}", table))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let body = self
            .send_auth(
                self.request(Method::POST, url, None)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;

        let token: TokenResponse = serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    async fn sign_up(&self, request: &SignUpRequest) -> BackendResult<SignUpOutcome> {
        let mut url = self.endpoint("auth/v1/signup")?;
        if let Some(redirect_to) = &request.redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        }

        let body = self.send_auth(self.request(Method::POST, url, None).json(request)).await?;

        // With auto-confirm the service answers with a full session,
        // otherwise with the bare user awaiting confirmation
        if body.get("access_token").is_some() {
            let token: TokenResponse =
                serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
            let session = token.into_session(Utc::now().timestamp());
            let identities = session.user.identities.clone().unwrap_or_default();
            return Ok(SignUpOutcome {
                user: Some(session.user.clone()),
                identities,
                session: Some(session),
            });
        }

        let user: User = serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(SignUpOutcome {
            identities: user.identities.clone().unwrap_or_default(),
            user: Some(user),
            session: None,
        })
    }

    async fn resend_confirmation(&self, email: &str, redirect_to: &str) -> BackendResult<()> {
        let mut url = self.endpoint("auth/v1/resend")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        self.send_auth(
            self.request(Method::POST, url, None)
                .json(&json!({ "type": "signup", "email": email })),
        )
        .await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        let url = self.endpoint("auth/v1/logout")?;
        match self.send_auth(self.request(Method::POST, url, Some(access_token))).await {
            Ok(_) | Err(BackendError::Unauthorized) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn get_session(&self, tokens: &SessionTokens) -> BackendResult<Option<SessionState>> {
        let now = Utc::now().timestamp();
        let refresh_token = tokens.refresh_token.as_deref().filter(|t| !t.is_empty());

        // A token that is close to expiry but still valid is kept in case
        // it cannot be refreshed.
        let mut expiring = None;

        if let Some(access_token) = tokens.access_token.as_deref().filter(|t| !t.is_empty()) {
            match decode_access_token(access_token, self.jwt_secret.as_deref()) {
                Ok(claims) if claims.exp > now => match self.vouch_for(access_token, &claims).await? {
                    Some(user) => {
                        let session = Session {
                            access_token: access_token.to_string(),
                            refresh_token: refresh_token.unwrap_or_default().to_string(),
                            expires_at: claims.exp,
                            user,
                        };
                        if claims.exp - now > self.refresh_margin_secs {
                            return Ok(Some(SessionState::Current(session)));
                        }
                        tracing::debug!("Access token for {} expires in {}s, refreshing", claims.sub, claims.exp - now);
                        expiring = Some(SessionState::Current(session));
                    }
                    None => {
                        tracing::warn!("Auth service rejected access token for {}", claims.sub);
                    }
                },
                Ok(claims) => {
                    tracing::debug!("Access token for {} expired, refreshing", claims.sub);
                }
                Err(TokenError::BadSignature(e)) => {
                    tracing::warn!("Rejecting session with forged access token: {}", e);
                    return Ok(None);
                }
                Err(e) => {
                    tracing::debug!("Ignoring unreadable access token: {}", e);
                }
            }
        }

        let Some(refresh_token) = refresh_token else {
            return Ok(expiring);
        };

        match self.refresh(refresh_token).await {
            Ok(session) => Ok(Some(SessionState::Refreshed(session))),
            Err(e) if expiring.is_some() => {
                tracing::warn!("Refresh failed, keeping current access token: {}", e);
                Ok(expiring)
            }
            Err(BackendError::Unreachable(msg)) => Err(BackendError::Unreachable(msg)),
            Err(BackendError::Rejected { status, message }) if status >= 500 => {
                Err(BackendError::Rejected { status, message })
            }
            Err(e) => {
                tracing::debug!("Refresh token rejected: {}", e);
                Ok(None)
            }
        }
    }

    async fn get_current_user(&self, access_token: &str) -> BackendResult<Option<User>> {
        let url = self.endpoint("auth/v1/user")?;
        match self.send_auth(self.request(Method::GET, url, Some(access_token))).await {
            Ok(body) => {
                let user: User = serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
                Ok(Some(user))
            }
            Err(BackendError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn query(&self, access_token: Option<&str>, query: &Query) -> BackendResult<Vec<Value>> {
        let mut url = self.table_url(&query.table)?;
        url.query_pairs_mut().extend_pairs(query.to_params());

        let body = self.send_data(self.request(Method::GET, url, access_token)).await?;
        match body {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(vec![]),
            other => Err(BackendError::Decode(format!("expected an array of rows, got {}", other))),
        }
    }

    async fn insert(&self, access_token: Option<&str>, table: &str, record: &Value) -> BackendResult<Value> {
        let url = self.table_url(table)?;
        let body = self
            .send_data(
                self.request(Method::POST, url, access_token)
                    .header("Prefer", "return=representation")
                    .json(record),
            )
            .await?;

        match body {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            Value::Object(_) => Ok(body),
            other => Err(BackendError::Decode(format!("insert into {} returned {}", table, other))),
        }
    }

    async fn update(&self, access_token: Option<&str>, table: &str, key: &Key, patch: &Value) -> BackendResult<()> {
        let mut url = self.table_url(table)?;
        let (column, filter) = key.to_param();
        url.query_pairs_mut().append_pair(&column, &filter);

        self.send_data(
            self.request(Method::PATCH, url, access_token)
                .header("Prefer", "return=minimal")
                .json(patch),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, access_token: Option<&str>, table: &str, key: &Key) -> BackendResult<()> {
        let mut url = self.table_url(table)?;
        let (column, filter) = key.to_param();
        url.query_pairs_mut().append_pair(&column, &filter);

        self.send_data(self.request(Method::DELETE, url, access_token)).await?;
        Ok(())
    }
}
