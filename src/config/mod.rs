use std::env;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub routes: RouteConfig,
    pub session: SessionConfig,
    pub site: SiteConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Hosted backend endpoint and keys. URL and anon key have no defaults.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: Url,
    pub anon_key: String,
    pub jwt_secret: Option<String>,
    pub timeout_secs: u64,
}

/// Path roots the session guard classifies against.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub protected_root: String,
    pub auth_root: String,
    pub login_path: String,
    pub dashboard_path: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub refresh_margin_secs: i64,
    pub secure_cookies: bool,
    pub pending_email_ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_url: Url,
    pub enable_test_accounts: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub enable_audit_logging: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. `from_env` is the
    /// process-environment case of this.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let url = lookup("SUPABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let url = Url::parse(url.trim()).map_err(|e| ConfigError::Invalid {
            var: "SUPABASE_URL",
            reason: e.to_string(),
        })?;

        let anon_key = lookup("SUPABASE_ANON_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let backend = BackendConfig {
            url,
            anon_key,
            jwt_secret: None,
            timeout_secs: 15,
        };

        let config = match environment {
            Environment::Production => Self::production(backend),
            Environment::Staging => Self::staging(backend),
            Environment::Development => Self::development(backend),
        };

        config.with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Backend overrides
        if let Some(v) = lookup("SUPABASE_JWT_SECRET") {
            if !v.trim().is_empty() {
                self.backend.jwt_secret = Some(v.trim().to_string());
            }
        }
        if let Some(v) = lookup("BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }

        // Route overrides
        if let Some(v) = lookup("GUARD_PROTECTED_ROOT") {
            self.routes.protected_root = normalize_root("GUARD_PROTECTED_ROOT", &v)?;
            self.routes.dashboard_path = self.routes.protected_root.clone();
        }
        if let Some(v) = lookup("GUARD_AUTH_ROOT") {
            self.routes.auth_root = normalize_root("GUARD_AUTH_ROOT", &v)?;
            self.routes.login_path = format!("{}/login", self.routes.auth_root);
        }

        // Session overrides
        if let Some(v) = lookup("SESSION_REFRESH_MARGIN_SECS") {
            self.session.refresh_margin_secs = v.parse().unwrap_or(self.session.refresh_margin_secs);
        }
        if let Some(v) = lookup("SESSION_SECURE_COOKIES") {
            self.session.secure_cookies = v.parse().unwrap_or(self.session.secure_cookies);
        }

        // Site overrides
        if let Some(v) = lookup("SITE_URL") {
            self.site.site_url = Url::parse(v.trim()).map_err(|e| ConfigError::Invalid {
                var: "SITE_URL",
                reason: e.to_string(),
            })?;
        }
        if let Some(v) = lookup("ENABLE_TEST_ACCOUNTS") {
            self.site.enable_test_accounts = v.parse().unwrap_or(self.site.enable_test_accounts);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }

        Ok(self)
    }

    /// Link target embedded in confirmation emails.
    pub fn email_redirect_url(&self) -> String {
        let base = self.site.site_url.as_str().trim_end_matches('/');
        format!("{}{}/callback", base, self.routes.auth_root)
    }

    fn routes() -> RouteConfig {
        RouteConfig {
            protected_root: "/dashboard".to_string(),
            auth_root: "/auth".to_string(),
            login_path: "/auth/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }

    fn development(backend: BackendConfig) -> Self {
        Self {
            environment: Environment::Development,
            backend,
            routes: Self::routes(),
            session: SessionConfig {
                refresh_margin_secs: 60,
                secure_cookies: false,
                pending_email_ttl_secs: 60 * 60,
            },
            site: SiteConfig {
                site_url: Url::parse("http://localhost:3000").expect("static url"),
                enable_test_accounts: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                enable_audit_logging: true,
            },
        }
    }

    fn staging(backend: BackendConfig) -> Self {
        Self {
            environment: Environment::Staging,
            backend,
            routes: Self::routes(),
            session: SessionConfig {
                refresh_margin_secs: 60,
                secure_cookies: true,
                pending_email_ttl_secs: 60 * 60,
            },
            site: SiteConfig {
                site_url: Url::parse("https://staging.example.com").expect("static url"),
                enable_test_accounts: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                enable_audit_logging: true,
            },
        }
    }

    fn production(backend: BackendConfig) -> Self {
        Self {
            environment: Environment::Production,
            backend,
            routes: Self::routes(),
            session: SessionConfig {
                refresh_margin_secs: 60,
                secure_cookies: true,
                pending_email_ttl_secs: 30 * 60,
            },
            site: SiteConfig {
                site_url: Url::parse("https://app.example.com").expect("static url"),
                enable_test_accounts: false,
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: vec![],
                enable_audit_logging: true,
            },
        }
    }
}

fn normalize_root(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if !trimmed.starts_with('/') || trimmed.len() < 2 {
        return Err(ConfigError::Invalid {
            var,
            reason: format!("'{}' must be an absolute path below '/'", value),
        });
    }
    Ok(trimmed.to_string())
}
