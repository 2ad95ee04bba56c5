//! Route classification and the redirect decision made for every
//! intercepted request. Nothing here performs I/O; the middleware in
//! `crate::middleware::guard` feeds it the outcome of the session check.

use serde::Serialize;

use crate::config::RouteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathClass {
    /// Under the protected root; requires a session.
    Protected,
    /// Under the auth root, or the bare root path.
    Auth,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    NavigateTo(String),
}

/// The path roots the guard partitions requests by, plus the entry
/// points it redirects to.
#[derive(Debug, Clone)]
pub struct RouteScope {
    protected_root: String,
    auth_root: String,
    login_path: String,
    dashboard_path: String,
}

impl RouteScope {
    pub fn from_config(routes: &RouteConfig) -> Self {
        Self {
            protected_root: routes.protected_root.clone(),
            auth_root: routes.auth_root.clone(),
            login_path: routes.login_path.clone(),
            dashboard_path: routes.dashboard_path.clone(),
        }
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if under_root(path, &self.protected_root) {
            PathClass::Protected
        } else if path == "/" || under_root(path, &self.auth_root) {
            PathClass::Auth
        } else {
            PathClass::Public
        }
    }

    /// Matcher scope: protected root, auth root and `/`. Anything else
    /// never reaches the session check.
    pub fn intercepts(&self, path: &str) -> bool {
        self.classify(path) != PathClass::Public
    }

    /// First matching rule wins:
    /// 1. no session on a protected path goes to login;
    /// 2. a session on an auth path (or `/`) goes to the dashboard;
    /// 3. everything else continues.
    pub fn decide(&self, class: PathClass, session_valid: bool) -> GuardDecision {
        match (class, session_valid) {
            (PathClass::Protected, false) => GuardDecision::NavigateTo(self.login_path.clone()),
            (PathClass::Auth, true) => GuardDecision::NavigateTo(self.dashboard_path.clone()),
            _ => GuardDecision::Continue,
        }
    }
}

// `/dashboard` and `/dashboard/...` but not `/dashboardx`
fn under_root(path: &str, root: &str) -> bool {
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
