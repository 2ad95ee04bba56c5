// handlers/protected/dashboard.rs - GET /dashboard shell

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, Notice};
use crate::session::CurrentSession;

#[derive(Debug, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub href: String,
}

/// Frame shared by every dashboard screen: who is signed in, the sidebar,
/// and the sign-out action.
#[derive(Debug, Serialize)]
pub struct DashboardShell {
    pub user_email: Option<String>,
    pub navigation: Vec<NavItem>,
    pub quick_actions: Vec<NavItem>,
    pub sign_out: String,
    pub notice: Option<Notice>,
}

fn nav(root: &str, title: &'static str, path: &str) -> NavItem {
    NavItem { title, href: format!("{}{}", root, path) }
}

pub async fn dashboard_get(State(state): State<AppState>, session: CurrentSession) -> ApiResponse<DashboardShell> {
    let root = state.config.routes.protected_root.as_str();

    // The auth service is the authority on the profile; the token's claims
    // are only a fallback
    let (user_email, notice) = match state.backend.get_current_user(session.access_token()).await {
        Ok(Some(user)) => (user.email, None),
        Ok(None) => (session.0.user.email.clone(), None),
        Err(e) => {
            tracing::warn!("Could not load profile for {}: {}", session.0.user.id, e);
            (
                session.0.user.email.clone(),
                Some(Notice::error("Could not load your profile")),
            )
        }
    };

    ApiResponse::success(DashboardShell {
        user_email,
        navigation: vec![
            nav(root, "Dashboard", ""),
            nav(root, "Tours", "/tours"),
            nav(root, "Customers", "/customers"),
            nav(root, "Bookings", "/bookings"),
            nav(root, "Payments", "/payments"),
        ],
        quick_actions: vec![
            nav(root, "Add New Tour", "/tours/new"),
            nav(root, "View Bookings", "/bookings"),
        ],
        sign_out: format!("{}/sign-out", root),
        notice,
    })
}
