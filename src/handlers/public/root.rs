// handlers/public/root.rs - GET / landing view

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::ApiResponse;

#[derive(Debug, Serialize)]
pub struct Landing {
    pub name: &'static str,
    pub version: &'static str,
    pub login: String,
    pub register: String,
}

/**
 * GET / - Landing view for signed-out visitors
 *
 * Signed-in visitors never reach this handler; the session guard sends
 * them to the dashboard first.
 *
 * Output:
 * ```json
 * { "success": true, "data": { "name": "Tour Admin", "version": "0.1.0",
 *   "login": "/auth/login", "register": "/auth/register" } }
 * ```
 */
pub async fn root(State(state): State<AppState>) -> ApiResponse<Landing> {
    let auth_root = &state.config.routes.auth_root;

    ApiResponse::success(Landing {
        name: "Tour Admin",
        version: env!("CARGO_PKG_VERSION"),
        login: state.config.routes.login_path.clone(),
        register: format!("{}/register", auth_root),
    })
}
