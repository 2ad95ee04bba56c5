use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::Backend;
use crate::config::{AppConfig, SecurityConfig};
use crate::guard::RouteScope;
use crate::handlers::{protected, public};
use crate::middleware::session_guard;
use crate::session::SessionEvents;

/// Shared by every handler. Configuration is read once at start-up and
/// passed down from here; nothing downstream touches the environment.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn Backend>,
    pub events: SessionEvents,
    pub scope: Arc<RouteScope>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>, events: SessionEvents) -> Self {
        let scope = RouteScope::from_config(&config.routes);
        Self {
            config: Arc::new(config),
            backend,
            events,
            scope: Arc::new(scope),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let auth_root = state.config.routes.auth_root.clone();
    let protected_root = state.config.routes.protected_root.clone();
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Credential flows
        .nest(&auth_root, auth_routes())
        // Dashboard screens
        .nest(&protected_root, dashboard_routes())
        // Global middleware
        .layer(from_fn_with_state(state.clone(), session_guard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    let router = Router::new()
        .route("/login", get(auth::login_get).post(auth::login_post))
        .route("/register", get(auth::register_get).post(auth::register_post))
        .route("/register/resend", post(auth::register_resend));

    #[cfg(feature = "test-accounts")]
    let router = router.route("/login/test-account", post(auth::test_account_post));

    router
}

fn dashboard_routes() -> Router<AppState> {
    use protected::{bookings, customers, dashboard, payments, session, tours};

    Router::new()
        .route("/", get(dashboard::dashboard_get))
        .route("/tours", get(tours::tours_get).post(tours::tours_post))
        .route("/tours/new", get(tours::tour_new_get))
        .route(
            "/tours/:id",
            get(tours::tour_get).put(tours::tour_put).delete(tours::tour_delete),
        )
        .route("/customers", get(customers::customers_get))
        .route("/bookings", get(bookings::bookings_get))
        .route("/payments", get(payments::payments_get))
        .route("/sign-out", post(session::sign_out_post))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
