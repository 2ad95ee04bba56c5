use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tour_admin::backend::HttpBackend;
use tour_admin::config::AppConfig;
use tour_admin::session::{events::spawn_audit_logger, SessionEvents};
use tour_admin::{router, AppState};

#[derive(Debug, Parser)]
#[command(name = "tour-admin", version, about = "Tour operator admin dashboard server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "TOUR_ADMIN_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind (falls back to PORT, then 3000)
    #[arg(long, env = "TOUR_ADMIN_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tour_admin=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    // Missing backend settings stop the process before anything binds
    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting tour-admin in {:?} mode against {}", config.environment, config.backend.url);

    let backend = HttpBackend::new(&config).context("failed to build backend client")?;

    let events = SessionEvents::default();
    if config.security.enable_audit_logging {
        spawn_audit_logger(&events);
    }

    let state = AppState::new(config, Arc::new(backend), events);
    let app = router(state);

    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);
    let bind_addr = format!("{}:{}", args.host, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("tour-admin listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
