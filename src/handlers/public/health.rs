// handlers/public/health.rs - GET /health liveness probe

use axum::Json;
use serde_json::{json, Value};

/// Process liveness only; the hosted backend is not contacted.
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
