use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "feelbetter-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Ready once the document store answers; remote endpoints are reported only.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM session_store")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let prediction = if state.config.prediction_api_url.is_some() {
        "configured"
    } else {
        "default"
    };

    let (status, label) = if db_ok {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        status,
        Json(json!({
            "status": label,
            "checks": {
                "database": if db_ok { "ok" } else { "failed" },
                "prediction": prediction,
            },
        })),
    )
}
