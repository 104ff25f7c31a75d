use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::{pkg::server::state::AppState, prelude::Result};

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "message": "Server is running",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })),
    )
}

pub async fn livez() -> Result<()> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> Result<()> {
    state.store.ping().await?;
    tracing::debug!("service is healthy");
    Ok(())
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Endpoint not found" })),
    )
}
