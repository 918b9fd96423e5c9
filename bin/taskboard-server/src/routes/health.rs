//! Health / heartbeat endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::state::AppState;

/// Register health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Heartbeat endpoint.
///
/// Returns `{"status": "ok", "version": "...", "api_base_url": "..."}` with
/// HTTP 200. The task API itself is not contacted.
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status":       "ok",
        "version":      env!("CARGO_PKG_VERSION"),
        "api_base_url": state.api.base_url().as_str(),
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(
            AppState::new(Config::for_api("http://tasks.internal:4000")).unwrap(),
        ))
    }

    #[tokio::test]
    async fn health_response_has_ok_status() {
        let Json(body) = get_health(state()).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn health_response_has_version_and_upstream() {
        let Json(body) = get_health(state()).await;
        assert!(!body["version"].as_str().unwrap_or("").is_empty());
        assert_eq!(body["api_base_url"], "http://tasks.internal:4000/");
    }
}
