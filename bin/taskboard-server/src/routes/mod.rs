//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - method override (outermost, ahead of routing)
//! - per-request trace-ID span
//! - task pages, health route and static assets

mod health;
mod tasks;

use axum::{Router, middleware};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::middleware::{method_override, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let app = Router::new()
        .merge(health::router())
        .merge(tasks::router())
        .nest_service("/assets", ServeDir::new(&state.config.assets_dir))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state);

    // Layers added with `Router::layer` run after routing has picked a
    // handler, so the override wraps the finished router as its fallback.
    Router::new()
        .fallback_service(app)
        .layer(middleware::from_fn(method_override::method_override))
}
