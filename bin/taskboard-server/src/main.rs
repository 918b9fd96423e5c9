//! taskboard-server – entry point.
//!
//! Reads configuration from the environment, installs the tracing
//! subscriber, builds the shared state (API client, compiled views, display
//! zone) and serves the router until SIGINT or SIGTERM.

mod config;
mod error;
mod format;
mod middleware;
mod routes;
mod schemas;
mod state;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    init_tracing(&cfg);
    info!(version = env!("CARGO_PKG_VERSION"), "taskboard-server starting");

    let addr: SocketAddr = cfg.bind_address.parse()?;
    let state = Arc::new(AppState::new(cfg)?);
    info!(
        api_base_url = %state.api.base_url(),
        time_zone = %state.time_zone,
        assets_dir = %state.config.assets_dir,
        "state ready"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, routes::build(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("taskboard-server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `TASKBOARD_LOG`.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| configured_filter(&cfg.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// The `TASKBOARD_LOG` filter; an unparsable value falls back to `info`.
/// The subscriber is not installed yet, so the warning goes to stderr.
fn configured_filter(level: &str) -> EnvFilter {
    level.parse().unwrap_or_else(|e| {
        eprintln!("WARN: TASKBOARD_LOG='{level}' is not a valid tracing filter ({e}); using info");
        EnvFilter::new("info")
    })
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c    => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn configured_filter_keeps_valid_directives() {
        let filter = configured_filter("taskboard_server=debug,warn");
        assert_ne!(filter.to_string(), EnvFilter::new("info").to_string());
    }

    #[test]
    fn configured_filter_falls_back_to_info() {
        let filter = configured_filter("taskboard=loud");
        assert_eq!(filter.to_string(), EnvFilter::new("info").to_string());
    }
}
