//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for taskboard-server.
///
/// Every field has a default so the server starts without any environment
/// variables set, pointing at a task API on `localhost:4000`.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3100"`).
    pub bind_address: String,

    /// Base URL of the remote task API (default: `"http://localhost:4000"`).
    pub api_base_url: String,

    /// Directory served under `/assets` (default: this crate's `assets/`).
    pub assets_dir: String,

    /// Zone name appended to formatted due dates. `None` means the host's
    /// IANA zone.
    ///
    /// This is a label only. New due dates are always computed in the host
    /// zone (`chrono::Local`, which honours `TZ`), so set `TZ` as well when
    /// the two should differ from the machine default.
    pub time_zone: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("TASKBOARD_BIND", "0.0.0.0:3100"),
            api_base_url: env_or("TASKBOARD_API_URL", "http://localhost:4000"),
            assets_dir: env_or(
                "TASKBOARD_ASSETS_DIR",
                concat!(env!("CARGO_MANIFEST_DIR"), "/assets"),
            ),
            time_zone: std::env::var("TASKBOARD_TIMEZONE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            log_level: env_or("TASKBOARD_LOG", "info"),
            log_json: std::env::var("TASKBOARD_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Configuration for tests: the given API, no assets, a fixed zone.
    #[cfg(test)]
    pub fn for_api(api_base_url: &str) -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_owned(),
            api_base_url: api_base_url.to_owned(),
            assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_owned(),
            time_zone: Some("Europe/London".to_owned()),
            log_level: "info".to_owned(),
            log_json: false,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
