//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use anyhow::Context;
use taskboard_api::TaskClient;

use crate::config::Config;
use crate::format::local_time_zone_name;
use crate::views::Views;

/// Read-only state shared by all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Client for the remote task API.
    pub api: TaskClient,
    /// Compiled page templates.
    pub views: Arc<Views>,
    /// Zone name appended to formatted due dates.
    pub time_zone: Arc<str>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = TaskClient::new(&config.api_base_url)
            .with_context(|| format!("invalid TASKBOARD_API_URL {:?}", config.api_base_url))?;
        let views = Views::load().context("failed to compile view templates")?;
        let time_zone = config
            .time_zone
            .clone()
            .unwrap_or_else(local_time_zone_name);

        Ok(Self {
            config: Arc::new(config),
            api,
            views: Arc::new(views),
            time_zone: time_zone.into(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn configured_zone_is_only_the_label() {
        let state = AppState::new(Config::for_api("http://localhost:4000")).unwrap();
        assert_eq!(&*state.time_zone, "Europe/London");
    }

    #[test]
    fn host_zone_is_used_without_override() {
        let config = Config {
            time_zone: None,
            ..Config::for_api("http://localhost:4000")
        };
        let state = AppState::new(config).unwrap();
        assert_eq!(&*state.time_zone, local_time_zone_name());
    }

    #[test]
    fn bad_api_url_fails_startup() {
        let err = AppState::new(Config::for_api("not a url")).unwrap_err();
        assert!(err.to_string().contains("TASKBOARD_API_URL"));
    }
}
