use std::fs;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::pager::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the occupancy meter backend.
    pub api_url: String,
    pub request_timeout_ms: u64,
    /// Draw/tick interval of the UI loop.
    pub tick_ms: u64,
    /// Initial history page size; must be one of the selectable sizes.
    pub page_size: usize,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 10_000,
            tick_ms: 250,
            page_size: DEFAULT_PAGE_SIZE,
            log_file: "occupancy-dash.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        if let Ok(config_str) = fs::read_to_string(path) {
            let config: AppConfig = serde_json::from_str(&config_str)?;
            return Ok(config);
        }

        // Emitted before the subscriber is up when the default path is
        // absent, which is fine: a missing file is the normal case.
        tracing::warn!(%path, "configuration file not found, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.api_url.starts_with("http://"));
        assert!(config.tick_ms > 0);
    }

    #[test]
    fn round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_url, config.api_url);
        assert_eq!(back.page_size, config.page_size);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("/nonexistent/config.json").unwrap();
        assert_eq!(config.api_url, AppConfig::default().api_url);
    }
}
