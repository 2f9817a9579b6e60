use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use transitprep_core::prelude::*;

/// Settings for every stage, read from an optional TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub routing: RoutingConfig,
    pub matrix: MatrixConfig,
    pub geometry: GeometryConfig,
    pub services: ServiceConfig,
}

impl AppConfig {
    /// File (when given), then process environment
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let mut config = match path {
            Some(path) => read_config(path)?,
            None => AppConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        debug!(?config, "Effective configuration");
        Ok(config)
    }

    /// Override from `ORS_API_KEY`, `MATRIX_MODE`, `MATRIX_MAX_STATIONS` and
    /// `PYTHON_SERVICE_URL`. Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = var("ORS_API_KEY") {
            self.routing.api_key = Some(key);
        }
        if let Some(mode) = var("MATRIX_MODE") {
            match mode.parse() {
                Ok(mode) => self.matrix.mode = mode,
                Err(e) => warn!("Ignoring MATRIX_MODE: {e}"),
            }
        }
        if let Some(cap) = var("MATRIX_MAX_STATIONS") {
            match cap.trim().parse::<usize>() {
                // 0 lifts the cap
                Ok(0) => self.matrix.max_remote_stations = None,
                Ok(cap) => self.matrix.max_remote_stations = Some(cap),
                Err(e) => warn!("Ignoring MATRIX_MAX_STATIONS={cap:?}: {e}"),
            }
        }
        if let Some(url) = var("PYTHON_SERVICE_URL") {
            self.services.base_url = url;
        }
    }
}

pub fn read_config(path: &Path) -> Result<AppConfig, Box<dyn Error>> {
    info!("Reading config from file {}", path.display());
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_toml_sections_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [routing]
            base_url = "http://ors.internal:8080"

            [matrix]
            mode = "local"
            chunk_size = 10
            chunk_delay = 0.25

            [services]
            base_url = "http://python:5000"
            "#,
        )
        .unwrap();

        assert_eq!(config.routing.base_url, "http://ors.internal:8080");
        assert_eq!(config.routing.profile, "driving-car");
        assert_eq!(config.matrix.mode, MatrixMode::Local);
        assert_eq!(config.matrix.chunk_size, 10);
        assert_eq!(config.matrix.chunk_delay, Duration::from_millis(250));
        assert_eq!(config.matrix.build_timeout, Duration::from_secs(120));
        assert_eq!(config.geometry.timeout, Duration::from_secs(12));
        assert_eq!(config.services.base_url, "http://python:5000");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("ORS_API_KEY", "k-123"),
            ("MATRIX_MODE", "local"),
            ("MATRIX_MAX_STATIONS", "40"),
            ("PYTHON_SERVICE_URL", "http://sim:5000"),
        ]));

        assert_eq!(config.routing.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.matrix.mode, MatrixMode::Local);
        assert_eq!(config.matrix.max_remote_stations, Some(40));
        assert_eq!(config.services.base_url, "http://sim:5000");
    }

    #[test]
    fn test_effective_config_log_hides_the_key() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("ORS_API_KEY", "k-secret-123")]));
        let printed = format!("{config:?}");
        assert!(!printed.contains("k-secret-123"));
        assert!(printed.contains("api.openrouteservice.org"));
    }

    #[test]
    fn test_env_zero_cap_and_bad_values() {
        let mut config = AppConfig::default();
        config.matrix.max_remote_stations = Some(10);
        config.apply_env(env(&[
            ("MATRIX_MAX_STATIONS", "0"),
            ("MATRIX_MODE", "teleport"),
            ("ORS_API_KEY", "  "),
        ]));

        assert_eq!(config.matrix.max_remote_stations, None);
        assert_eq!(config.matrix.mode, MatrixMode::Remote);
        assert_eq!(config.routing.api_key, None);

        config.apply_env(env(&[("MATRIX_MAX_STATIONS", "many")]));
        assert_eq!(config.matrix.max_remote_stations, None);
    }
}
