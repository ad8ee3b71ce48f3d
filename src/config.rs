/// Tracker configuration.
///
/// Every setting has a compiled-in default, so the tracker runs with no
/// configuration at all. A TOML file can override any subset of fields, and
/// the API base URL can additionally be pointed elsewhere through the
/// environment (or a `.env` file), which is how tests and staging mirrors
/// are wired in.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::SpikePolicy;
use crate::logging::{self, Stage};
use crate::ingest::awdb::LOOKBACK_HOURS;
use crate::regions::AWDB_BASE_URL;

/// Environment variable that overrides `api_base_url`.
pub const BASE_URL_ENV: &str = "SNOWFALL_API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings for one tracker instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// AWDB REST root, e.g. `https://wcc.sc.egov.usda.gov/awdbRestApi/services/v1`.
    pub api_base_url: String,
    /// Length of the per-station data window, ending now.
    pub lookback_hours: u32,
    pub spike_policy: SpikePolicy,
    /// Upper bound on concurrent station requests. `None` fetches every
    /// station at once.
    pub max_in_flight: Option<NonZeroUsize>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            api_base_url: AWDB_BASE_URL.to_string(),
            lookback_hours: LOOKBACK_HOURS,
            spike_policy: SpikePolicy::Ignore,
            max_in_flight: None,
            request_timeout_secs: None,
        }
    }
}

impl TrackerConfig {
    /// Parses a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(contents: &str, path: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&contents, &display)?;
        logging::info(Stage::Config, Some(&display), "Loaded configuration file");
        Ok(config)
    }

    /// Applies `SNOWFALL_API_BASE_URL` if set, after loading `.env` from the
    /// working directory when present.
    pub fn with_env_overrides(mut self) -> Self {
        dotenv::dotenv().ok();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
                logging::info(
                    Stage::Config,
                    Some(BASE_URL_ENV),
                    &format!("API base URL overridden: {}", self.api_base_url),
                );
            }
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty".into()));
        }
        if self.lookback_hours == 0 {
            return Err(ConfigError::Invalid("lookback_hours must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_awdb_contract() {
        let config = TrackerConfig::default();
        assert_eq!(config.api_base_url, AWDB_BASE_URL);
        assert_eq!(config.lookback_hours, 48);
        assert_eq!(config.spike_policy, SpikePolicy::Ignore);
        assert_eq!(config.max_in_flight, None);
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrackerConfig::from_toml_str(
            "spike_policy = \"abort_on_spike\"\nmax_in_flight = 8\n",
            "inline",
        )
        .expect("partial config should parse");
        assert_eq!(config.spike_policy, SpikePolicy::AbortOnSpike);
        assert_eq!(config.max_in_flight, NonZeroUsize::new(8));
        assert_eq!(config.lookback_hours, 48);
        assert_eq!(config.api_base_url, AWDB_BASE_URL);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = TrackerConfig::from_toml_str("lookback = 24\n", "inline");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_zero_lookback_is_invalid() {
        assert!(matches!(
            TrackerConfig::from_toml_str("lookback_hours = 0\n", "inline"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_cap_does_not_parse() {
        let result = TrackerConfig::from_toml_str("max_in_flight = 0\n", "inline");
        assert!(
            matches!(result, Err(ConfigError::Parse { .. })),
            "a zero cap would stall the fan-out, got {:?}",
            result
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "api_base_url = \"http://localhost:9000/v1\"").expect("write");
        writeln!(file, "request_timeout_secs = 20").expect("write");

        let config = TrackerConfig::load(file.path()).expect("config should load");
        assert_eq!(config.api_base_url, "http://localhost:9000/v1");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = TrackerConfig::load(Path::new("/nonexistent/snowfall.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
