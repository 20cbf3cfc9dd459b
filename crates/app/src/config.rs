//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `FORSEE_STORAGE_PATH` | `<data dir>/forsee/storage.json` |
//! | `FORSEE_AUTH_LATENCY_MS` | `500` |
//! | `FORSEE_HANDSHAKE_MS` | `800` |
//! | `FORSEE_THINKING_MS` | `2500` |
//! | `FORSEE_LOG_FORMAT` | `json` (`pretty` for humans) |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use forsee_observability::LogFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got '{value}'")]
    InvalidDuration { var: &'static str, value: String },

    #[error("{var} must be 'json' or 'pretty', got '{value}'")]
    InvalidLogFormat { var: &'static str, value: String },

    #[error("could not resolve a data directory; set FORSEE_STORAGE_PATH")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage_path: PathBuf,
    pub auth_latency: Duration,
    pub handshake_delay: Duration,
    pub thinking_delay: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_path = match lookup("FORSEE_STORAGE_PATH").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_storage_path()?,
        };

        let log_format = match lookup("FORSEE_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat {
                var: "FORSEE_LOG_FORMAT",
                value: raw,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            storage_path,
            auth_latency: millis(&lookup, "FORSEE_AUTH_LATENCY_MS", 500)?,
            handshake_delay: millis(&lookup, "FORSEE_HANDSHAKE_MS", 800)?,
            thinking_delay: millis(&lookup, "FORSEE_THINKING_MS", 2500)?,
            log_format,
        })
    }
}

fn millis<F>(lookup: &F, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(Duration::from_millis(default)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDuration { var, value: raw }),
    }
}

/// `{data_dir}/forsee/storage.json`, falling back to `~/.local/share`.
fn default_storage_path() -> Result<PathBuf, ConfigError> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;
    dir.push("forsee");
    dir.push("storage.json");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn explicit_values_are_used() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("FORSEE_STORAGE_PATH", "/tmp/forsee.json"),
            ("FORSEE_AUTH_LATENCY_MS", "0"),
            ("FORSEE_HANDSHAKE_MS", " 10 "),
            ("FORSEE_THINKING_MS", "20"),
            ("FORSEE_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/forsee.json"));
        assert_eq!(config.auth_latency, Duration::ZERO);
        assert_eq!(config.handshake_delay, Duration::from_millis(10));
        assert_eq!(config.thinking_delay, Duration::from_millis(20));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn defaults_match_the_demo_timings() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("FORSEE_STORAGE_PATH", "/tmp/x.json")])).unwrap();
        assert_eq!(config.auth_latency, Duration::from_millis(500));
        assert_eq!(config.handshake_delay, Duration::from_millis(800));
        assert_eq!(config.thinking_delay, Duration::from_millis(2500));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("FORSEE_STORAGE_PATH", "/tmp/x.json"),
            ("FORSEE_THINKING_MS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDuration {
                var: "FORSEE_THINKING_MS",
                value: "soon".into()
            }
        );
    }

    #[test]
    fn bad_log_format_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("FORSEE_STORAGE_PATH", "/tmp/x.json"),
            ("FORSEE_LOG_FORMAT", "xml"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogFormat { .. }));
    }
}
