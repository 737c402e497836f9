//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `USERDASH_STORE_PATH` - JSON file backing the local store
//!   (default: `.userdash/local-storage.json`)
//! - `USERDASH_POLL_INTERVAL_MS` - User list and stats refresh period
//!   (default: 5000)
//! - `USERDASH_ACTIVITY_INTERVAL_MS` - Activity chart refresh period
//!   (default: 3600000)
//! - `USERDASH_LOGIN_DELAY_MS` - Simulated sign-in round-trip (default: 1000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_STORE_PATH: &str = ".userdash/local-storage.json";
const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
const DEFAULT_ACTIVITY_INTERVAL_MS: u64 = 3_600_000;
const DEFAULT_LOGIN_DELAY_MS: u64 = 1_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// File backing the local store
    pub store_path: PathBuf,
    /// How often user views re-read the store
    pub poll_interval: Duration,
    /// How often the activity chart is regenerated
    pub activity_interval: Duration,
    /// Simulated sign-in latency
    pub login_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            activity_interval: Duration::from_millis(DEFAULT_ACTIVITY_INTERVAL_MS),
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = lookup("USERDASH_STORE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);

        Ok(Self {
            store_path,
            poll_interval: get_interval(&lookup, "USERDASH_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
            activity_interval: get_interval(
                &lookup,
                "USERDASH_ACTIVITY_INTERVAL_MS",
                DEFAULT_ACTIVITY_INTERVAL_MS,
            )?,
            login_delay: get_millis(&lookup, "USERDASH_LOGIN_DELAY_MS", DEFAULT_LOGIN_DELAY_MS)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a millisecond duration with a default value.
fn get_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(Duration::from_millis(default));
    };
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a timer period, which must be non-zero.
fn get_interval(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let interval = get_millis(lookup, key, default)?;
    if interval.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.activity_interval, Duration::from_secs(3600));
        assert_eq!(config.store_path, PathBuf::from(".userdash/local-storage.json"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("USERDASH_STORE_PATH", "/tmp/ud.json"),
            ("USERDASH_POLL_INTERVAL_MS", "250"),
            ("USERDASH_LOGIN_DELAY_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/ud.json"));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.login_delay, Duration::ZERO);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = load(&[("USERDASH_POLL_INTERVAL_MS", "0")]).unwrap_err();
        assert!(err.to_string().contains("USERDASH_POLL_INTERVAL_MS"));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = load(&[("USERDASH_ACTIVITY_INTERVAL_MS", "hourly")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "USERDASH_ACTIVITY_INTERVAL_MS"));
    }
}
