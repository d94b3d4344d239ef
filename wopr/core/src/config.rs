//! Daemon configuration.
//!
//! Loaded from a TOML file with sensible defaults for every field, so a
//! missing config file is not an error. `WOPR_SOCKET` and `WOPR_STATE_DIR`
//! override the file for containerized or test setups.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("config file {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/wopr.sock")
}

fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .map_or_else(|| PathBuf::from("/tmp/wopr"), |dir| dir.join("wopr"))
}

fn default_num_leds() -> usize {
    17
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_stop_timeout_ms() -> u64 {
    2000
}

fn default_alert_capacity() -> usize {
    crate::alert::DEFAULT_ALERT_CAPACITY
}

/// Daemon configuration document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WoprConfig {
    /// Control socket path.
    pub socket_path: PathBuf,
    /// Directory for the persistence store.
    pub state_dir: PathBuf,
    /// Number of LEDs on the strip.
    pub num_leds: usize,
    /// Hook polling cadence in milliseconds.
    pub poll_interval_ms: u64,
    /// Grace period for pattern cancellation in milliseconds.
    pub stop_timeout_ms: u64,
    /// Alert channel capacity per pattern run.
    pub alert_capacity: usize,
    /// Patterns started at boot, in order; the last one wins the strip.
    pub startup_patterns: Vec<String>,
    /// Hook links applied at boot, merged with the persisted store.
    pub hook_links: BTreeMap<String, String>,
}

impl Default for WoprConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            state_dir: default_state_dir(),
            num_leds: default_num_leds(),
            poll_interval_ms: default_poll_interval_ms(),
            stop_timeout_ms: default_stop_timeout_ms(),
            alert_capacity: default_alert_capacity(),
            startup_patterns: Vec::new(),
            hook_links: BTreeMap::new(),
        }
    }
}

impl WoprConfig {
    /// Default config file location, `~/.config/wopr/wopr.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wopr").join("wopr.toml"))
    }

    /// Load configuration, falling back to defaults when no file exists.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(Self::default_path, |p| Some(p.to_path_buf()));
        let mut config = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io {
                        path: path.clone(),
                        source,
                    })?;
                let config: Self = toml::from_str(&text)?;
                debug!(path = %path.display(), "loaded config file");
                config
            }
            _ => Self::default(),
        };

        if let Ok(socket) = std::env::var("WOPR_SOCKET") {
            config.socket_path = PathBuf::from(socket);
        }
        if let Ok(state_dir) = std::env::var("WOPR_STATE_DIR") {
            config.state_dir = PathBuf::from(state_dir);
        }
        Ok(config)
    }

    /// Hook polling cadence as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Pattern stop grace period as a [`Duration`].
    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = WoprConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.num_leds, 17);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.stop_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn partial_files_keep_defaults_for_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wopr.toml");
        std::fs::write(
            &path,
            r#"
num_leds = 60
startup_patterns = ["Knight Rider"]

[hook_links]
cpu_over_50 = "Loading Bar"
"#,
        )
        .unwrap();

        let config = WoprConfig::load(Some(&path)).unwrap();
        assert_eq!(config.num_leds, 60);
        assert_eq!(config.startup_patterns, vec!["Knight Rider".to_string()]);
        assert_eq!(
            config.hook_links.get("cpu_over_50").map(String::as_str),
            Some("Loading Bar")
        );
        assert_eq!(config.alert_capacity, crate::alert::DEFAULT_ALERT_CAPACITY);
    }

    #[test]
    fn malformed_files_report_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wopr.toml");
        std::fs::write(&path, "num_leds = \"lots\"").unwrap();

        assert!(matches!(
            WoprConfig::load(Some(&path)),
            Err(ConfigError::Parse(_))
        ));
    }
}
