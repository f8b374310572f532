//! Configuration loading and typed config structures for Lifegrid.
//!
//! The canonical configuration lives in `lifegrid-config.yaml` next to the
//! binary's working directory. Every section and field has a default, so
//! an empty or missing file yields a working server: a 5 second step, a
//! 401-cell envelope, port 8000.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::bounds::{BoundsPolicy, DEFAULT_BOUNDS};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but a value is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `lifegrid-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifegridConfig {
    /// Grid envelope.
    #[serde(default)]
    pub grid: GridConfig,

    /// Step timing.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// HTTP listener and static assets.
    #[serde(default)]
    pub server: ServerSection,

    /// Snapshot location and shutdown behavior.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifegridConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `LIFEGRID_PORT` overrides `server.port`
    /// - `LIFEGRID_SNAPSHOT_PATH` overrides `persistence.snapshot_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// The environment is not consulted; see [`Self::apply_env_overrides`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config = Self::from_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as null rather than an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with `LIFEGRID_*` environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override values from `lookup`, keyed by environment variable name.
    ///
    /// Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("LIFEGRID_PORT").and_then(|raw| raw.parse().ok()) {
            self.server.port = port;
        }
        if let Some(path) = lookup("LIFEGRID_SNAPSHOT_PATH") {
            self.persistence.snapshot_path = PathBuf::from(path);
        }
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero step interval or a zero
    /// envelope.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "scheduler.tick_interval_secs must be at least 1".to_owned(),
            });
        }
        if self.grid.bounds == 0 {
            return Err(ConfigError::Invalid {
                reason: "grid.bounds must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// The configured step interval.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.tick_interval_secs)
    }

    /// The configured envelope.
    pub const fn bounds_policy(&self) -> BoundsPolicy {
        BoundsPolicy::new(self.grid.bounds)
    }
}

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Coordinate magnitude limit: cells need `|x| < bounds` and `|y| < bounds`.
    #[serde(default = "default_bounds")]
    pub bounds: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between generations; also reported to clients by `/info`.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `index.html`, `play.html`, and `game.js`.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Whether to save the current generation when the process stops.
    #[serde(default = "default_true")]
    pub save_on_shutdown: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            save_on_shutdown: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_bounds() -> u64 {
    DEFAULT_BOUNDS
}

const fn default_tick_interval_secs() -> u64 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("lifegrid-snapshot.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LifegridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduler.tick_interval_secs, 5);
        assert_eq!(config.grid.bounds, 401);
        assert_eq!(config.tick_interval(), Duration::from_secs(5));
        assert_eq!(config.bounds_policy().limit(), 401);
        assert!(config.persistence.save_on_shutdown);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
grid:
  bounds: 64

scheduler:
  tick_interval_secs: 2

server:
  host: "127.0.0.1"
  port: 9000
  public_dir: "/srv/lifegrid"

persistence:
  snapshot_path: "/var/lib/lifegrid/cells.json"
  save_on_shutdown: false

logging:
  level: "debug"
"#;

        let config = LifegridConfig::parse(yaml).unwrap();
        assert_eq!(config.grid.bounds, 64);
        assert_eq!(config.scheduler.tick_interval_secs, 2);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.persistence.snapshot_path,
            PathBuf::from("/var/lib/lifegrid/cells.json")
        );
        assert_eq!(config.server.public_dir, PathBuf::from("/srv/lifegrid"));
        assert!(!config.persistence.save_on_shutdown);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = LifegridConfig::parse("grid:\n  bounds: 10\n").unwrap();
        assert_eq!(config.grid.bounds, 10);
        assert_eq!(config.scheduler.tick_interval_secs, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(LifegridConfig::parse("").is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let result = LifegridConfig::parse("scheduler:\n  tick_interval_secs: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_bounds_is_rejected() {
        let result = LifegridConfig::parse("grid:\n  bounds: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = LifegridConfig::parse("grid: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_port_and_snapshot_path() {
        let mut config = LifegridConfig::parse("server:\n  port: 9000\n").unwrap();
        config.apply_overrides(|key| match key {
            "LIFEGRID_PORT" => Some("9100".to_owned()),
            "LIFEGRID_SNAPSHOT_PATH" => Some("/tmp/override.json".to_owned()),
            _ => None,
        });
        assert_eq!(config.server.port, 9100);
        assert_eq!(
            config.persistence.snapshot_path,
            PathBuf::from("/tmp/override.json")
        );
    }

    #[test]
    fn unparseable_port_override_is_ignored() {
        let mut config = LifegridConfig::default();
        config.apply_overrides(|key| (key == "LIFEGRID_PORT").then(|| "eighty".to_owned()));
        assert_eq!(config.server.port, 8000);
        assert_eq!(
            config.persistence.snapshot_path,
            PathBuf::from("lifegrid-snapshot.json")
        );
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lifegrid-config.yaml");
        if path.exists() {
            let config = LifegridConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
