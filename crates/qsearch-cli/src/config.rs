//! Layered configuration for the `qsearch` binary.
//!
//! Precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`QSEARCH_` prefix)
//! 3. Configuration file (YAML)
//! 4. Default values
//!
//! The file is taken from `--config`, else `$QSEARCH_CONFIG`, else
//! `~/.qsearch/config.yaml` when it exists.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use qsearch_grover::MAX_SEARCH_QUBITS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Search parameters.
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to search for and how many shots to take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Number of search qubits.
    #[serde(default = "default_qubits")]
    pub qubits: u32,
    /// Index the oracle marks.
    #[serde(default = "default_marked")]
    pub marked: u64,
    /// Number of shots.
    #[serde(default = "default_shots")]
    pub shots: u32,
    /// Sampler seed; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `qsearch_grover=debug`.
    #[serde(default)]
    pub level: Option<String>,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Console,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'console' or 'json', got '{other}'")),
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub qubits: Option<u32>,
    pub marked: Option<u64>,
    pub shots: Option<u32>,
    pub seed: Option<u64>,
}

fn default_qubits() -> u32 {
    2
}

fn default_marked() -> u64 {
    2
}

fn default_shots() -> u32 {
    1024
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            qubits: default_qubits(),
            marked: default_marked(),
            shots: default_shots(),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve every layer below the command line from the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Resolve defaults, file and environment using `env` for variable lookup.
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = match config_path(explicit, &env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.merge_env(&env)
    }

    /// Apply environment variable overrides.
    ///
    /// Unset variables leave values unchanged; malformed ones are errors.
    pub fn merge_env(mut self, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = parse_env(&env, "QSEARCH_QUBITS")? {
            self.search.qubits = v;
        }
        if let Some(v) = parse_env(&env, "QSEARCH_MARKED")? {
            self.search.marked = v;
        }
        if let Some(v) = parse_env(&env, "QSEARCH_SHOTS")? {
            self.search.shots = v;
        }
        if let Some(v) = parse_env(&env, "QSEARCH_SEED")? {
            self.search.seed = Some(v);
        }
        if let Some(v) = env("QSEARCH_LOG_LEVEL") {
            self.logging.level = Some(v);
        }
        if let Some(v) = parse_env(&env, "QSEARCH_LOG_FORMAT")? {
            self.logging.format = v;
        }
        Ok(self)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(v) = overrides.qubits {
            self.search.qubits = v;
        }
        if let Some(v) = overrides.marked {
            self.search.marked = v;
        }
        if let Some(v) = overrides.shots {
            self.search.shots = v;
        }
        if let Some(v) = overrides.seed {
            self.search.seed = Some(v);
        }
        self
    }

    /// Validate the fully resolved configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let qubits = self.search.qubits;
        if qubits == 0 || qubits > MAX_SEARCH_QUBITS {
            return Err(ConfigError::Validation(format!(
                "search.qubits must be between 1 and {MAX_SEARCH_QUBITS}, got {qubits}"
            )));
        }
        if self.search.shots == 0 {
            return Err(ConfigError::Validation("search.shots must be at least 1".into()));
        }
        Ok(())
    }
}

/// Pick the config file: explicit path, then `$QSEARCH_CONFIG`, then the home default.
fn config_path(explicit: Option<&Path>, env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env("QSEARCH_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(".qsearch").join("config.yaml"))
        .filter(|path| path.is_file())
}

fn parse_env<T>(
    env: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = env(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidEnv {
            var,
            value,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_match_demonstration() {
        let config = Config::default();
        assert_eq!(config.search.qubits, 2);
        assert_eq!(config.search.marked, 2);
        assert_eq!(config.search.shots, 1024);
        assert_eq!(config.search.seed, None);
        assert_eq!(config.logging.format, LogFormat::Console);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_yaml("search:\n  shots: 4096\nlogging:\n  format: json\n");
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.search.shots, 4096);
        assert_eq!(config.search.qubits, 2);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_yaml("search:\n  qbits: 3\n");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load_with(Some(Path::new("/nonexistent/qsearch.yaml")), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_precedence_flag_over_env_over_file() {
        let file = write_yaml("search:\n  qubits: 3\n  marked: 5\n  shots: 100\n  seed: 1\n");
        let env = env_from(&[("QSEARCH_MARKED", "6"), ("QSEARCH_SHOTS", "200")]);

        let config = Config::load_with(Some(file.path()), env)
            .unwrap()
            .with_overrides(&Overrides {
                shots: Some(300),
                ..Overrides::default()
            });

        assert_eq!(config.search.qubits, 3); // file
        assert_eq!(config.search.marked, 6); // env over file
        assert_eq!(config.search.shots, 300); // flag over env
        assert_eq!(config.search.seed, Some(1)); // file
    }

    #[test]
    fn test_config_path_from_env() {
        let file = write_yaml("search:\n  qubits: 4\n");
        let path = file.path().to_string_lossy().into_owned();
        let env = env_from(&[("QSEARCH_CONFIG", path.as_str())]);
        let config = Config::load_with(None, env).unwrap();
        assert_eq!(config.search.qubits, 4);
    }

    #[test]
    fn test_malformed_env_is_error() {
        let err = Config::default()
            .merge_env(env_from(&[("QSEARCH_SHOTS", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: "QSEARCH_SHOTS",
                ..
            }
        ));

        let err = Config::default()
            .merge_env(env_from(&[("QSEARCH_LOG_FORMAT", "xml")]))
            .unwrap_err();
        assert!(err.to_string().contains("QSEARCH_LOG_FORMAT"));
    }

    #[test]
    fn test_env_logging() {
        let config = Config::default()
            .merge_env(env_from(&[
                ("QSEARCH_LOG_LEVEL", "debug"),
                ("QSEARCH_LOG_FORMAT", "JSON"),
                ("QSEARCH_SEED", " 42 "),
            ]))
            .unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.search.seed, Some(42));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.search.qubits = 0;
        assert!(config.validate().is_err());

        config.search.qubits = 64;
        assert!(config.validate().is_err());

        config.search.qubits = 2;
        config.search.shots = 0;
        assert!(config.validate().is_err());
    }
}
