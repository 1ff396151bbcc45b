//! Configuration for the cascade thinking server.
//!
//! Read from `~/.cascade/config.toml` (or the file named by `CASCADE_CONFIG`).
//! A missing file is not an error: every setting has a default.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use toml::de;

use cascade_types::{MAX_RECENT_LIMIT, ResponseMode};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CASCADE_CONFIG";

/// Set to `true` (any case) to silence the boxed thought log.
pub const DISABLE_THOUGHT_LOGGING_ENV: &str = "DISABLE_THOUGHT_LOGGING";

const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CascadeConfig {
    pub logging: Option<LoggingConfig>,
    pub engine: Option<EngineConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit each accepted thought as a boxed block on stderr.
    #[serde(default = "default_true")]
    pub thought_log: bool,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            thought_log: true,
            filter: None,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EngineConfig {
    /// Mode used when a call does not pass `responseMode`.
    pub response_mode: Option<ResponseMode>,
    /// Recent-thought window used when a call does not pass `recentThoughtsLimit`.
    pub recent_thoughts_limit: Option<u8>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: de::Error,
    },
    #[error("invalid config at {}: recent_thoughts_limit must not exceed 100", .path.display())]
    RecentLimit { path: PathBuf },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::RecentLimit { path } => path,
        }
    }
}

impl CascadeConfig {
    /// Load from the default location. `Ok(None)` when there is no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.recent_thoughts_limit().is_some_and(|n| n > MAX_RECENT_LIMIT) {
            return Err(ConfigError::RecentLimit {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    /// Thought logging is on unless the config or the environment turns it off.
    #[must_use]
    pub fn thought_logging_enabled(&self) -> bool {
        let configured = self.logging.as_ref().is_none_or(|l| l.thought_log);
        let disabled = env::var(DISABLE_THOUGHT_LOGGING_ENV).ok();
        configured && !thought_logging_disabled(disabled.as_deref())
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.filter.as_deref())
    }

    #[must_use]
    pub fn response_mode(&self) -> Option<ResponseMode> {
        self.engine.as_ref().and_then(|e| e.response_mode)
    }

    #[must_use]
    pub fn recent_thoughts_limit(&self) -> Option<u8> {
        self.engine.as_ref().and_then(|e| e.recent_thoughts_limit)
    }
}

/// Interpret the `DISABLE_THOUGHT_LOGGING` value: only `true`, in any case, disables.
#[must_use]
pub fn thought_logging_disabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".cascade").join("config.toml"))
}
