//! Configuration loading for Corral.
//!
//! The config file is TOML, read from `$CORRAL_CONFIG` when set and from
//! `~/.corral/config.toml` otherwise. A missing file is not an error: every
//! setting has a default.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use corral_types::{PoolSize, StoreMode};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CORRAL_CONFIG";

pub const DEFAULT_WORK_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1024;
pub const DEFAULT_STATUS_DELAY_MS: u64 = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorralConfig {
    pub pool: Option<PoolConfig>,
    pub service: Option<ServiceConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Executors per batch. Default: 3.
    pub size: Option<PoolSize>,
    /// Simulated processing time per job. Default: 100.
    pub work_delay_ms: Option<u64>,
    /// Largest batch the boundary accepts. Default: 1024.
    pub max_batch_size: Option<usize>,
    /// Whether results accumulate across batches. Default: per_batch.
    #[serde(default)]
    pub store: StoreMode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Deadline for a single core call. Unset means wait indefinitely.
    pub request_timeout_ms: Option<u64>,
    /// How long the status probe's helper task takes to answer. Default: 200.
    pub status_delay_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl CorralConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let config: Self = match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Reject values that parse but make no sense.
    ///
    /// A zero pool size is already refused by [`PoolSize`] during parsing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.as_ref().and_then(|p| p.max_batch_size) == Some(0) {
            return Err(ConfigError::Invalid {
                field: "pool.max_batch_size",
                reason: "must be at least 1",
            });
        }
        if self.service.as_ref().and_then(|s| s.request_timeout_ms) == Some(0) {
            return Err(ConfigError::Invalid {
                field: "service.request_timeout_ms",
                reason: "must be at least 1; omit it to disable the deadline",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn pool_size(&self) -> PoolSize {
        self.pool.as_ref().and_then(|p| p.size).unwrap_or_default()
    }

    #[must_use]
    pub fn work_delay(&self) -> Duration {
        Duration::from_millis(
            self.pool
                .as_ref()
                .and_then(|p| p.work_delay_ms)
                .unwrap_or(DEFAULT_WORK_DELAY_MS),
        )
    }

    #[must_use]
    pub fn max_batch_size(&self) -> usize {
        self.pool
            .as_ref()
            .and_then(|p| p.max_batch_size)
            .unwrap_or(DEFAULT_MAX_BATCH_SIZE)
    }

    #[must_use]
    pub fn store_mode(&self) -> StoreMode {
        self.pool.as_ref().map(|p| p.store).unwrap_or_default()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.service
            .as_ref()
            .and_then(|s| s.request_timeout_ms)
            .map(Duration::from_millis)
    }

    #[must_use]
    pub fn status_delay(&self) -> Duration {
        Duration::from_millis(
            self.service
                .as_ref()
                .and_then(|s| s.status_delay_ms)
                .unwrap_or(DEFAULT_STATUS_DELAY_MS),
        )
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".corral").join("config.toml"))
}
