//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  Missing keys take
//! their [`SystemConfig::default`] values; the merged result is validated
//! before it is handed out.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::board;
use crate::config::SystemConfig;

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `KEGSTATUS_CONFIG`, else the board default.
    pub fn from_env() -> Self {
        let path = std::env::var_os(board::CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(board::DEFAULT_CONFIG_PATH), PathBuf::from);
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io(format!("{}: {}", self.path.display(), e)),
        })?;
        let config: SystemConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }
}

/// Load through `port`, falling back to defaults only when nothing is stored.
///
/// A file that exists but does not parse or validate is an error.
pub fn load_or_default(port: &dyn ConfigPort) -> Result<SystemConfig, ConfigError> {
    match port.load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound) => {
            warn!("No config file, using defaults");
            Ok(SystemConfig::default())
        }
        Err(e) => Err(e),
    }
}
