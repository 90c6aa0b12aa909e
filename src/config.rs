//! Application configuration at `~/.skiplan/config.toml`.

use crate::persistence::{CalendarStore, JsonFileStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.toml";
const JSON_STORE_FILE_NAME: &str = "calendar-data.json";
const SQLITE_STORE_FILE_NAME: &str = "calendar.sqlite3";

/// Root directory for skiplan state: `~/.skiplan/`.
pub fn global_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".skiplan"))
}

/// Path to the config file: `~/.skiplan/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    global_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown store backend '{0}' (expected json or sqlite)")]
    UnknownBackend(String),
    #[error("could not determine home directory")]
    NoHomeDir,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Json,
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => JSON_STORE_FILE_NAME,
            Self::Sqlite => SQLITE_STORE_FILE_NAME,
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Store location. Defaults to a file under `~/.skiplan/`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    /// Dataset used when the store is empty.
    pub seed_path: Option<PathBuf>,
    /// Where `export` writes when no path is given.
    pub export_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Like `load_from`, but a missing file yields defaults. A file that
    /// exists and fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save to a specific path (creates parent directories).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolved store location.
    pub fn data_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        global_dir()
            .map(|d| d.join(self.store.backend.default_file_name()))
            .ok_or(ConfigError::NoHomeDir)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Open the configured backend.
    pub fn open_store(&self) -> Result<Box<dyn CalendarStore>, OpenStoreError> {
        let path = self.data_path()?;
        Ok(open_store(self.store.backend, &path)?)
    }
}

#[derive(Debug, Error)]
pub enum OpenStoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] crate::persistence::PersistenceError),
    #[error("store backend '{0}' is not enabled in this build")]
    BackendDisabled(StoreBackend),
}

fn open_store(
    backend: StoreBackend,
    path: &Path,
) -> Result<Box<dyn CalendarStore>, OpenStoreError> {
    match backend {
        StoreBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StoreBackend::Sqlite => open_sqlite(path),
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(path: &Path) -> Result<Box<dyn CalendarStore>, OpenStoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    let store = crate::persistence::SqliteCalendarStore::new(path)?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_path: &Path) -> Result<Box<dyn CalendarStore>, OpenStoreError> {
    Err(OpenStoreError::BackendDisabled(StoreBackend::Sqlite))
}
