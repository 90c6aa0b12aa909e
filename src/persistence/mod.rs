use crate::migration::{self, Migrated, MigrationError};
use crate::state::CalendarState;
use serde_json::Value;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not a valid configuration file: {0}")]
    InvalidConfiguration(#[from] MigrationError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(Box<dyn std::error::Error + Send + Sync>),
    #[error("store lock poisoned")]
    LockPoisoned,
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(Box::new(value))
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Opaque get/set pair holding the persisted blob. Last write wins; no
/// locking or versioning is attempted across processes.
pub trait CalendarStore {
    fn read(&self) -> PersistenceResult<Option<Value>>;
    fn write(&self, blob: &Value) -> PersistenceResult<()>;
}

impl<T: CalendarStore + ?Sized> CalendarStore for Box<T> {
    fn read(&self) -> PersistenceResult<Option<Value>> {
        (**self).read()
    }

    fn write(&self, blob: &Value) -> PersistenceResult<()> {
        (**self).write(blob)
    }
}

impl<T: CalendarStore + ?Sized> CalendarStore for &T {
    fn read(&self) -> PersistenceResult<Option<Value>> {
        (**self).read()
    }

    fn write(&self, blob: &Value) -> PersistenceResult<()> {
        (**self).write(blob)
    }
}

pub fn state_to_blob(state: &CalendarState) -> PersistenceResult<Value> {
    Ok(serde_json::to_value(state)?)
}

pub fn state_from_blob(blob: &Value) -> PersistenceResult<Migrated> {
    Ok(migration::migrate(blob)?)
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    EXPORT_FILE_NAME, JsonFileStore, export_state_to_json, import_state_from_json,
    parse_state_json, state_to_pretty_json,
};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCalendarStore;
