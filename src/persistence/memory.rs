use super::{CalendarStore, PersistenceError, PersistenceResult};
use serde_json::Value;
use std::sync::Mutex;

/// Keeps the blob in process memory. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: Value) -> Self {
        Self {
            blob: Mutex::new(Some(blob)),
        }
    }

    pub fn snapshot(&self) -> Option<Value> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CalendarStore for MemoryStore {
    fn read(&self) -> PersistenceResult<Option<Value>> {
        let guard = self.blob.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, blob: &Value) -> PersistenceResult<()> {
        let mut guard = self.blob.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        *guard = Some(blob.clone());
        Ok(())
    }
}
