use crate::calendar;
use crate::migration::Migrated;
use crate::mutation::Mutation;
use crate::persistence::{
    self, CalendarStore, EXPORT_FILE_NAME, PersistenceResult, export_state_to_json,
    import_state_from_json, parse_state_json, state_to_pretty_json,
};
use crate::state::CalendarState;
use chrono::NaiveDate;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the state a session opened with came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSource {
    Store,
    Seed,
    Default,
}

/// Owns the in-memory state for one run and mirrors every change to the
/// store. Mutations replace the whole state; a failed write is logged and
/// the in-memory result is kept.
pub struct Session<S: CalendarStore> {
    store: S,
    state: CalendarState,
    source: StateSource,
}

impl<S: CalendarStore> Session<S> {
    /// Load from the store. Only an empty store falls back, first to `seed`
    /// and then to an empty calendar for the semester around `today`.
    /// Anything that had to be migrated, seeded or defaulted is written back.
    ///
    /// A store that cannot be read, or holds a blob that does not migrate,
    /// is an error and is left as it is.
    pub fn open(store: S, seed: Option<&Value>, today: NaiveDate) -> PersistenceResult<Self> {
        if let Some(blob) = store.read()? {
            let migrated = persistence::state_from_blob(&blob)?;
            let changed = migrated.changed();
            let session = Self::adopt(store, migrated, StateSource::Store);
            if changed {
                session.persist();
            }
            return Ok(session);
        }

        if let Some(seed) = seed {
            match persistence::state_from_blob(seed) {
                Ok(migrated) => {
                    info!("store empty, starting from seed dataset");
                    let session = Self::adopt(store, migrated, StateSource::Seed);
                    session.persist();
                    return Ok(session);
                }
                Err(err) => warn!(error = %err, "seed dataset is unusable, ignoring it"),
            }
        }

        info!("store empty, starting from default calendar");
        let session = Self {
            store,
            state: CalendarState::default_for(today),
            source: StateSource::Default,
        };
        session.persist();
        Ok(session)
    }

    pub fn open_today(store: S, seed: Option<&Value>) -> PersistenceResult<Self> {
        Self::open(store, seed, calendar::today())
    }

    fn adopt(store: S, migrated: Migrated, source: StateSource) -> Self {
        Self {
            store,
            state: migrated.state,
            source,
        }
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn source(&self) -> StateSource {
        self.source
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute the next state, hand it to the store, then adopt it.
    pub fn apply(&mut self, mutation: Mutation) -> &CalendarState {
        let next = mutation.apply(&self.state);
        debug!(op = mutation.name(), "applied mutation");
        self.replace(next);
        &self.state
    }

    /// Replace the whole state with an uploaded document. On any parse or
    /// migration error the current state is left untouched.
    pub fn import_json(&mut self, text: &str) -> PersistenceResult<&CalendarState> {
        let migrated = parse_state_json(text)?;
        info!(migrated = migrated.changed(), "imported calendar document");
        self.replace(migrated.state);
        Ok(&self.state)
    }

    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> PersistenceResult<&CalendarState> {
        let migrated = import_state_from_json(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            migrated = migrated.changed(),
            "imported calendar file"
        );
        self.replace(migrated.state);
        Ok(&self.state)
    }

    pub fn export_json(&self) -> PersistenceResult<String> {
        state_to_pretty_json(&self.state)
    }

    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<()> {
        export_state_to_json(&self.state, path)
    }

    /// Export under the standard file name inside `dir`.
    pub fn export_to_dir<P: AsRef<Path>>(&self, dir: P) -> PersistenceResult<PathBuf> {
        let path = dir.as_ref().join(EXPORT_FILE_NAME);
        self.export_to(&path)?;
        Ok(path)
    }

    /// Re-read the store. An empty store keeps the current state.
    pub fn reload(&mut self) -> PersistenceResult<&CalendarState> {
        if let Some(blob) = self.store.read()? {
            let migrated = persistence::state_from_blob(&blob)?;
            if migrated.changed() {
                self.replace(migrated.state);
            } else {
                self.state = migrated.state;
            }
        }
        Ok(&self.state)
    }

    fn replace(&mut self, next: CalendarState) {
        self.state = next;
        self.persist();
    }

    fn persist(&self) {
        let result =
            persistence::state_to_blob(&self.state).and_then(|blob| self.store.write(&blob));
        if let Err(err) = result {
            warn!(error = %err, "failed to persist calendar state");
        }
    }
}
