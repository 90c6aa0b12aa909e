use super::{CalendarStore, PersistenceResult};
use crate::migration::Migrated;
use crate::state::CalendarState;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name offered for exports.
pub const EXPORT_FILE_NAME: &str = "calendar-data.json";

/// Stores the blob as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CalendarStore for JsonFileStore {
    /// A missing or blank file reads as an empty store.
    fn read(&self) -> PersistenceResult<Option<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Writes next to the target and renames over it, so readers never see
    /// a half-written file.
    fn write(&self, blob: &Value) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.staging_path();
        let result = write_staged(&staging, blob).and_then(|()| {
            fs::rename(&staging, &self.path)?;
            Ok(())
        });
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }
}

fn write_staged(staging: &Path, blob: &Value) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(staging)?);
    serde_json::to_writer(&mut writer, blob)?;
    writer.flush()?;
    Ok(())
}

pub fn state_to_pretty_json(state: &CalendarState) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parse an uploaded document and bring it to the current schema.
pub fn parse_state_json(text: &str) -> PersistenceResult<Migrated> {
    let blob: Value = serde_json::from_str(text)?;
    super::state_from_blob(&blob)
}

pub fn export_state_to_json<P: AsRef<Path>>(
    state: &CalendarState,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, state)?;
    writer.flush()?;
    Ok(())
}

pub fn import_state_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Migrated> {
    let file = File::open(path)?;
    let blob: Value = serde_json::from_reader(BufReader::new(file))?;
    super::state_from_blob(&blob)
}
