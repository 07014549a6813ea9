use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::model::Race;

/// Why a snapshot could not be produced.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot must be a JSON array of races, found {0}")]
    Malformed(&'static str),
}

/// Read-only access to the current schedule snapshot.
///
/// Implementations are expected to return whatever is readable right now;
/// nothing is cached between calls.
pub trait SnapshotSource: Send + Sync {
    fn load(&self) -> Result<Vec<Race>, SnapshotError>;
}

/// Snapshot stored as a JSON file, re-read on every call.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSnapshot {
    fn load(&self) -> Result<Vec<Race>, SnapshotError> {
        let bytes = std::fs::read(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_snapshot(&bytes)
    }
}

/// Snapshot held in memory. Parsed on every call like the file variant.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    bytes: Vec<u8>,
}

impl InMemorySnapshot {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            bytes: value.to_string().into_bytes(),
        }
    }
}

impl SnapshotSource for InMemorySnapshot {
    fn load(&self) -> Result<Vec<Race>, SnapshotError> {
        parse_snapshot(&self.bytes)
    }
}

/// Parses a snapshot document.
///
/// The top level must be an array. Entries that do not describe a race are
/// skipped with a warning rather than failing the whole document.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Vec<Race>, SnapshotError> {
    let doc: Value = serde_json::from_slice(bytes)?;
    let entries = match doc {
        Value::Array(entries) => entries,
        other => return Err(SnapshotError::Malformed(kind_of(&other))),
    };

    let mut races = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Race>(entry) {
            Ok(race) => races.push(race),
            Err(e) => tracing::warn!(index, error = %e, "skipping malformed race entry"),
        }
    }
    Ok(races)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
