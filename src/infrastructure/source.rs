//! Record sources: where constituent snapshots come from

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::ConstituentRecord;
use crate::infrastructure::traits::{FileSystem, RecordSource};

/// Snapshot layouts accepted on disk: a bare row array, or the
/// `{"data": [...]}` envelope a REST table export produces.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Rows(Vec<Value>),
    Envelope { data: Vec<Value> },
}

/// Reads a JSON export of the constituents table.
pub struct JsonSnapshotSource {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonSnapshotSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> io::Result<Vec<ConstituentRecord>> {
        let content = self.fs.read_to_string(&self.path)?;
        let records = parse_snapshot(&content)?;
        debug!("fetched {} rows", records.len());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Decode a snapshot row by row.
///
/// Only an unreadable document is an error. Fields of the wrong type read as
/// absent; a row that is not an object at all is kept as an empty record,
/// so it still shows up as a placeholder root.
pub fn parse_snapshot(content: &str) -> io::Result<Vec<ConstituentRecord>> {
    let snapshot: Snapshot = serde_json::from_str(content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let rows = match snapshot {
        Snapshot::Rows(rows) | Snapshot::Envelope { data: rows } => rows,
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("row {}: undecodable ({}), keeping as empty record", row, e);
                ConstituentRecord::default()
            })
        })
        .collect();
    Ok(records)
}

/// Fixed set of rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<ConstituentRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<ConstituentRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for InMemorySource {
    fn fetch(&self) -> io::Result<Vec<ConstituentRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} rows)", self.records.len())
    }
}
