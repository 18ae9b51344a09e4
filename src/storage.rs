// File: storage.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::analysis::NodeAnalysis;
use crate::errors::{StoreError, StoreResult};
use crate::signals::tor_percentage;

/// Wall-clock time as stored on disk: local and timezone-naive.
pub fn timestamp_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshotRecord {
    pub timestamp: NaiveDateTime,
    pub total_nodes: u64,
    pub active_nodes: u64,
    pub tor_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_analysis: Option<NodeAnalysis>,
}

impl NodeSnapshotRecord {
    /// Derives a record from the upstream peer map. The snapshot only lists
    /// responsive peers, so every listed peer counts as active.
    pub fn capture(timestamp: NaiveDateTime, nodes: &Map<String, Value>, sample_size: usize) -> Self {
        let total_nodes = nodes.len() as u64;
        Self {
            timestamp,
            total_nodes,
            active_nodes: total_nodes,
            tor_percentage: tor_percentage(nodes, sample_size),
            node_analysis: NodeAnalysis::from_peers(nodes, sample_size),
        }
    }
}

/// Keeps the last `cap` records, dropping the oldest.
pub fn retain_tail<T>(mut records: Vec<T>, cap: usize) -> Vec<T> {
    if records.len() > cap {
        records.drain(..records.len() - cap);
    }
    records
}

/// Reads a whole JSON document. A missing file is `Ok(None)`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Serializes into a temporary file beside `path` and renames it over `path`.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => return Err(StoreError::InvalidPath(path.display().to_string())),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    serde_json::to_writer(&mut tmp, value)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

pub(crate) fn remove_file_if_exists(path: &Path) -> StoreResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Retention-bounded snapshot history kept as one JSON array, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    max_data_points: usize,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>, max_data_points: usize) -> Self {
        Self {
            path: path.into(),
            max_data_points,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_data_points(&self) -> usize {
        self.max_data_points
    }

    pub fn try_load(&self) -> StoreResult<Vec<NodeSnapshotRecord>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Never fails: an unreadable or corrupt history loads as empty.
    pub fn load(&self) -> Vec<NodeSnapshotRecord> {
        match self.try_load() {
            Ok(records) => {
                debug!("Loaded {} history records", records.len());
                records
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable history file {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Truncates `records` to the retention cap, overwrites the file and
    /// returns what was kept. A failed write is logged, not propagated.
    pub fn append_and_save(&self, records: Vec<NodeSnapshotRecord>) -> Vec<NodeSnapshotRecord> {
        let records = retain_tail(records, self.max_data_points);
        match write_json_atomic(&self.path, &records) {
            Ok(()) => info!(
                "Saved {} history records to {}",
                records.len(),
                self.path.display()
            ),
            Err(e) => warn!("Failed to save history to {}: {}", self.path.display(), e),
        }
        records
    }

    pub fn append(&self, record: NodeSnapshotRecord) -> Vec<NodeSnapshotRecord> {
        let mut records = self.load();
        records.push(record);
        self.append_and_save(records)
    }

    pub fn clear(&self) -> StoreResult<bool> {
        remove_file_if_exists(&self.path)
    }
}
