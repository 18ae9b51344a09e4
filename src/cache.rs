// File: cache.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{NaiveDateTime, TimeDelta};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::StoreResult;
use crate::storage::{read_json, remove_file_if_exists, timestamp_now, write_json_atomic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: NaiveDateTime,
    pub data: Value,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: NaiveDateTime, ttl: TimeDelta) -> bool {
        now - self.timestamp < ttl
    }
}

type CacheFile = BTreeMap<String, CacheEntry>;

/// File-backed TTL cache for upstream payloads. Best effort: reads fail open
/// and writes fail silently.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
    ttl: TimeDelta,
}

impl SnapshotCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, timestamp_now())
    }

    pub fn get_at(&self, key: &str, now: NaiveDateTime) -> Option<Value> {
        let mut entries = match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cache unreadable, treating as miss: {}", e);
                return None;
            }
        };

        match entries.remove(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                debug!("Cache hit for {}", key);
                Some(entry.data)
            }
            Some(_) => {
                debug!("Cache entry for {} expired", key);
                None
            }
            None => {
                debug!("Cache miss for {}", key);
                None
            }
        }
    }

    pub fn set(&self, key: &str, data: &Value) {
        self.set_at(key, data, timestamp_now())
    }

    /// Rewrites the whole file with `key` replaced. An unreadable existing
    /// file is replaced rather than merged.
    pub fn set_at(&self, key: &str, data: &Value, now: NaiveDateTime) {
        let mut entries = self.try_load().unwrap_or_else(|e| {
            warn!("Replacing unreadable cache file {}: {}", self.path.display(), e);
            CacheFile::new()
        });

        entries.insert(
            key.to_string(),
            CacheEntry {
                timestamp: now,
                data: data.clone(),
            },
        );

        if let Err(e) = write_json_atomic(&self.path, &entries) {
            warn!("Failed to write cache {}: {}", self.path.display(), e);
        }
    }

    pub fn clear(&self) -> StoreResult<bool> {
        remove_file_if_exists(&self.path)
    }

    fn try_load(&self) -> StoreResult<CacheFile> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }
}
