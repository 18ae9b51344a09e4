// File: bitnodes.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, info};
use serde_json::{Map, Value};

use crate::cache::SnapshotCache;
use crate::config::Endpoints;
use crate::fetcher::Fetcher;

pub const CACHE_KEY: &str = "bitnodes";

/// Latest Bitnodes snapshot, served from `cache` while fresh. The raw payload
/// is returned untouched.
pub async fn fetch_node_snapshot(
    fetcher: &mut Fetcher,
    cache: &SnapshotCache,
    endpoints: &Endpoints,
) -> Option<Value> {
    if let Some(cached) = cache.get(CACHE_KEY).filter(|v| !is_empty_payload(v)) {
        debug!("Using cached Bitnodes snapshot");
        return Some(cached);
    }

    let payload = fetcher
        .fetch_json(&endpoints.bitnodes_latest_snapshot())
        .await?;

    info!(
        "Fetched Bitnodes snapshot with {} peers",
        peers(&payload).map_or(0, Map::len)
    );
    cache.set(CACHE_KEY, &payload);
    Some(payload)
}

/// The `nodes` map of a snapshot payload.
pub fn peers(payload: &Value) -> Option<&Map<String, Value>> {
    payload.get("nodes").and_then(Value::as_object)
}

/// Upstream's own `total_nodes` field, which may differ from the listed peers.
pub fn reported_total(payload: &Value) -> Option<u64> {
    payload.get("total_nodes").and_then(Value::as_u64)
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
