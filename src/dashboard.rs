// File: dashboard.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{NaiveDateTime, TimeDelta};
use log::warn;
use serde::Serialize;
use serde_json::Map;

use crate::bitnodes::{fetch_node_snapshot, peers, reported_total};
use crate::cache::SnapshotCache;
use crate::config::{ComparisonBaseline, ConfigParameter};
use crate::errors::FetchResult;
use crate::fetcher::Fetcher;
use crate::getstate::GetState;
use crate::price::{fetch_price, PriceQuote};
use crate::signals::{evaluate, nearest_previous, recent_tor_series, SignalReport, TorSeriesPoint};
use crate::storage::{timestamp_now, HistoryLog, NodeSnapshotRecord};

pub const TOR_CHART_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize)]
pub struct NetworkView {
    pub current: NodeSnapshotRecord,
    pub reported_total: Option<u64>,
    pub previous: Option<NodeSnapshotRecord>,
    pub signals: SignalReport,
    pub tor_series: Vec<TorSeriesPoint>,
    pub data_points: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub generated_at: NaiveDateTime,
    pub price: Option<PriceQuote>,
    /// Absent when no node snapshot could be obtained.
    pub network: Option<NetworkView>,
    pub requests: GetState,
}

/// One refresh cycle over explicit fetcher, cache and history handles.
#[derive(Debug)]
pub struct Dashboard {
    config: ConfigParameter,
    fetcher: Fetcher,
    cache: SnapshotCache,
    history: HistoryLog,
}

impl Dashboard {
    pub fn new(config: ConfigParameter) -> FetchResult<Self> {
        let fetcher = Fetcher::new(&config)?;
        let cache = SnapshotCache::new(config.cache_path(), config.cache_duration());
        let history = HistoryLog::new(config.history_path(), config.max_data_points());
        Ok(Self {
            config,
            fetcher,
            cache,
            history,
        })
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub async fn refresh(&mut self, include_price: bool) -> DashboardView {
        self.refresh_at(timestamp_now(), include_price).await
    }

    pub async fn refresh_at(&mut self, now: NaiveDateTime, include_price: bool) -> DashboardView {
        let endpoints = self.config.endpoints().clone();

        let price = if include_price {
            fetch_price(&mut self.fetcher, &endpoints).await
        } else {
            None
        };

        let network = match fetch_node_snapshot(&mut self.fetcher, &self.cache, &endpoints).await {
            Some(payload) => {
                let empty = Map::new();
                let nodes = peers(&payload).unwrap_or_else(|| {
                    warn!("Bitnodes snapshot has no nodes map");
                    &empty
                });
                let current =
                    NodeSnapshotRecord::capture(now, nodes, self.config.sample_size());
                Some(self.update_history(current, reported_total(&payload), now))
            }
            None => None,
        };

        DashboardView {
            generated_at: now,
            price,
            network,
            requests: *self.fetcher.state(),
        }
    }

    fn update_history(
        &self,
        current: NodeSnapshotRecord,
        reported_total: Option<u64>,
        now: NaiveDateTime,
    ) -> NetworkView {
        let mut records = self.history.load();
        let previous = select_baseline(&records, &current, self.config.baseline(), now);
        let signals = evaluate(&current, previous.as_ref(), &self.config.rules());

        records.push(current.clone());
        let retained = self.history.append_and_save(records);
        let tor_series =
            recent_tor_series(&retained, now, TimeDelta::hours(TOR_CHART_WINDOW_HOURS));

        NetworkView {
            current,
            reported_total,
            previous,
            signals,
            tor_series,
            data_points: retained.len(),
        }
    }
}

/// Picks the record the fresh snapshot is compared against. Lookback runs the
/// nearest-time search over the history with `current` appended, so the
/// fresh record itself is never its own baseline.
pub fn select_baseline(
    history: &[NodeSnapshotRecord],
    current: &NodeSnapshotRecord,
    baseline: ComparisonBaseline,
    now: NaiveDateTime,
) -> Option<NodeSnapshotRecord> {
    match baseline {
        ComparisonBaseline::Latest => history.last().cloned(),
        ComparisonBaseline::Lookback { hours } => {
            let Some(target) =
                TimeDelta::try_hours(hours).and_then(|offset| now.checked_sub_signed(offset))
            else {
                warn!("Lookback of {} hours is out of range, no baseline", hours);
                return None;
            };
            let mut candidates = history.to_vec();
            candidates.push(current.clone());
            nearest_previous(&candidates, target).cloned()
        }
    }
}
