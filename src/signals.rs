// File: signals.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Heuristic network signals. Everything here is pure: callers load the
//! history and fetch the snapshot, these functions only do arithmetic.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::analysis::sample_peers;
use crate::config::{BiasPolarity, BiasRule, SignalRules, TrendRepresentation};
use crate::storage::NodeSnapshotRecord;

/// Records scanned for the Tor chart (24 h of ten-minute samples).
pub const TOR_SERIES_SCAN: usize = 144;
/// Records used for the Tor chart when nothing falls inside the window.
pub const TOR_SERIES_FALLBACK: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketBias {
    #[serde(rename = "SELL BIAS")]
    SellBias,
    #[serde(rename = "BUY BIAS")]
    BuyBias,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

impl MarketBias {
    pub fn label(&self) -> &'static str {
        match self {
            MarketBias::SellBias => "SELL BIAS",
            MarketBias::BuyBias => "BUY BIAS",
            MarketBias::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for MarketBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkSignal {
    Buy,
    Sell,
    Sideways,
}

impl NetworkSignal {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkSignal::Buy => "BUY",
            NetworkSignal::Sell => "SELL",
            NetworkSignal::Sideways => "SIDEWAYS",
        }
    }
}

impl std::fmt::Display for NetworkSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Share of Tor peers, in percent, among the first `sample_size` peers.
pub fn tor_percentage(nodes: &Map<String, Value>, sample_size: usize) -> f64 {
    let mut sampled = 0usize;
    let mut tor = 0usize;
    for peer in sample_peers(nodes, sample_size) {
        sampled += 1;
        if peer.is_tor() {
            tor += 1;
        }
    }

    if sampled == 0 {
        return 0.0;
    }
    tor as f64 / sampled as f64 * 100.0
}

/// Relative change in percent. A zero baseline yields 0.0.
pub fn tor_trend(current: f64, previous: f64) -> f64 {
    tor_trend_with(TrendRepresentation::Percentage, current, previous)
}

pub fn tor_trend_with(representation: TrendRepresentation, current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let fraction = (current - previous) / previous;
    match representation {
        TrendRepresentation::Percentage => fraction * 100.0,
        TrendRepresentation::Fraction => fraction,
    }
}

/// Reads a percentage trend with the default rule: rising Tor usage above
/// +1.0 is bearish, falling below -1.0 is bullish.
pub fn tor_market_bias(trend: f64) -> MarketBias {
    classify_bias(trend, &BiasRule::default())
}

pub fn classify_bias(trend: f64, rule: &BiasRule) -> MarketBias {
    let (rising, falling) = match rule.polarity {
        BiasPolarity::RisingIsBearish => (MarketBias::SellBias, MarketBias::BuyBias),
        BiasPolarity::RisingIsBullish => (MarketBias::BuyBias, MarketBias::SellBias),
    };

    if trend > rule.threshold {
        rising
    } else if trend < -rule.threshold {
        falling
    } else {
        MarketBias::Neutral
    }
}

/// `active_ratio * node_growth`, or 0.0 without a usable baseline.
pub fn network_signal(current: &NodeSnapshotRecord, previous: Option<&NodeSnapshotRecord>) -> f64 {
    let Some(previous) = previous else {
        return 0.0;
    };
    if current.total_nodes == 0 || previous.total_nodes == 0 {
        return 0.0;
    }

    let current_total = current.total_nodes as f64;
    let previous_total = previous.total_nodes as f64;

    let node_growth = (current_total - previous_total) / previous_total;
    let active_ratio = current.active_nodes as f64 / current_total;

    active_ratio * node_growth
}

pub fn network_signal_label(signal: f64) -> NetworkSignal {
    network_signal_label_with(signal, crate::config::DEFAULT_NETWORK_THRESHOLD)
}

pub fn network_signal_label_with(signal: f64, threshold: f64) -> NetworkSignal {
    if signal > threshold {
        NetworkSignal::Buy
    } else if signal < -threshold {
        NetworkSignal::Sell
    } else {
        NetworkSignal::Sideways
    }
}

/// Record closest in time to `target`, never the most recent one. On an exact
/// tie the later appended record wins. Needs at least two records.
pub fn nearest_previous(
    records: &[NodeSnapshotRecord],
    target: NaiveDateTime,
) -> Option<&NodeSnapshotRecord> {
    if records.len() < 2 {
        return None;
    }

    let mut best: Option<(&NodeSnapshotRecord, TimeDelta)> = None;
    for record in &records[..records.len() - 1] {
        let distance = (record.timestamp - target).abs();
        match best {
            Some((_, best_distance)) if distance > best_distance => {}
            _ => best = Some((record, distance)),
        }
    }
    best.map(|(record, _)| record)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TorSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub tor_percentage: f64,
}

/// Points for the Tor trend chart: among the last 144 records, those no older
/// than `window`; when none qualify, the last 24 records.
pub fn recent_tor_series(
    records: &[NodeSnapshotRecord],
    now: NaiveDateTime,
    window: TimeDelta,
) -> Vec<TorSeriesPoint> {
    if records.len() < 2 {
        return Vec::new();
    }

    let cutoff = now - window;
    let scanned = &records[records.len().saturating_sub(TOR_SERIES_SCAN)..];
    let mut recent: Vec<&NodeSnapshotRecord> =
        scanned.iter().filter(|r| r.timestamp >= cutoff).collect();

    if recent.is_empty() {
        recent = records[records.len().saturating_sub(TOR_SERIES_FALLBACK)..]
            .iter()
            .collect();
    }

    recent
        .into_iter()
        .map(|r| TorSeriesPoint {
            timestamp: r.timestamp,
            tor_percentage: r.tor_percentage,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TorTrendReport {
    pub previous_tor_percentage: f64,
    pub current_tor_percentage: f64,
    pub representation: TrendRepresentation,
    pub trend: f64,
    pub bias: MarketBias,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReport {
    /// Absent when there is no baseline record.
    pub tor: Option<TorTrendReport>,
    pub network_signal: f64,
    pub network_label: NetworkSignal,
}

pub fn evaluate(
    current: &NodeSnapshotRecord,
    previous: Option<&NodeSnapshotRecord>,
    rules: &SignalRules,
) -> SignalReport {
    let tor = previous.map(|previous| {
        let trend = tor_trend_with(
            rules.bias.representation,
            current.tor_percentage,
            previous.tor_percentage,
        );
        TorTrendReport {
            previous_tor_percentage: previous.tor_percentage,
            current_tor_percentage: current.tor_percentage,
            representation: rules.bias.representation,
            trend,
            bias: classify_bias(trend, &rules.bias),
        }
    });

    let network_signal = network_signal(current, previous);
    SignalReport {
        tor,
        network_signal,
        network_label: network_signal_label_with(network_signal, rules.network_threshold),
    }
}
