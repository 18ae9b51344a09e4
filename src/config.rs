// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use dirs::data_local_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CACHE_DURATION_SECS: u64 = 600;
/// Seven days of ten-minute samples.
pub const DEFAULT_MAX_DATA_POINTS: usize = 1008;
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 2000;
pub const DEFAULT_NETWORK_THRESHOLD: f64 = 0.01;
/// Ten years, well inside chrono's representable range.
pub const MAX_LOOKBACK_HOURS: i64 = 87_600;

pub const CACHE_FILE_NAME: &str = "bitnodes_cache.json";
pub const HISTORY_FILE_NAME: &str = "network_data.json";

/// How a Tor trend is expressed before it is compared against a bias threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendRepresentation {
    /// `100 * (current - previous) / previous`
    Percentage,
    /// `(current - previous) / previous`
    Fraction,
}

/// Which market direction a rising Tor share is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BiasPolarity {
    RisingIsBearish,
    RisingIsBullish,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasRule {
    pub representation: TrendRepresentation,
    pub threshold: f64,
    pub polarity: BiasPolarity,
}

impl BiasRule {
    /// The alternate reading: a fractional trend against +/-0.001, rising Tor usage bullish.
    pub fn fractional() -> Self {
        Self {
            representation: TrendRepresentation::Fraction,
            threshold: 0.001,
            polarity: BiasPolarity::RisingIsBullish,
        }
    }
}

impl Default for BiasRule {
    fn default() -> Self {
        Self {
            representation: TrendRepresentation::Percentage,
            threshold: 1.0,
            polarity: BiasPolarity::RisingIsBearish,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRules {
    pub bias: BiasRule,
    pub network_threshold: f64,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            bias: BiasRule::default(),
            network_threshold: DEFAULT_NETWORK_THRESHOLD,
        }
    }
}

/// Which stored snapshot the fresh one is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonBaseline {
    #[default]
    Latest,
    Lookback { hours: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub binance: String,
    pub coingecko: String,
    pub coinbase: String,
    pub bitnodes: String,
}

impl Endpoints {
    /// Points every provider at one base URL. Used against local mock servers.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            binance: format!("{}/binance", base),
            coingecko: format!("{}/coingecko", base),
            coinbase: format!("{}/coinbase", base),
            bitnodes: format!("{}/bitnodes", base),
        }
    }

    pub fn binance_ticker(&self) -> String {
        format!("{}/ticker/price?symbol=BTCUSDT", self.binance)
    }

    pub fn coingecko_simple_price(&self) -> String {
        format!(
            "{}/simple/price?ids=bitcoin&vs_currencies=usd",
            self.coingecko
        )
    }

    pub fn coinbase_spot(&self) -> String {
        format!("{}/prices/BTC-USD/spot", self.coinbase)
    }

    pub fn bitnodes_latest_snapshot(&self) -> String {
        format!("{}/snapshots/latest/", self.bitnodes)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            binance: "https://api.binance.com/api/v3".to_string(),
            coingecko: "https://api.coingecko.com/api/v3".to_string(),
            coinbase: "https://api.coinbase.com/v2".to_string(),
            bitnodes: "https://bitnodes.io/api/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigParameter {
    data_dir: PathBuf,
    cache_duration: u64,
    max_data_points: usize,
    sample_size: usize,
    max_retries: u32,
    timeout: u64,
    backoff_base_ms: u64,
    rules: SignalRules,
    baseline: ComparisonBaseline,
    endpoints: Endpoints,
}

impl ConfigParameter {
    pub fn new() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_duration: DEFAULT_CACHE_DURATION_SECS,
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT_SECS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            rules: SignalRules::default(),
            baseline: ComparisonBaseline::default(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        self.data_dir = data_dir;
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE_NAME)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE_NAME)
    }

    pub fn set_cache_duration(&mut self, seconds: u64) {
        self.cache_duration = seconds;
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration)
    }

    pub fn set_max_data_points(&mut self, max_data_points: usize) {
        self.max_data_points = max_data_points;
    }

    pub fn max_data_points(&self) -> usize {
        self.max_data_points
    }

    pub fn set_sample_size(&mut self, sample_size: usize) {
        self.sample_size = sample_size;
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_backoff_base_ms(&mut self, backoff_base_ms: u64) {
        self.backoff_base_ms = backoff_base_ms;
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn set_rules(&mut self, rules: SignalRules) {
        self.rules = rules;
    }

    pub fn rules(&self) -> SignalRules {
        self.rules
    }

    pub fn set_baseline(&mut self, baseline: ComparisonBaseline) {
        self.baseline = baseline;
    }

    pub fn baseline(&self) -> ComparisonBaseline {
        self.baseline
    }

    pub fn set_endpoints(&mut self, endpoints: Endpoints) {
        self.endpoints = endpoints;
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

impl Default for ConfigParameter {
    fn default() -> Self {
        Self::new()
    }
}

fn default_data_dir() -> PathBuf {
    data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nodepulse")
}
