// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    BiasPolarity, BiasRule, ComparisonBaseline, ConfigParameter, SignalRules,
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, MAX_LOOKBACK_HOURS,
};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, help = "Directory holding the cache and history files")]
    pub data_dir: Option<PathBuf>,

    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[arg(long = "no-color", help = "Disable colored output", global = true)]
    pub no_color: bool,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true,
        help = "HTTP request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        long = "retries",
        default_value_t = DEFAULT_MAX_RETRIES,
        global = true,
        help = "Attempts per upstream request"
    )]
    pub retries: u32,

    #[arg(
        long = "backoff-ms",
        default_value_t = DEFAULT_BACKOFF_BASE_MS,
        global = true,
        help = "Delay before the second attempt, doubled for each further attempt"
    )]
    pub backoff_ms: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Dashboard(DashboardArgs),
    History(HistoryArgs),
    Stats(StatsArgs),
    Clean(CleanArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BiasMode {
    Percentage,
    Fraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Polarity {
    RisingBearish,
    RisingBullish,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    #[arg(long = "format", default_value = "text")]
    pub format: String,

    #[arg(long = "no-price", help = "Skip the BTC price lookup")]
    pub no_price: bool,

    #[arg(
        long = "lookback-hours",
        value_parser = clap::value_parser!(i64).range(1..=MAX_LOOKBACK_HOURS),
        help = "Compare against the snapshot closest to N hours ago instead of the latest one"
    )]
    pub lookback_hours: Option<i64>,

    #[arg(long = "bias-mode", value_enum, help = "Tor trend as percentage or fraction")]
    pub bias_mode: Option<BiasMode>,

    #[arg(long = "bias-threshold", help = "Trend magnitude that counts as a bias")]
    pub bias_threshold: Option<f64>,

    #[arg(long = "bias-polarity", value_enum)]
    pub bias_polarity: Option<Polarity>,

    #[arg(long = "signal-threshold", help = "Network signal magnitude for BUY/SELL")]
    pub signal_threshold: Option<f64>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(short = 'l', long = "limit", default_value_t = 20)]
    pub limit: usize,

    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(long = "format", default_value = "table")]
    pub format: String,

    #[arg(long = "top-n", default_value_t = 10)]
    pub top_n: usize,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[arg(long = "cache", help = "Remove the snapshot cache")]
    pub cache: bool,

    #[arg(long = "history", help = "Remove the snapshot history")]
    pub history: bool,

    #[arg(long = "confirm", help = "Confirm deletion without interactive prompt")]
    pub confirm: bool,
}

impl Cli {
    pub fn to_config(&self) -> ConfigParameter {
        let mut config = ConfigParameter::new();
        if let Some(ref dir) = self.data_dir {
            config.set_data_dir(dir.clone());
        }
        config.set_timeout(self.timeout);
        config.set_max_retries(self.retries);
        config.set_backoff_base_ms(self.backoff_ms);
        config
    }
}

impl Default for DashboardArgs {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            no_price: false,
            lookback_hours: None,
            bias_mode: None,
            bias_threshold: None,
            bias_polarity: None,
            signal_threshold: None,
        }
    }
}

impl DashboardArgs {
    /// Starts from the default rule set; a `fraction` mode switches to the
    /// fractional rule before explicit threshold and polarity overrides.
    pub fn signal_rules(&self) -> SignalRules {
        let mut rules = SignalRules::default();

        if self.bias_mode == Some(BiasMode::Fraction) {
            rules.bias = BiasRule::fractional();
        }
        if let Some(threshold) = self.bias_threshold {
            rules.bias.threshold = threshold.abs();
        }
        if let Some(polarity) = self.bias_polarity {
            rules.bias.polarity = match polarity {
                Polarity::RisingBearish => BiasPolarity::RisingIsBearish,
                Polarity::RisingBullish => BiasPolarity::RisingIsBullish,
            };
        }
        if let Some(threshold) = self.signal_threshold {
            rules.network_threshold = threshold.abs();
        }
        rules
    }

    pub fn baseline(&self) -> ComparisonBaseline {
        match self.lookback_hours {
            Some(hours) if hours > 0 => ComparisonBaseline::Lookback { hours },
            _ => ComparisonBaseline::Latest,
        }
    }

    pub fn apply(&self, config: &mut ConfigParameter) {
        config.set_rules(self.signal_rules());
        config.set_baseline(self.baseline());
    }
}
