// File: stats.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use chrono::NaiveDateTime;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{check_format, format_thousands, print_info, print_warning};
use crate::analysis::NodeType;
use crate::cli::StatsArgs;
use crate::storage::{HistoryLog, NodeSnapshotRecord};

pub async fn execute(args: &StatsArgs, log: &HistoryLog) -> Result<()> {
    let format = check_format(&args.format, &["table", "json"])?;
    print_info("Generating history statistics...");

    let records = log.load();
    let Some(stats) = HistoryStats::from_records(&records, args.top_n) else {
        print_warning("No snapshot history recorded yet");
        return Ok(());
    };

    match format.as_str() {
        "table" => display_stats_table(&stats, log),
        _ => println!("{}", serde_json::to_string_pretty(&stats)?),
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct HistoryStats {
    data_points: usize,
    first: NaiveDateTime,
    last: NaiveDateTime,
    tor_min: f64,
    tor_max: f64,
    tor_mean: f64,
    nodes_min: u64,
    nodes_max: u64,
    latest_node_types: BTreeMap<NodeType, u64>,
    latest_top_versions: Vec<(String, u64)>,
}

impl HistoryStats {
    fn from_records(records: &[NodeSnapshotRecord], top_n: usize) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let tor_min = records
            .iter()
            .map(|r| r.tor_percentage)
            .fold(f64::INFINITY, f64::min);
        let tor_max = records
            .iter()
            .map(|r| r.tor_percentage)
            .fold(f64::NEG_INFINITY, f64::max);
        let tor_mean =
            records.iter().map(|r| r.tor_percentage).sum::<f64>() / records.len() as f64;

        let nodes_min = records.iter().map(|r| r.total_nodes).min().unwrap_or(0);
        let nodes_max = records.iter().map(|r| r.total_nodes).max().unwrap_or(0);

        let latest_analysis = records.iter().rev().find_map(|r| r.node_analysis.as_ref());
        let latest_node_types = latest_analysis
            .map(|a| a.node_types.clone())
            .unwrap_or_default();
        let latest_top_versions = latest_analysis
            .map(|a| {
                a.top_versions(top_n)
                    .into_iter()
                    .map(|(v, c)| (v.to_string(), c))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            data_points: records.len(),
            first: first.timestamp,
            last: last.timestamp,
            tor_min,
            tor_max,
            tor_mean,
            nodes_min,
            nodes_max,
            latest_node_types,
            latest_top_versions,
        })
    }
}

fn display_stats_table(stats: &HistoryStats, log: &HistoryLog) {
    println!();
    println!("{}", "═".repeat(60).bright_black());
    println!("{:^60}", "HISTORY STATISTICS".bold().bright_white());
    println!("{}", "═".repeat(60).bright_black());

    println!(
        "  {:<20} {} / {}",
        "Data Points".bold(),
        stats.data_points,
        log.max_data_points()
    );
    println!(
        "  {:<20} {} → {}",
        "Time Span".bold(),
        stats.first.format("%Y-%m-%d %H:%M"),
        stats.last.format("%Y-%m-%d %H:%M")
    );
    println!(
        "  {:<20} min {:.2}%  max {:.2}%  mean {:.2}%",
        "Tor Share".bold(),
        stats.tor_min,
        stats.tor_max,
        stats.tor_mean
    );
    println!(
        "  {:<20} {} – {}",
        "Node Count".bold(),
        format_thousands(stats.nodes_min as f64, 0),
        format_thousands(stats.nodes_max as f64, 0)
    );

    if !stats.latest_node_types.is_empty() {
        println!();
        println!("  {}", "Latest Node Types".bold());
        for (node_type, count) in &stats.latest_node_types {
            println!("    {:<10} {}", node_type.to_string().cyan(), count);
        }
    }

    if !stats.latest_top_versions.is_empty() {
        println!();
        println!("  {}", "Latest Client Versions".bold());
        for (version, count) in &stats.latest_top_versions {
            println!("    {:<24} {}", format!("v{}", version), count);
        }
    }
}
