// File: history.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use colored::*;

use super::{check_format, format_thousands, print_info, print_success, print_warning};
use crate::analysis::NodeType;
use crate::cli::HistoryArgs;
use crate::signals::tor_trend;
use crate::storage::{HistoryLog, NodeSnapshotRecord};

pub async fn execute(args: &HistoryArgs, log: &HistoryLog) -> Result<()> {
    let format = check_format(&args.format, &["table", "json"])?;
    print_info(&format!("Reading history from {}", log.path().display()));

    let records = log.load();
    if records.is_empty() {
        print_warning("No snapshot history recorded yet");
        return Ok(());
    }

    let shown = latest(&records, args.limit);
    print_success(&format!(
        "Showing {} of {} snapshots",
        shown.len(),
        records.len()
    ));

    match format.as_str() {
        "table" => display_history_table(shown),
        _ => display_history_json(shown)?,
    }

    Ok(())
}

/// The last `limit` records, oldest first.
fn latest(records: &[NodeSnapshotRecord], limit: usize) -> &[NodeSnapshotRecord] {
    &records[records.len().saturating_sub(limit)..]
}

fn display_history_table(records: &[NodeSnapshotRecord]) {
    println!();
    println!("{}", "═".repeat(80).bright_black());
    println!("{:^80}", "SNAPSHOT HISTORY".bold().bright_white());
    println!("{}", "═".repeat(80).bright_black());

    println!(
        "{:<21} {:>10} {:>8} {:>9} {:>7} {:>7}",
        "Timestamp".bold(),
        "Nodes".bold(),
        "Tor %".bold(),
        "Tor Δ".bold(),
        "IPv4".bold(),
        "IPv6".bold()
    );
    println!("{}", "─".repeat(80).bright_black());

    let mut previous: Option<&NodeSnapshotRecord> = None;
    for record in records {
        let delta = match previous {
            Some(prev) => {
                let trend = tor_trend(record.tor_percentage, prev.tor_percentage);
                let text = format!("{:+.1}%", trend);
                if trend > 1.0 {
                    text.red()
                } else if trend < -1.0 {
                    text.green()
                } else {
                    text.normal()
                }
            }
            None => "-".dimmed(),
        };

        let (ipv4, ipv6) = match record.node_analysis {
            Some(ref analysis) => (
                analysis.count(NodeType::Ipv4).to_string(),
                analysis.count(NodeType::Ipv6).to_string(),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        println!(
            "{:<21} {:>10} {:>8.2} {:>9} {:>7} {:>7}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            format_thousands(record.total_nodes as f64, 0),
            record.tor_percentage,
            delta,
            ipv4,
            ipv6
        );
        previous = Some(record);
    }
    println!("{}", "─".repeat(80).bright_black());
}

fn display_history_json(records: &[NodeSnapshotRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}
