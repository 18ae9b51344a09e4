// File: mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use colored::*;

use crate::cli::{CleanArgs, DashboardArgs, HistoryArgs, StatsArgs};
use crate::config::ConfigParameter;
use crate::storage::HistoryLog;

pub mod clean;
pub mod dashboard;
pub mod history;
pub mod stats;

pub async fn handle_dashboard_command(args: &DashboardArgs, config: ConfigParameter) -> Result<()> {
    dashboard::execute(args, config).await
}

pub async fn handle_history_command(args: &HistoryArgs, log: &HistoryLog) -> Result<()> {
    history::execute(args, log).await
}

pub async fn handle_stats_command(args: &StatsArgs, log: &HistoryLog) -> Result<()> {
    stats::execute(args, log).await
}

pub async fn handle_clean_command(args: &CleanArgs, config: &ConfigParameter) -> Result<()> {
    clean::execute(args, config).await
}

/// Lowercased `format` if it is one of `supported`.
fn check_format(format: &str, supported: &[&str]) -> Result<String> {
    let format = format.to_lowercase();
    if supported.contains(&format.as_str()) {
        Ok(format)
    } else {
        Err(anyhow::anyhow!(
            "Unsupported format: {} (expected one of: {})",
            format,
            supported.join(", ")
        ))
    }
}

fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn print_section(title: &str) {
    println!();
    println!("{}", title.bold().bright_white());
    println!("{}", "─".repeat(60).bright_black());
}

/// `1234567.891` -> `1,234,567.89`
fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Unicode block sparkline scaled between the series minimum and maximum.
fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[3]
            } else {
                let idx = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}
