// File: dashboard.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::{check_format, format_thousands, print_error, print_info, print_section, sparkline};
use crate::analysis::{NodeAnalysis, NodeType};
use crate::cli::DashboardArgs;
use crate::config::{ConfigParameter, TrendRepresentation};
use crate::dashboard::{Dashboard, DashboardView, NetworkView};
use crate::signals::{MarketBias, NetworkSignal};

const TOP_VERSIONS: usize = 10;

pub async fn execute(args: &DashboardArgs, mut config: ConfigParameter) -> Result<()> {
    let format = check_format(&args.format, &["text", "json"])?;
    args.apply(&mut config);
    let mut dashboard = Dashboard::new(config).context("Failed to set up HTTP client")?;

    match format.as_str() {
        "text" => {
            let spinner = fetch_spinner();
            let view = dashboard.refresh(!args.no_price).await;
            spinner.finish_and_clear();
            display_dashboard(&view, args.no_price);
        }
        _ => {
            let view = dashboard.refresh(!args.no_price).await;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}

fn fetch_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.yellow} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Fetching latest network data...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn display_dashboard(view: &DashboardView, skipped_price: bool) {
    println!();
    println!("{}", "═".repeat(60).bright_black());
    println!("{:^60}", "₿ BITCOIN NETWORK TRACKER".bold().bright_yellow());
    println!("{}", "═".repeat(60).bright_black());

    if !skipped_price {
        print_section("Live Bitcoin Price");
        match view.price {
            Some(quote) => println!(
                "  {} {}",
                format!("${}", format_thousands(quote.usd, 2)).bold().yellow(),
                format!("via {}", quote.provider).dimmed()
            ),
            None => print_error("Unable to fetch BTC price"),
        }
    }

    let Some(network) = view.network.as_ref() else {
        println!();
        print_error("Unable to fetch Bitnodes data. Please try again later.");
        display_footer(view);
        return;
    };

    if let Some(ref analysis) = network.current.node_analysis {
        display_node_analysis(analysis);
    }
    display_tor_trend(network);
    display_network_signal(network);
    display_tor_series(network);
    display_overview(network);
    display_footer(view);
}

fn display_node_analysis(analysis: &NodeAnalysis) {
    print_section("Current Nodes Analyzer");

    println!(
        "  {:<16} {}",
        "Total Analyzed".bold(),
        format_thousands(analysis.total_nodes as f64, 0)
    );
    for node_type in [NodeType::Ipv4, NodeType::Ipv6, NodeType::Tor] {
        println!(
            "  {:<16} {:>8}  {}",
            format!("{} Nodes", node_type).bold(),
            format_thousands(analysis.count(node_type) as f64, 0),
            format!("{:.1}%", analysis.share(node_type)).cyan()
        );
    }

    let versions = analysis.top_versions(TOP_VERSIONS);
    if versions.is_empty() {
        print_info("No version data available in the current sample.");
        return;
    }

    println!();
    println!(
        "  {:<24} {:>8} {:>10}",
        "Version".bold(),
        "Nodes".bold(),
        "Share".bold()
    );
    for (version, count) in versions {
        let share = if analysis.total_nodes > 0 {
            count as f64 / analysis.total_nodes as f64 * 100.0
        } else {
            0.0
        };
        println!("  {:<24} {:>8} {:>9.1}%", format!("v{}", version), count, share);
    }
}

fn display_tor_trend(network: &NetworkView) {
    print_section("Tor Privacy Trend Analysis");

    let Some(ref tor) = network.signals.tor else {
        print_info("Collecting initial data... Refresh in 10 minutes for trend analysis.");
        return;
    };

    let trend = match tor.representation {
        TrendRepresentation::Percentage => format!("{:+.1}%", tor.trend),
        TrendRepresentation::Fraction => format!("{:+.4}", tor.trend),
    };

    println!("  {:<16} {:.1}%", "Previous Tor %".bold(), tor.previous_tor_percentage);
    println!(
        "  {:<16} {:.1}% ({})",
        "Current Tor %".bold(),
        tor.current_tor_percentage,
        trend
    );
    println!(
        "  Tor Trend: {} → Market Bias: {}",
        trend.bold(),
        colorize_bias(tor.bias)
    );
}

fn display_network_signal(network: &NetworkView) {
    print_section("Network Trend Signal");
    println!(
        "  Network Signal: {} → Trading Signal: {}",
        format!("{:+.4}", network.signals.network_signal).bold(),
        colorize_signal(network.signals.network_label)
    );
}

fn display_tor_series(network: &NetworkView) {
    print_section("Tor Privacy Metrics (24h Trend)");

    if network.tor_series.is_empty() {
        print_info("Not enough history for a trend chart yet.");
        return;
    }

    let values: Vec<f64> = network.tor_series.iter().map(|p| p.tor_percentage).collect();
    let first = network.tor_series.first().map(|p| p.timestamp);
    let last = network.tor_series.last().map(|p| p.timestamp);

    println!("  {}", sparkline(&values).red());
    if let (Some(first), Some(last)) = (first, last) {
        println!(
            "  {} → {}  ({} points)",
            first.format("%m-%d %H:%M").to_string().dimmed(),
            last.format("%m-%d %H:%M").to_string().dimmed(),
            values.len()
        );
    }
}

fn display_overview(network: &NetworkView) {
    print_section("Network Overview");
    println!(
        "  {:<16} {}",
        "Total Nodes".bold(),
        format_thousands(network.current.total_nodes as f64, 0)
    );
    if let Some(reported) = network.reported_total {
        if reported != network.current.total_nodes {
            println!(
                "  {:<16} {}",
                "Reported Total".bold(),
                format_thousands(reported as f64, 0)
            );
        }
    }
    println!(
        "  {:<16} {:.1}%",
        "Tor Nodes".bold(),
        network.current.tor_percentage
    );
    println!("  {:<16} {}", "Data Points".bold(), network.data_points);
}

fn display_footer(view: &DashboardView) {
    println!();
    println!(
        "{}",
        format!(
            "Last updated: {}  |  {} requests, {} failed",
            view.generated_at.format("%Y-%m-%d %H:%M:%S"),
            view.requests.attempts(),
            view.requests.failed_attempts()
        )
        .dimmed()
    );
}

fn colorize_bias(bias: MarketBias) -> ColoredString {
    match bias {
        MarketBias::SellBias => bias.label().red().bold(),
        MarketBias::BuyBias => bias.label().green().bold(),
        MarketBias::Neutral => bias.label().yellow().bold(),
    }
}

fn colorize_signal(signal: NetworkSignal) -> ColoredString {
    match signal {
        NetworkSignal::Buy => signal.label().green().bold(),
        NetworkSignal::Sell => signal.label().red().bold(),
        NetworkSignal::Sideways => signal.label().yellow().bold(),
    }
}
