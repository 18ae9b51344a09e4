// File: clean.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use colored::*;
use std::io::{self, Write};
use std::path::Path;

use super::{print_info, print_success, print_warning};
use crate::cache::SnapshotCache;
use crate::cli::CleanArgs;
use crate::config::ConfigParameter;
use crate::storage::HistoryLog;

pub async fn execute(args: &CleanArgs, config: &ConfigParameter) -> Result<()> {
    if !args.cache && !args.history {
        return Err(anyhow::anyhow!(
            "Nothing selected. Use --cache, --history or both"
        ));
    }

    let cache = SnapshotCache::new(config.cache_path(), config.cache_duration());
    let history = HistoryLog::new(config.history_path(), config.max_data_points());

    let mut targets: Vec<&Path> = Vec::new();
    if args.cache {
        targets.push(cache.path());
    }
    if args.history {
        targets.push(history.path());
    }

    if !args.confirm && !confirm_deletion(&targets)? {
        print_warning("Operation cancelled by user");
        return Ok(());
    }

    if args.cache {
        report_removal(
            "snapshot cache",
            cache.clear().context("Failed to remove cache file")?,
        );
    }
    if args.history {
        report_removal(
            "snapshot history",
            history.clear().context("Failed to remove history file")?,
        );
    }

    Ok(())
}

fn report_removal(what: &str, removed: bool) {
    if removed {
        print_success(&format!("Removed {}", what));
    } else {
        print_info(&format!("No {} to remove", what));
    }
}

fn confirm_deletion(targets: &[&Path]) -> Result<bool> {
    println!();
    print_warning("This operation will permanently delete local data!");
    for target in targets {
        println!("  {}", target.display().to_string().red());
    }
    println!();

    loop {
        print!("Are you sure you want to continue? [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => {
                println!("Please enter 'y' for yes or 'n' for no");
            }
        }
    }
}
