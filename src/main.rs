/*
Copyright 2022 Volker Schwaberow <volker@schwaberow.de>
Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including without
limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR
OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
DEALINGS IN THE SOFTWARE.
Author(s): Volker Schwaberow
*/

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::str::FromStr;

use nodepulse::cli::{Cli, Commands, DashboardArgs};
use nodepulse::commands;
use nodepulse::storage::HistoryLog;

fn init_logging(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{}', falling back to warn", level);
        LevelFilter::Warn
    });

    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
    {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.to_config();
    let history = HistoryLog::new(config.history_path(), config.max_data_points());

    match cli.command {
        Some(Commands::Dashboard(ref args)) => {
            commands::handle_dashboard_command(args, config).await
        }
        Some(Commands::History(ref args)) => commands::handle_history_command(args, &history).await,
        Some(Commands::Stats(ref args)) => commands::handle_stats_command(args, &history).await,
        Some(Commands::Clean(ref args)) => commands::handle_clean_command(args, &config).await,
        None => commands::handle_dashboard_command(&DashboardArgs::default(), config).await,
    }
}
