//! Spendview CLI - Personal spending dashboard
//!
//! Usage:
//!   spendview dashboard --month 2024-03    Monthly budget dashboard
//!   spendview expenses --search coffee     Search all expenses
//!   spendview stats --months 6             Category statistics
//!   spendview --data spending.csv monthly  Use your own transactions

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    let mut ledger = commands::load_ledger(cli.data.as_deref(), &config)?;

    match cli.command {
        Commands::Dashboard { month } => {
            commands::cmd_dashboard(&ledger, &config, month.as_deref(), cli.json)
        }
        Commands::Expenses {
            search,
            category,
            bucket,
        } => commands::cmd_expenses(
            &ledger,
            &config,
            search.as_deref(),
            category.as_deref(),
            bucket.as_deref(),
            cli.json,
        ),
        Commands::Monthly => commands::cmd_monthly(&ledger, &config, cli.json),
        Commands::Stats {
            months,
            month,
            category,
        } => commands::cmd_stats(
            &ledger,
            &config,
            months,
            month.as_deref(),
            category.as_deref(),
            cli.json,
        ),
        Commands::Compare { month, previous } => commands::cmd_compare(
            &ledger,
            &config,
            month.as_deref(),
            previous.as_deref(),
            cli.json,
        ),
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => commands::cmd_add(
            &mut ledger,
            &config,
            &description,
            amount,
            &category,
            date.as_deref(),
            cli.json,
        ),
        Commands::Categories => commands::cmd_categories(&config, cli.json),
    }
}
