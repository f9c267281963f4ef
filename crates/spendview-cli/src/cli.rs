//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendview - See where your money goes each month
#[derive(Parser)]
#[command(name = "spendview")]
#[command(about = "Personal spending dashboard and monthly budget tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transaction data file (.json or .csv)
    ///
    /// When omitted, the built-in sample dataset (August 2023 to March 2024)
    /// is used.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file (budget and categories)
    ///
    /// Defaults to ~/.config/spendview/config.toml if present, otherwise the
    /// built-in configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the monthly dashboard (budget, categories, daily spending)
    Dashboard {
        /// Month to show (YYYY-MM, defaults to the latest month with data)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List all expenses with optional search and category filter
    Expenses {
        /// Case-insensitive search in descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Also sum the listed expenses per day or month
        #[arg(short, long, value_name = "day|month")]
        bucket: Option<String>,
    },

    /// Show expenses grouped by month with budget status
    Monthly,

    /// Show category statistics across months
    Stats {
        /// Number of months to include
        #[arg(short = 'n', long, default_value = "6")]
        months: usize,

        /// Last month of the window (YYYY-MM, defaults to the latest month with data)
        #[arg(short, long)]
        month: Option<String>,

        /// Only show this category's row
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Compare spending between two months
    Compare {
        /// Current month (YYYY-MM, defaults to the latest month with data)
        #[arg(short, long)]
        month: Option<String>,

        /// Month to compare against (YYYY-MM, defaults to the month before)
        #[arg(short, long)]
        previous: Option<String>,
    },

    /// Add a transaction and show the updated budget status
    ///
    /// The transaction is kept for this run only; data files are never
    /// modified.
    Add {
        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Amount spent
        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// Category label (see `spendview categories`)
        #[arg(short, long)]
        category: String,

        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List configured categories
    Categories,
}
