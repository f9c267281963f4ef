//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Load the budget/category config
//! - `load_ledger` - Load transactions from a data file or the sample dataset
//! - `parse_month` / `parse_date` / `parse_bucket` - Argument parsing helpers
//! - `cmd_categories` - List configured categories

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use spendview_core::{load_transactions, sample_transactions, Config, DateBucket, Ledger, Month};
use tracing::debug;

use super::print_json;

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load config")
}

/// Load the ledger from `--data`, or the built-in sample when not given
pub fn load_ledger(data: Option<&Path>, config: &Config) -> Result<Ledger> {
    let transactions = match data {
        Some(path) => load_transactions(path, &config.categories)
            .with_context(|| format!("Failed to load transactions from {}", path.display()))?,
        None => {
            debug!("Using built-in sample data");
            sample_transactions(&config.categories).context("Failed to load sample data")?
        }
    };

    Ledger::from_transactions(transactions).context("Invalid transaction data")
}

pub fn parse_month(s: &str) -> Result<Month> {
    s.parse::<Month>()
        .with_context(|| format!("Invalid month '{}' (use YYYY-MM)", s))
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

pub fn parse_bucket(s: &str) -> Result<DateBucket> {
    s.parse::<DateBucket>().map_err(anyhow::Error::msg)
}

#[derive(Serialize)]
struct CategoryInfo<'a> {
    label: &'a str,
    icon: &'a str,
    fallback: bool,
}

pub fn cmd_categories(config: &Config, json: bool) -> Result<()> {
    let categories = &config.categories;
    let infos: Vec<CategoryInfo> = categories
        .entries()
        .iter()
        .map(|entry| CategoryInfo {
            label: entry.category.as_str(),
            icon: categories.icon(entry.category.as_str()),
            fallback: &entry.category == categories.fallback(),
        })
        .collect();

    if json {
        return print_json(&infos);
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");
    for info in &infos {
        if info.fallback {
            println!("   {}  {} \x1b[2m(fallback)\x1b[0m", info.icon, info.label);
        } else {
            println!("   {}  {}", info.icon, info.label);
        }
    }
    println!();
    println!("   Monthly budget: {}", super::format_currency(config.budget));

    Ok(())
}
