//! CLI command implementations
//!
//! Commands are organized by view:
//! - `core` - Shared utilities (load_config, load_ledger, parse_month) and categories
//! - `dashboard` - Monthly dashboard and month-to-month comparison
//! - `expenses` - Expense list and adding transactions
//! - `reports` - Monthly and statistics views

pub mod core;
pub mod dashboard;
pub mod expenses;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use dashboard::*;
pub use expenses::*;
pub use reports::*;

use anyhow::{Context, Result};
use serde::Serialize;
use spendview_core::{BudgetStatus, BudgetTier, Direction, PercentChange};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount as dollars with thousands separators ("$1,234.56")
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut whole = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            whole.push(',');
        }
        whole.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, whole, cents % 100)
}

/// Percent change with an arrow for its direction ("▲ 12.5%")
pub fn format_change(change: &PercentChange) -> String {
    let arrow = match change.direction() {
        Direction::Increase => "▲",
        Direction::Decrease => "▼",
        Direction::Flat => "–",
    };
    format!("{} {}", arrow, change)
}

pub fn tier_icon(tier: BudgetTier) -> &'static str {
    match tier {
        BudgetTier::Ok => "🟢",
        BudgetTier::Warning => "🟡",
        BudgetTier::Over => "🔴",
    }
}

/// Print the spent/remaining lines shared by the dashboard and monthly views
pub fn print_budget(status: &BudgetStatus) {
    println!("   Budget:    {:>12}", format_currency(status.budget));
    println!(
        "   Spent:     {:>12}  ({}%)",
        format_currency(status.total_spent),
        status.percentage_used
    );
    println!(
        "   Remaining: {:>12}  ({}%)  {} {}",
        format_currency(status.remaining),
        status.percentage_remaining,
        tier_icon(status.tier),
        status.tier
    );
}

/// Print any report as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")?;
    println!("{}", json);
    Ok(())
}
