//! Dashboard and month comparison commands

use anyhow::Result;
use spendview_core::{compare_transactions, Config, DashboardReport, Ledger, PeriodComparison};

use super::{format_change, format_currency, parse_month, print_budget, print_json, truncate};

pub fn cmd_dashboard(
    ledger: &Ledger,
    config: &Config,
    month: Option<&str>,
    json: bool,
) -> Result<()> {
    let month = month.map(parse_month).transpose()?;
    let report = DashboardReport::build(ledger, config, month)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💰 Spending Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("   {}", report.month_label);
    println!("   ─────────────────────────────────────────────────────────────");
    print_budget(&report.budget);

    if report.transactions.is_empty() {
        println!();
        println!("   No spending recorded for {}.", report.month_label);
        return Ok(());
    }

    println!();
    println!(
        "📊 By Category (vs {}, {}-month average)",
        report.previous_month.label(),
        report.baseline_months.len()
    );
    println!(
        "   {:18} │ {:>11} │ {:>11} │ {:>9}",
        "Category", "Amount", "Average", "Change"
    );
    println!("   ───────────────────┼─────────────┼─────────────┼──────────");
    for (category, amount) in report.category_totals.iter() {
        let icon = config.categories.icon(category.as_str());
        let change = report
            .comparison
            .categories
            .get(category)
            .map(|c| format_change(&c.change))
            .unwrap_or_default();
        println!(
            "   {} {:15} │ {:>11} │ {:>11} │ {:>9}",
            icon,
            truncate(category.as_str(), 15),
            format_currency(*amount),
            format_currency(report.historical_averages.amount(category)),
            change
        );
    }

    println!();
    println!("📅 Daily Spending");
    for (day, amount) in report.daily_totals.iter() {
        println!("   {}  {:>11}", day, format_currency(*amount));
    }
    if !report.previous_daily_totals.is_empty() {
        println!(
            "   {} total: {}",
            report.previous_month.label(),
            format_currency(report.previous_daily_totals.total())
        );
    }

    println!();
    println!("🧾 Transactions");
    let mut transactions = report.transactions.clone();
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    for tx in &transactions {
        println!(
            "   {}  {:28} {:12} {:>11}",
            tx.date,
            truncate(&tx.description, 28),
            tx.category.as_str(),
            format_currency(tx.amount)
        );
    }

    Ok(())
}

pub fn cmd_compare(
    ledger: &Ledger,
    config: &Config,
    month: Option<&str>,
    previous: Option<&str>,
    json: bool,
) -> Result<()> {
    let current = match month {
        Some(m) => parse_month(m)?,
        None => match ledger.latest_month() {
            Some(m) => m,
            None => anyhow::bail!("No transactions to compare. Pass --month YYYY-MM"),
        },
    };
    let previous = match previous {
        Some(m) => parse_month(m)?,
        None => current.previous(),
    };

    let comparison = compare_transactions(ledger.in_month(current), ledger.in_month(previous));

    if json {
        return print_json(&comparison);
    }

    print_comparison(&comparison, config, &current.label(), &previous.label());
    Ok(())
}

fn print_comparison(
    comparison: &PeriodComparison,
    config: &Config,
    current: &str,
    previous: &str,
) {
    println!();
    println!("📈 {} vs {}", current, previous);
    println!("   ─────────────────────────────────────────────────────────────");

    if comparison.categories.is_empty() {
        println!("   No spending in either month.");
        return;
    }

    println!(
        "   {:18} │ {:>11} │ {:>11} │ {:>11} │ {:>9}",
        "Category", "Current", "Previous", "Difference", "Change"
    );
    println!("   ───────────────────┼─────────────┼─────────────┼─────────────┼──────────");
    for (category, change) in comparison.categories.iter() {
        println!(
            "   {} {:15} │ {:>11} │ {:>11} │ {:>11} │ {:>9}",
            config.categories.icon(category.as_str()),
            truncate(category.as_str(), 15),
            format_currency(change.current),
            format_currency(change.previous),
            format_currency(change.delta),
            format_change(&change.change)
        );
    }
    println!("   ───────────────────┼─────────────┼─────────────┼─────────────┼──────────");
    println!(
        "   {:18} │ {:>11} │ {:>11} │ {:>11} │ {:>9}",
        "Total",
        format_currency(comparison.current_total),
        format_currency(comparison.previous_total),
        format_currency(comparison.total_delta),
        format_change(&comparison.total_change)
    );
}
