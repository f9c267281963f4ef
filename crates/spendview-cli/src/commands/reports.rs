//! Monthly and statistics report commands

use anyhow::Result;
use spendview_core::{Category, Config, Ledger, MonthlyReport, StatisticsReport};

use super::{format_currency, parse_month, print_json, tier_icon, truncate};

pub fn cmd_monthly(ledger: &Ledger, config: &Config, json: bool) -> Result<()> {
    let report = MonthlyReport::build(ledger, config.budget)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("📆 Monthly Expenses");
    println!("   Budget: {} per month", format_currency(report.budget));

    if report.months.is_empty() {
        println!("   No expenses recorded yet.");
        return Ok(());
    }

    for summary in &report.months {
        let status = &summary.budget;
        println!();
        println!(
            "   {} {}  {} spent, {} left ({}% of budget remaining)",
            tier_icon(status.tier),
            summary.label,
            format_currency(status.total_spent),
            format_currency(status.remaining),
            status.percentage_remaining
        );
        println!("   ─────────────────────────────────────────────────────────────");
        for tx in &summary.transactions {
            println!(
                "   {}  {:28}  {} {:10}  {:>11}",
                tx.date,
                truncate(&tx.description, 28),
                config.categories.icon(tx.category.as_str()),
                truncate(tx.category.as_str(), 10),
                format_currency(tx.amount)
            );
        }
    }

    Ok(())
}

pub fn cmd_stats(
    ledger: &Ledger,
    config: &Config,
    months: usize,
    month: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let last = month.map(parse_month).transpose()?;
    let selected: Option<Category> = category
        .map(|label| config.categories.parse(label))
        .transpose()?;

    let mut report = StatisticsReport::build(ledger, config, months, last)?;
    if let Some(ref category) = selected {
        report.retain_category(category);
    }

    if json {
        return print_json(&report);
    }

    println!();
    println!("📊 Spending Statistics");
    println!("   Values marked * exceed the category mean");
    println!("   ─────────────────────────────────────────────────────────────");

    let mut header = format!("   {:12}", "Category");
    for period in &report.periods {
        let label = period.month.first_day().format("%b %Y").to_string();
        header.push_str(&format!(" │ {:>11}", label));
    }
    header.push_str(&format!(" │ {:>11}", "Mean"));
    println!("{}", header);

    for category in &report.categories {
        let mut line = format!("   {:12}", truncate(category.as_str(), 12));
        for period in &report.periods {
            let amount = period.category_sums.amount(category);
            let marker = if period.above_mean.get(category).copied().unwrap_or(false) {
                "*"
            } else {
                " "
            };
            line.push_str(&format!(" │ {:>10}{}", format_currency(amount), marker));
        }
        line.push_str(&format!(
            " │ {:>11}",
            format_currency(report.means.amount(category))
        ));
        println!("{}", line);
    }

    let mut totals = format!("   {:12}", "Total");
    for period in &report.periods {
        totals.push_str(&format!(" │ {:>11}", format_currency(period.total)));
    }
    totals.push_str(&format!(" │ {:>11}", format_currency(report.average_total)));
    println!("{}", totals);

    if let Some(category) = selected {
        println!();
        println!("   {} share of monthly spending:", category);
        for period in &report.periods {
            println!(
                "   {}  {:>5.1}%",
                period.label,
                period.shares.amount(&category)
            );
        }
    }

    Ok(())
}
