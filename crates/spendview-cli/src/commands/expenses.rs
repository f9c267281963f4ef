//! Expense list and add-transaction commands

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use spendview_core::{
    budget_status, total_amount, BudgetStatus, Config, ExpenseFilter, ExpenseListing, Ledger,
    Month, NewTransaction, Transaction,
};
use tracing::info;

use super::{format_currency, parse_bucket, parse_date, print_budget, print_json, truncate};

pub fn cmd_expenses(
    ledger: &Ledger,
    config: &Config,
    search: Option<&str>,
    category: Option<&str>,
    bucket: Option<&str>,
    json: bool,
) -> Result<()> {
    let bucket = bucket.map(parse_bucket).transpose()?;
    let mut filter = ExpenseFilter::new();
    if let Some(term) = search {
        filter = filter.with_search(term);
    }
    if let Some(label) = category {
        filter = filter.with_category(config.categories.parse(label)?);
    }

    let mut listing = ExpenseListing::build(ledger, &filter);
    if let Some(bucket) = bucket {
        listing = listing.with_bucket_totals(bucket);
    }

    if json {
        return print_json(&listing);
    }

    println!();
    println!("🧾 All Expenses");
    if let Some(ref term) = listing.search {
        println!("   Search: \"{}\"", term);
    }
    if let Some(ref category) = listing.category {
        println!("   Category: {}", category);
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if listing.transactions.is_empty() {
        println!("   No expenses found matching your criteria.");
        return Ok(());
    }

    println!(
        "   {:10}  {:28}  {:12}  {:>11}",
        "Date", "Description", "Category", "Amount"
    );
    for tx in &listing.transactions {
        println!(
            "   {}  {:28}  {} {:10}  {:>11}",
            tx.date,
            truncate(&tx.description, 28),
            config.categories.icon(tx.category.as_str()),
            truncate(tx.category.as_str(), 10),
            format_currency(tx.amount)
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {} expenses, total {}",
        listing.count,
        format_currency(listing.total)
    );

    if let Some(ref buckets) = listing.bucket_totals {
        println!();
        println!("📅 Totals by {}", buckets.bucket.as_str());
        for (key, amount) in buckets.totals.iter() {
            println!("   {:10}  {:>11}", key, format_currency(*amount));
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct AddResult<'a> {
    transaction: &'a Transaction,
    month: Month,
    budget: BudgetStatus,
}

/// Append a transaction to the in-memory ledger and show its month's budget
pub fn cmd_add(
    ledger: &mut Ledger,
    config: &Config,
    description: &str,
    amount: f64,
    category: &str,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let category = config.categories.parse(category)?;
    let date = match date {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };

    let new_tx = NewTransaction {
        description: description.to_string(),
        amount,
        category,
        date,
    };
    let transaction = ledger
        .append(new_tx)
        .context("Failed to add transaction")?
        .clone();
    info!(id = transaction.id, "Added transaction");

    let month = Month::from_date(transaction.date);
    let budget = budget_status(total_amount(ledger.in_month(month)), config.budget)?;

    if json {
        return print_json(&AddResult {
            transaction: &transaction,
            month,
            budget,
        });
    }

    println!(
        "✅ Added #{}: {} ({}, {}) on {}",
        transaction.id,
        transaction.description,
        format_currency(transaction.amount),
        transaction.category,
        transaction.date
    );
    println!();
    println!("   {}", month.label());
    println!("   ─────────────────────────────────────────────────────────────");
    print_budget(&budget);
    println!();
    println!("   \x1b[2mNot saved: data files are read-only.\x1b[0m");

    Ok(())
}
