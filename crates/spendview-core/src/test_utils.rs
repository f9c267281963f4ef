//! Test helpers for building transactions and category totals

use chrono::NaiveDate;

use crate::models::{Category, CategoryTotals, Transaction};

/// Build a transaction from an ISO date string
pub fn tx(id: i64, description: &str, amount: f64, category: &str, date: &str) -> Transaction {
    Transaction {
        id,
        description: description.to_string(),
        amount,
        category: Category::new(category),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date"),
    }
}

/// Build category totals from (label, amount) pairs
pub fn totals(pairs: &[(&str, f64)]) -> CategoryTotals {
    pairs
        .iter()
        .map(|&(label, amount)| (Category::new(label), amount))
        .collect()
}

/// Float comparison for summed amounts
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
