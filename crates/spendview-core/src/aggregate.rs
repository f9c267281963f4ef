//! Category and time-bucket aggregation
//!
//! Pure sums over any sequence of transactions. Keys appear in order of first
//! occurrence; categories or dates with no transactions are omitted unless the
//! caller asks for a zero-filled category set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, CategoryTotals, DateTotals, Transaction};

/// Time bucket for date aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    /// One bucket per calendar day ("YYYY-MM-DD")
    Day,
    /// One bucket per calendar month ("YYYY-MM")
    Month,
}

impl DateBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }

    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Self::Day => daily_key(date),
            Self::Month => monthly_key(date),
        }
    }
}

impl std::str::FromStr for DateBucket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(format!("Unknown date bucket: {} (valid: day, month)", s)),
        }
    }
}

/// ISO date key, e.g. "2024-03-15"
pub fn daily_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Year-month key, the first seven characters of the ISO date
pub fn monthly_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sum amounts per category
pub fn aggregate_by_category<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = CategoryTotals::new();
    for tx in transactions {
        totals.add(tx.category.clone(), tx.amount);
    }
    totals
}

/// Sum amounts per category with every listed category present
///
/// Listed categories come first, in the given order, starting at zero.
/// Categories found in the transactions but not listed are appended.
pub fn aggregate_by_category_with<'a, I>(transactions: I, categories: &[Category]) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: CategoryTotals = categories.iter().map(|c| (c.clone(), 0.0)).collect();
    for tx in transactions {
        totals.add(tx.category.clone(), tx.amount);
    }
    totals
}

/// Sum amounts per date key
///
/// `key_fn` is usually [`daily_key`] or [`monthly_key`].
pub fn aggregate_by_date_key<'a, I, F>(transactions: I, key_fn: F) -> DateTotals
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(NaiveDate) -> String,
{
    let mut totals = DateTotals::new();
    for tx in transactions {
        totals.add(key_fn(tx.date), tx.amount);
    }
    totals
}

/// Sum amounts per date bucket
pub fn aggregate_by_bucket<'a, I>(transactions: I, bucket: DateBucket) -> DateTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    aggregate_by_date_key(transactions, |date| bucket.key(date))
}

/// Sum of all amounts
pub fn total_amount<'a, I>(transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().map(|tx| tx.amount).sum()
}
