//! Spendview Core Library
//!
//! Spending analysis engine for the spendview personal budget tool:
//! - Category and date-bucket aggregation
//! - Period-over-period comparison with percent change
//! - Category means and above-mean flags across months
//! - Budget status with warning and over-budget tiers
//! - In-memory transaction ledger with search and month views
//! - Report builders for the dashboard, expense list, monthly and statistics views
//! - JSON/CSV transaction loading and an embedded sample dataset

pub mod aggregate;
pub mod budget;
pub mod compare;
pub mod config;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod sample;
pub mod stats;

/// Test helpers for building transactions and totals
#[cfg(test)]
pub mod test_utils;

pub use aggregate::{
    aggregate_by_bucket, aggregate_by_category, aggregate_by_category_with, aggregate_by_date_key,
    daily_key, monthly_key, total_amount, DateBucket,
};
pub use budget::{budget_status, WARNING_THRESHOLD_PERCENT};
pub use compare::{compare, compare_transactions, percent_change};
pub use config::{CategoryEntry, CategorySet, Config};
pub use error::{Error, Result};
pub use import::{load_transactions, parse_csv, parse_json, DataFormat};
pub use ledger::{ExpenseFilter, Ledger};
pub use models::{
    Breakdown, BucketTotals, BudgetStatus, BudgetTier, Category, CategoryChange, CategoryTotals,
    DashboardReport, DateTotals, Direction, ExpenseListing, MeanDeviation, Month, MonthSummary,
    MonthlyReport, NewTransaction, PercentChange, PeriodComparison, PeriodStatistics,
    StatisticsReport, Transaction,
};
pub use sample::sample_transactions;
pub use stats::mean_and_flags;
