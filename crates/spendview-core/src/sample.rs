//! Embedded sample dataset
//!
//! Eight months of household spending (August 2023 through March 2024),
//! used when no data file is given.

use crate::config::CategorySet;
use crate::error::Result;
use crate::import::parse_json;
use crate::models::Transaction;

const SAMPLE_TRANSACTIONS: &str = include_str!("../data/sample_transactions.json");

/// Load the embedded sample transactions
pub fn sample_transactions(categories: &CategorySet) -> Result<Vec<Transaction>> {
    parse_json(SAMPLE_TRANSACTIONS.as_bytes(), categories)
}
