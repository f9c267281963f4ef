//! Transaction data file loading (JSON and CSV)
//!
//! Both formats carry the same record shape:
//! `id` (optional), `description`, `amount`, `category`, `date` (YYYY-MM-DD).
//! Category labels are resolved against the configured set here, so the
//! engine only ever sees canonical labels from files.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CategorySet;
use crate::error::{Error, Result};
use crate::models::{validate_amount, validate_description, Transaction};

/// Supported data file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as written in a data file
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    #[serde(default)]
    id: Option<i64>,
    description: String,
    amount: f64,
    category: String,
    date: String,
}

/// Parse a JSON array of transaction records
pub fn parse_json<R: Read>(reader: R, categories: &CategorySet) -> Result<Vec<Transaction>> {
    let records: Vec<TransactionRecord> = serde_json::from_reader(reader)?;
    into_transactions(records, categories)
}

/// Parse CSV with headers `id,date,description,amount,category` (`id` optional)
pub fn parse_csv<R: Read>(reader: R, categories: &CategorySet) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: TransactionRecord = result?;
        records.push(record);
    }

    into_transactions(records, categories)
}

/// Load transactions from a `.json` or `.csv` file
pub fn load_transactions(path: &Path, categories: &CategorySet) -> Result<Vec<Transaction>> {
    let format = DataFormat::from_path(path).ok_or_else(|| {
        Error::Import(format!(
            "Unsupported data file: {} (expected .json or .csv)",
            path.display()
        ))
    })?;

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let transactions = match format {
        DataFormat::Json => parse_json(reader, categories)?,
        DataFormat::Csv => parse_csv(reader, categories)?,
    };

    info!(
        path = %path.display(),
        format = %format,
        count = transactions.len(),
        "Loaded transactions"
    );
    Ok(transactions)
}

/// Validate records and assign ids to those without one
fn into_transactions(
    records: Vec<TransactionRecord>,
    categories: &CategorySet,
) -> Result<Vec<Transaction>> {
    let mut seen = HashSet::new();
    for id in records.iter().filter_map(|r| r.id) {
        if !seen.insert(id) {
            return Err(Error::Import(format!("Duplicate transaction id: {}", id)));
        }
    }

    let mut next_id = seen.iter().copied().max().unwrap_or(0).checked_add(1);
    let mut transactions = Vec::with_capacity(records.len());

    for (row, record) in records.into_iter().enumerate() {
        let row = row + 1;
        validate_description(&record.description)
            .and_then(|_| validate_amount(record.amount))
            .map_err(|e| Error::Import(format!("Record {}: {}", row, e)))?;

        let date = parse_date(&record.date)
            .map_err(|e| Error::Import(format!("Record {}: {}", row, e)))?;

        let id = match record.id {
            Some(id) => id,
            None => {
                let id = next_id.ok_or_else(|| {
                    Error::Import(format!("Record {}: no free transaction id", row))
                })?;
                next_id = id.checked_add(1);
                debug!(row, id, "Assigned transaction id");
                id
            }
        };

        transactions.push(Transaction {
            id,
            description: record.description.trim().to_string(),
            amount: record.amount,
            category: categories.resolve(&record.category),
            date,
        });
    }

    Ok(transactions)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))
}
