//! Domain models for spendview

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, Months, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::aggregate::DateBucket;
use crate::error::{Error, Result};

/// A spending category label
///
/// Labels are opaque to the aggregation engine: unknown labels pass through
/// verbatim. Checking against the configured label set happens where data
/// enters the system (see [`crate::config::CategorySet`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expense transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within its ledger
    pub id: i64,
    pub description: String,
    /// Amount spent, never negative
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

/// A new transaction to be appended to a ledger (before an id is assigned)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }
}

pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidInput(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

pub(crate) fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::InvalidInput("Description must not be empty".into()));
    }
    Ok(())
}

// ========== Aggregate Models ==========

/// Insertion-ordered mapping used for every aggregate
///
/// Keys keep the position of their first insertion. Equality ignores order,
/// so two breakdowns with the same keys and values compare equal.
#[derive(Debug, Clone)]
pub struct Breakdown<K, V = f64> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

/// Amount per category
pub type CategoryTotals = Breakdown<Category>;

/// Amount per date key (day or month)
pub type DateTotals = Breakdown<String>;

impl<K: Hash + Eq + Clone, V> Breakdown<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Insert or replace a value; a replaced key keeps its position
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key).copied() {
            Some(i) => i,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Copy of this breakdown with entries ordered by key
    pub fn sorted_by_key(&self, descending: bool) -> Self
    where
        K: Ord,
        V: Clone,
    {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if descending {
            entries.reverse();
        }
        entries.into_iter().collect()
    }
}

impl<K: Hash + Eq + Clone> Breakdown<K, f64> {
    /// Add an amount to a key, starting from zero
    pub fn add(&mut self, key: K, amount: f64) {
        *self.get_or_insert_with(key, || 0.0) += amount;
    }

    /// Amount for a key, treating a missing key as zero
    pub fn amount<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

impl<K: Hash + Eq + Clone, V> Default for Breakdown<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> PartialEq for Breakdown<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for Breakdown<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for (k, v) in iter {
            breakdown.insert(k, v);
        }
        breakdown
    }
}

impl<K: Serialize, V: Serialize> Serialize for Breakdown<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ========== Period Models ==========

/// A calendar month, the period used for comparisons and budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| Error::InvalidInput(format!("Invalid month: {}-{:02}", year, month)))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).expect("Day 1 always valid"),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// "YYYY-MM", the same key the monthly date bucket produces
    pub fn key(&self) -> String {
        self.first_day.format("%Y-%m").to_string()
    }

    /// Human readable label, e.g. "March 2024"
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    pub fn previous(&self) -> Self {
        self.first_day
            .checked_sub_months(Months::new(1))
            .map(|first_day| Self { first_day })
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.first_day.year() && date.month() == self.first_day.month()
    }
}

impl std::str::FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| Error::InvalidInput(format!("Invalid month '{}' (use YYYY-MM)", s)))?;
        Ok(Self { first_day: date })
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

// ========== Comparison Models ==========

/// Direction of a change between two periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
    Flat,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Flat => "flat",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percentage change between a previous and a current amount
///
/// The magnitude is always non-negative; whether spending went up or down
/// lives in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PercentChange {
    /// Nothing was spent in the previous period but something is now
    New,
    /// Nothing was spent in either period
    Unchanged,
    /// Relative change in percent, rounded to one decimal
    Change { magnitude: f64, direction: Direction },
}

impl PercentChange {
    pub fn direction(&self) -> Direction {
        match self {
            Self::New => Direction::Increase,
            Self::Unchanged => Direction::Flat,
            Self::Change { direction, .. } => *direction,
        }
    }
}

impl std::fmt::Display for PercentChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Unchanged => write!(f, "0%"),
            Self::Change { magnitude, .. } => write!(f, "{:.1}%", magnitude),
        }
    }
}

/// One category's figures in a period comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChange {
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    pub change: PercentChange,
}

/// Current vs previous period, per category and in total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current_total: f64,
    pub previous_total: f64,
    pub total_delta: f64,
    pub total_change: PercentChange,
    pub categories: Breakdown<Category, CategoryChange>,
}

/// Category means across periods and the above-mean flags per period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanDeviation {
    pub means: CategoryTotals,
    /// One map per input period, in input order
    pub flags: Vec<Breakdown<Category, bool>>,
}

impl MeanDeviation {
    pub fn is_flagged(&self, period: usize, category: &str) -> bool {
        self.flags
            .get(period)
            .and_then(|f| f.get(category))
            .copied()
            .unwrap_or(false)
    }
}

// ========== Budget Models ==========

/// Budget health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    /// More than 20% of the budget left
    Ok,
    /// Some budget left, but 20% or less
    Warning,
    /// Nothing left
    Over,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Over => "over",
        }
    }
}

impl std::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending measured against a budget ceiling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: f64,
    pub total_spent: f64,
    /// May be negative when over budget
    pub remaining: f64,
    /// Rounded and clamped to 0..=100
    pub percentage_used: u8,
    pub percentage_remaining: u8,
    pub tier: BudgetTier,
}

// ========== Report Models ==========

/// Dashboard view for one month
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub month: Month,
    pub month_label: String,
    pub previous_month: Month,
    pub budget: BudgetStatus,
    pub category_totals: CategoryTotals,
    /// Ascending by date
    pub daily_totals: DateTotals,
    pub previous_daily_totals: DateTotals,
    pub comparison: PeriodComparison,
    /// Category means over the baseline months before `month`
    pub historical_averages: CategoryTotals,
    pub baseline_months: Vec<Month>,
    pub transactions: Vec<Transaction>,
}

/// Filtered transaction list (all-expenses view)
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub count: usize,
    pub total: f64,
    /// Categories available for filtering, in first-seen order
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_totals: Option<BucketTotals>,
}

/// Listed amounts summed per day or month, oldest bucket first
#[derive(Debug, Clone, Serialize)]
pub struct BucketTotals {
    pub bucket: DateBucket,
    pub totals: DateTotals,
}

/// One month in the monthly view
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub month: Month,
    pub label: String,
    pub budget: BudgetStatus,
    /// Newest date first
    pub transactions: Vec<Transaction>,
}

/// Transactions grouped by month, newest month first
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub budget: f64,
    pub months: Vec<MonthSummary>,
}

/// One month column of the statistics table
#[derive(Debug, Clone, Serialize)]
pub struct PeriodStatistics {
    pub month: Month,
    pub label: String,
    /// Zero-filled for every reported category
    pub category_sums: CategoryTotals,
    pub total: f64,
    /// Percent of the month total per category
    pub shares: CategoryTotals,
    /// Whether each category is above its mean in this month
    pub above_mean: Breakdown<Category, bool>,
}

/// Multi-month statistics, newest month first
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub categories: Vec<Category>,
    pub periods: Vec<PeriodStatistics>,
    pub means: CategoryTotals,
    pub average_total: f64,
}
