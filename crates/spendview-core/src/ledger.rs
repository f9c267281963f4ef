//! In-memory transaction ledger
//!
//! The ledger owns the ordered transaction collection. Transactions are only
//! ever appended; every view derives its figures from a fresh read of the
//! ledger rather than caching aggregates.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::aggregate::total_amount;
use crate::error::{Error, Result};
use crate::models::{
    validate_amount, validate_description, Category, Month, NewTransaction, Transaction,
};

/// Search and category filter for transaction lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    /// Exact category match
    pub category: Option<Category>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        let matches_search = match &self.search {
            Some(term) => tx
                .description
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        };
        let matches_category = self
            .category
            .as_ref()
            .map_or(true, |category| &tx.category == category);

        matches_search && matches_category
    }
}

/// Ordered, append-only transaction collection
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from existing transactions, keeping their order
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self> {
        let mut ids = HashSet::new();
        for tx in &transactions {
            validate_description(&tx.description)?;
            validate_amount(tx.amount)?;
            if !ids.insert(tx.id) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate transaction id: {}",
                    tx.id
                )));
            }
        }

        debug!(count = transactions.len(), "Built ledger");
        Ok(Self { transactions })
    }

    /// Append a transaction, assigning the next free id
    pub fn append(&mut self, new: NewTransaction) -> Result<&Transaction> {
        new.validate()?;

        let id = self.next_id()?;
        self.transactions.push(Transaction {
            id,
            description: new.description.trim().to_string(),
            amount: new.amount,
            category: new.category,
            date: new.date,
        });

        debug!(id, "Appended transaction");
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    fn next_id(&self) -> Result<i64> {
        self.transactions
            .iter()
            .map(|tx| tx.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| Error::InvalidInput("No free transaction id".into()))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total(&self) -> f64 {
        total_amount(&self.transactions)
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = HashSet::new();
        self.transactions
            .iter()
            .filter(|tx| seen.insert(&tx.category))
            .map(|tx| tx.category.clone())
            .collect()
    }

    /// Transactions matching a filter, in ledger order
    pub fn filter(&self, filter: &ExpenseFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .collect()
    }

    /// Transactions dated within a month, in ledger order
    pub fn in_month(&self, month: Month) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| month.contains(tx.date))
            .collect()
    }

    /// Months with at least one transaction, newest first
    pub fn months(&self) -> Vec<Month> {
        let months: BTreeSet<Month> = self
            .transactions
            .iter()
            .map(|tx| Month::from_date(tx.date))
            .collect();
        months.into_iter().rev().collect()
    }

    pub fn latest_month(&self) -> Option<Month> {
        self.transactions
            .iter()
            .map(|tx| Month::from_date(tx.date))
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{approx_eq, tx};
    use chrono::NaiveDate;

    fn ledger() -> Ledger {
        Ledger::from_transactions(vec![
            tx(1, "Grocery Shopping", 156.32, "Shopping", "2024-03-15"),
            tx(2, "Coffee Shop", 4.50, "Food", "2024-03-14"),
            tx(102, "Coffee Shop", 6.50, "Food", "2024-02-14"),
            tx(3, "Gas Station", 45.00, "Transport", "2024-03-13"),
            tx(201, "Grocery Shopping", 138.45, "Shopping", "2024-01-10"),
        ])
        .unwrap()
    }

    fn new_tx(description: &str, amount: f64) -> NewTransaction {
        NewTransaction {
            description: description.to_string(),
            amount,
            category: Category::new("Food"),
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        }
    }

    #[test]
    fn test_append_assigns_next_id() {
        let mut ledger = ledger();
        let appended = ledger.append(new_tx("Bagel", 3.25)).unwrap();
        assert_eq!(appended.id, 202);
        assert_eq!(appended.description, "Bagel");

        assert_eq!(ledger.len(), 6);
        assert_eq!(ledger.transactions().last().unwrap().id, 202);
        assert!(approx_eq(ledger.total(), 354.02));
    }

    #[test]
    fn test_append_to_empty_ledger() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());
        let id = ledger.append(new_tx("Bagel", 3.25)).unwrap().id;
        assert_eq!(id, 1);
    }

    #[test]
    fn test_append_rejects_invalid() {
        let mut ledger = ledger();
        assert!(matches!(
            ledger.append(new_tx("Refund", -10.0)),
            Err(Error::InvalidInput(_))
        ));
        assert!(ledger.append(new_tx("", 10.0)).is_err());
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn test_append_after_largest_id() {
        let mut ledger =
            Ledger::from_transactions(vec![tx(i64::MAX, "Rent", 1200.0, "Housing", "2024-03-01")])
                .unwrap();
        assert!(matches!(
            ledger.append(new_tx("Bagel", 3.25)),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Ledger::from_transactions(vec![
            tx(1, "A", 1.0, "Food", "2024-03-01"),
            tx(1, "B", 2.0, "Food", "2024-03-02"),
        ]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_categories_first_seen_order() {
        let names: Vec<String> = ledger()
            .categories()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, vec!["Shopping", "Food", "Transport"]);
    }

    #[test]
    fn test_filter_by_search_is_case_insensitive() {
        let ledger = ledger();
        let filter = ExpenseFilter::new().with_search("COFFEE");
        let ids: Vec<i64> = ledger.filter(&filter).iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![2, 102]);
    }

    #[test]
    fn test_filter_by_category_and_search() {
        let ledger = ledger();
        let filter = ExpenseFilter::new()
            .with_search("shop")
            .with_category(Category::new("Shopping"));
        let ids: Vec<i64> = ledger.filter(&filter).iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1, 201]);
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let ledger = ledger();
        assert_eq!(ledger.filter(&ExpenseFilter::new()).len(), 5);
        assert_eq!(ledger.filter(&ExpenseFilter::new().with_search("")).len(), 5);
    }

    #[test]
    fn test_months_newest_first() {
        let ledger = ledger();
        let keys: Vec<String> = ledger.months().iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-02", "2024-01"]);
        assert_eq!(ledger.latest_month().unwrap().key(), "2024-03");
    }

    #[test]
    fn test_in_month() {
        let ledger = ledger();
        let march: Month = "2024-03".parse().unwrap();
        let ids: Vec<i64> = ledger.in_month(march).iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let december: Month = "2023-12".parse().unwrap();
        assert!(ledger.in_month(december).is_empty());
    }

    #[test]
    fn test_empty_ledger_has_no_months() {
        let ledger = Ledger::new();
        assert!(ledger.months().is_empty());
        assert!(ledger.latest_month().is_none());
        assert_eq!(ledger.total(), 0.0);
    }
}
