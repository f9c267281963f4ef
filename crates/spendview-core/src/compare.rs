//! Period-over-period comparison
//!
//! Compares two category breakdowns (usually this month vs last month).
//! A category missing on one side counts as zero for that side only.
//! Percentages are reported as a non-negative magnitude plus a direction.

use tracing::debug;

use crate::aggregate::aggregate_by_category;
use crate::models::{
    Breakdown, Category, CategoryChange, CategoryTotals, Direction, PercentChange,
    PeriodComparison, Transaction,
};
use crate::stats::TIE_EPSILON;

/// Percentage change from `previous` to `current`
///
/// With nothing spent previously the change is `New` (something spent now)
/// or `Unchanged` (still nothing). Otherwise the magnitude is
/// `|current - previous| / previous * 100`, rounded to one decimal.
pub fn percent_change(current: f64, previous: f64) -> PercentChange {
    if previous == 0.0 {
        return if current > 0.0 {
            PercentChange::New
        } else {
            PercentChange::Unchanged
        };
    }

    let delta = current - previous;
    let magnitude = ((delta / previous).abs() * 100.0 * 10.0).round() / 10.0;

    PercentChange::Change {
        magnitude,
        direction: direction_of(delta),
    }
}

/// Deltas within [`TIE_EPSILON`] of zero are `Flat`
fn direction_of(delta: f64) -> Direction {
    if delta > TIE_EPSILON {
        Direction::Increase
    } else if delta < -TIE_EPSILON {
        Direction::Decrease
    } else {
        Direction::Flat
    }
}

/// Compare two category breakdowns
///
/// Categories are listed in the current period's order, followed by those
/// only present in the previous period.
pub fn compare(current: &CategoryTotals, previous: &CategoryTotals) -> PeriodComparison {
    let mut categories: Breakdown<Category, CategoryChange> = Breakdown::new();

    for category in current.keys().chain(previous.keys()) {
        if categories.contains_key(category) {
            continue;
        }
        let curr = current.amount(category);
        let prev = previous.amount(category);
        categories.insert(
            category.clone(),
            CategoryChange {
                current: curr,
                previous: prev,
                delta: curr - prev,
                change: percent_change(curr, prev),
            },
        );
    }

    let current_total = current.total();
    let previous_total = previous.total();

    debug!(
        categories = categories.len(),
        current_total, previous_total, "Compared periods"
    );

    PeriodComparison {
        current_total,
        previous_total,
        total_delta: current_total - previous_total,
        total_change: percent_change(current_total, previous_total),
        categories,
    }
}

/// Compare two transaction sets
///
/// Category breakdowns and totals are both derived from the same sets, so
/// the comparison totals always match the transactions.
pub fn compare_transactions<'a, C, P>(current: C, previous: P) -> PeriodComparison
where
    C: IntoIterator<Item = &'a Transaction>,
    P: IntoIterator<Item = &'a Transaction>,
{
    compare(
        &aggregate_by_category(current),
        &aggregate_by_category(previous),
    )
}
