//! Budget status
//!
//! Tiers are derived from the share of the budget left:
//! - `over` when nothing is left
//! - `warning` when 20% or less is left
//! - `ok` otherwise

use crate::error::{Error, Result};
use crate::models::{BudgetStatus, BudgetTier};

/// Remaining-budget percentage at or below which the tier is `warning`
pub const WARNING_THRESHOLD_PERCENT: f64 = 20.0;

/// Measure `total_spent` against a budget ceiling
///
/// The budget must be a positive finite number.
pub fn budget_status(total_spent: f64, budget: f64) -> Result<BudgetStatus> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "Budget must be a positive amount, got {}",
            budget
        )));
    }
    if !total_spent.is_finite() {
        return Err(Error::InvalidInput(format!(
            "Total spent must be a finite amount, got {}",
            total_spent
        )));
    }

    let remaining = budget - total_spent;
    let percentage_used = (total_spent / budget * 100.0).round().clamp(0.0, 100.0) as u8;
    let remaining_percent = remaining / budget * 100.0;

    let tier = if remaining <= 0.0 {
        BudgetTier::Over
    } else if remaining_percent <= WARNING_THRESHOLD_PERCENT {
        BudgetTier::Warning
    } else {
        BudgetTier::Ok
    };

    Ok(BudgetStatus {
        budget,
        total_spent,
        remaining,
        percentage_used,
        percentage_remaining: 100 - percentage_used,
        tier,
    })
}
