//! Category means across periods and above-mean flags

use crate::error::{Error, Result};
use crate::models::{Breakdown, Category, CategoryTotals, MeanDeviation};

/// Values within this distance of the mean count as ties (not flagged)
pub(crate) const TIE_EPSILON: f64 = 1e-9;

/// Compute each category's mean over `series` and flag values above it
///
/// A category missing from a period counts as zero for that period. A value
/// is flagged only when strictly greater than the mean. At least one period
/// is required.
pub fn mean_and_flags(series: &[CategoryTotals], categories: &[Category]) -> Result<MeanDeviation> {
    if series.is_empty() {
        return Err(Error::InvalidInput(
            "At least one period is required to compute category means".into(),
        ));
    }

    let count = series.len() as f64;
    let means: CategoryTotals = categories
        .iter()
        .map(|category| {
            let sum: f64 = series.iter().map(|period| period.amount(category)).sum();
            (category.clone(), sum / count)
        })
        .collect();

    let flags = series
        .iter()
        .map(|period| {
            categories
                .iter()
                .map(|category| {
                    let above = period.amount(category) - means.amount(category) > TIE_EPSILON;
                    (category.clone(), above)
                })
                .collect::<Breakdown<Category, bool>>()
        })
        .collect();

    Ok(MeanDeviation { means, flags })
}
