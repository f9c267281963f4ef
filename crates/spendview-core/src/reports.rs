//! Report builders for the dashboard, expense list, monthly and statistics views
//!
//! Every report is derived from a fresh read of the ledger; nothing here is
//! cached between calls.

use chrono::Local;
use tracing::debug;

use crate::aggregate::{
    aggregate_by_bucket, aggregate_by_category, aggregate_by_category_with, total_amount,
    DateBucket,
};
use crate::budget::budget_status;
use crate::compare::compare_transactions;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ledger::{ExpenseFilter, Ledger};
use crate::models::*;
use crate::stats::mean_and_flags;

/// Configured labels followed by any other category seen in `transactions`
fn report_categories(config: &Config, transactions: &[&Transaction]) -> Vec<Category> {
    let mut categories = config.categories.labels();
    for tx in transactions {
        if !categories.contains(&tx.category) {
            categories.push(tx.category.clone());
        }
    }
    categories
}

/// `count` months ending at `last`, newest first
///
/// Fails when the window reaches back past the earliest representable month.
fn trailing_months(last: Month, count: usize) -> Result<Vec<Month>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut months = vec![last];
    let mut month = last;
    while months.len() < count {
        let earlier = month.previous();
        if earlier == month {
            return Err(Error::InvalidInput(format!(
                "A {}-month window ending {} reaches before the earliest supported date",
                count, last
            )));
        }
        months.push(earlier);
        month = earlier;
    }
    Ok(months)
}

fn current_month() -> Month {
    Month::from_date(Local::now().date_naive())
}

impl DashboardReport {
    /// Build the dashboard for `month` (default: the latest month with data)
    pub fn build(ledger: &Ledger, config: &Config, month: Option<Month>) -> Result<Self> {
        let month = month
            .or_else(|| ledger.latest_month())
            .unwrap_or_else(current_month);
        let previous_month = month.previous();

        let current = ledger.in_month(month);
        let previous = ledger.in_month(previous_month);

        let budget = budget_status(total_amount(current.iter().copied()), config.budget)?;
        let category_totals = aggregate_by_category(current.iter().copied());
        let daily_totals =
            aggregate_by_bucket(current.iter().copied(), DateBucket::Day).sorted_by_key(false);
        let previous_daily_totals =
            aggregate_by_bucket(previous.iter().copied(), DateBucket::Day).sorted_by_key(false);
        let comparison = compare_transactions(current.iter().copied(), previous.iter().copied());

        // Historical averages over the months before this one
        let baseline_months = trailing_months(previous_month, config.baseline_months)?;
        let baseline: Vec<Vec<&Transaction>> = baseline_months
            .iter()
            .map(|m| ledger.in_month(*m))
            .collect();
        let all_baseline: Vec<&Transaction> = baseline.iter().flatten().copied().collect();
        let categories = report_categories(config, &all_baseline);
        let series: Vec<CategoryTotals> = baseline
            .iter()
            .map(|txs| aggregate_by_category_with(txs.iter().copied(), &categories))
            .collect();
        let historical_averages = mean_and_flags(&series, &categories)?.means;

        debug!(
            month = %month,
            transactions = current.len(),
            baseline = baseline_months.len(),
            "Built dashboard report"
        );

        Ok(Self {
            month,
            month_label: month.label(),
            previous_month,
            budget,
            category_totals,
            daily_totals,
            previous_daily_totals,
            comparison,
            historical_averages,
            baseline_months,
            transactions: current.into_iter().cloned().collect(),
        })
    }
}

impl ExpenseListing {
    /// Build the filtered transaction list
    pub fn build(ledger: &Ledger, filter: &ExpenseFilter) -> Self {
        let transactions: Vec<Transaction> = ledger.filter(filter).into_iter().cloned().collect();

        Self {
            search: filter.search.clone().filter(|s| !s.is_empty()),
            category: filter.category.clone(),
            count: transactions.len(),
            total: total_amount(&transactions),
            categories: ledger.categories(),
            transactions,
            bucket_totals: None,
        }
    }

    /// Add per-day or per-month totals of the listed transactions
    pub fn with_bucket_totals(mut self, bucket: DateBucket) -> Self {
        let totals = aggregate_by_bucket(&self.transactions, bucket).sorted_by_key(false);
        self.bucket_totals = Some(BucketTotals { bucket, totals });
        self
    }
}

impl MonthlyReport {
    /// Group transactions by month, newest month first
    pub fn build(ledger: &Ledger, budget: f64) -> Result<Self> {
        let mut months = Vec::new();

        for month in ledger.months() {
            let mut transactions: Vec<Transaction> =
                ledger.in_month(month).into_iter().cloned().collect();
            transactions.sort_by(|a, b| b.date.cmp(&a.date));

            months.push(MonthSummary {
                month,
                label: month.label(),
                budget: budget_status(total_amount(&transactions), budget)?,
                transactions,
            });
        }

        debug!(months = months.len(), "Built monthly report");
        Ok(Self { budget, months })
    }
}

impl StatisticsReport {
    /// Category statistics for the `months` months ending at `last`
    /// (default: the latest month with data)
    pub fn build(
        ledger: &Ledger,
        config: &Config,
        months: usize,
        last: Option<Month>,
    ) -> Result<Self> {
        if months == 0 {
            return Err(Error::InvalidInput("Statistics need at least one month".into()));
        }

        let last = last
            .or_else(|| ledger.latest_month())
            .unwrap_or_else(current_month);
        let window = trailing_months(last, months)?;

        let per_month: Vec<Vec<&Transaction>> =
            window.iter().map(|m| ledger.in_month(*m)).collect();
        let all: Vec<&Transaction> = per_month.iter().flatten().copied().collect();
        let categories = report_categories(config, &all);

        let series: Vec<CategoryTotals> = per_month
            .iter()
            .map(|txs| aggregate_by_category_with(txs.iter().copied(), &categories))
            .collect();
        let deviation = mean_and_flags(&series, &categories)?;

        let periods: Vec<PeriodStatistics> = window
            .iter()
            .zip(series)
            .zip(deviation.flags)
            .map(|((month, category_sums), above_mean)| {
                let total = category_sums.total();
                let shares = category_sums
                    .iter()
                    .map(|(category, amount)| {
                        let share = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
                        (category.clone(), share)
                    })
                    .collect();

                PeriodStatistics {
                    month: *month,
                    label: month.label(),
                    category_sums,
                    total,
                    shares,
                    above_mean,
                }
            })
            .collect();

        let average_total = periods.iter().map(|p| p.total).sum::<f64>() / periods.len() as f64;

        debug!(last = %last, months, "Built statistics report");

        Ok(Self {
            categories,
            periods,
            means: deviation.means,
            average_total,
        })
    }

    /// Keep only `category`'s row. Period totals still cover every category.
    pub fn retain_category(&mut self, category: &Category) {
        self.categories.retain(|c| c == category);
        self.means = only(&self.means, category);
        for period in &mut self.periods {
            period.category_sums = only(&period.category_sums, category);
            period.shares = only(&period.shares, category);
            period.above_mean = only(&period.above_mean, category);
        }
    }
}

fn only<V: Clone>(
    breakdown: &Breakdown<Category, V>,
    category: &Category,
) -> Breakdown<Category, V> {
    breakdown
        .iter()
        .filter(|(c, _)| *c == category)
        .map(|(c, v)| (c.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{approx_eq, tx};

    fn ledger() -> Ledger {
        Ledger::from_transactions(vec![
            tx(1, "Grocery Shopping", 156.32, "Shopping", "2024-03-15"),
            tx(2, "Coffee Shop", 4.50, "Food", "2024-03-14"),
            tx(3, "Gas Station", 45.00, "Transport", "2024-03-13"),
            tx(4, "Uber Ride", 25.00, "Transport", "2024-03-15"),
            tx(101, "Grocery Shopping", 142.50, "Shopping", "2024-02-15"),
            tx(102, "Coffee Shop", 6.50, "Food", "2024-02-14"),
            tx(201, "Rent", 1200.00, "Housing", "2024-01-01"),
            tx(202, "Coffee Shop", 5.25, "Food", "2024-01-14"),
        ])
        .unwrap()
    }

    fn month(key: &str) -> Month {
        key.parse().unwrap()
    }

    #[test]
    fn test_dashboard_defaults_to_latest_month() {
        let report = DashboardReport::build(&ledger(), &Config::default(), None).unwrap();

        assert_eq!(report.month.key(), "2024-03");
        assert_eq!(report.month_label, "March 2024");
        assert_eq!(report.previous_month.key(), "2024-02");
        assert_eq!(report.transactions.len(), 4);
        assert!(approx_eq(report.budget.total_spent, 230.82));
        assert!(approx_eq(report.category_totals.amount("Transport"), 70.0));
    }

    #[test]
    fn test_dashboard_daily_totals_ascending() {
        let report = DashboardReport::build(&ledger(), &Config::default(), None).unwrap();

        let days: Vec<&String> = report.daily_totals.keys().collect();
        assert_eq!(days, vec!["2024-03-13", "2024-03-14", "2024-03-15"]);
        assert!(approx_eq(report.daily_totals.amount("2024-03-15"), 181.32));
        assert_eq!(report.previous_daily_totals.len(), 2);
    }

    #[test]
    fn test_dashboard_comparison_matches_transactions() {
        let report = DashboardReport::build(&ledger(), &Config::default(), None).unwrap();

        assert!(approx_eq(report.comparison.current_total, 230.82));
        assert!(approx_eq(report.comparison.previous_total, 149.0));
        assert_eq!(
            report.comparison.categories.get("Transport").unwrap().change,
            PercentChange::New
        );
    }

    #[test]
    fn test_dashboard_historical_averages() {
        let report = DashboardReport::build(&ledger(), &Config::default(), None).unwrap();

        let keys: Vec<String> = report.baseline_months.iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["2024-02", "2024-01", "2023-12"]);
        // Empty months count as zero
        assert!(approx_eq(report.historical_averages.amount("Housing"), 400.0));
        assert!(approx_eq(report.historical_averages.amount("Food"), 11.75 / 3.0));
        assert_eq!(report.historical_averages.amount("Education"), 0.0);
        assert_eq!(report.historical_averages.len(), 7);
    }

    #[test]
    fn test_dashboard_explicit_empty_month() {
        let report =
            DashboardReport::build(&ledger(), &Config::default(), Some(month("2023-06"))).unwrap();
        assert!(report.transactions.is_empty());
        assert!(report.category_totals.is_empty());
        assert_eq!(report.budget.tier, BudgetTier::Ok);
        assert_eq!(report.budget.percentage_used, 0);
    }

    #[test]
    fn test_expense_listing() {
        let filter = ExpenseFilter::new().with_search("coffee");
        let listing = ExpenseListing::build(&ledger(), &filter);

        assert_eq!(listing.count, 3);
        assert!(approx_eq(listing.total, 16.25));
        assert_eq!(listing.search.as_deref(), Some("coffee"));
        assert_eq!(listing.categories.len(), 4);
    }

    #[test]
    fn test_expense_listing_bucket_totals() {
        let filter = ExpenseFilter::new().with_search("coffee");
        let listing = ExpenseListing::build(&ledger(), &filter);
        assert!(listing.bucket_totals.is_none());

        let listing = listing.with_bucket_totals(DateBucket::Month);
        let buckets = listing.bucket_totals.unwrap();
        assert_eq!(buckets.bucket, DateBucket::Month);
        let keys: Vec<&String> = buckets.totals.keys().collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert!(approx_eq(buckets.totals.amount("2024-02"), 6.50));
        assert!(approx_eq(buckets.totals.total(), 16.25));
    }

    #[test]
    fn test_monthly_report_ordering() {
        let report = MonthlyReport::build(&ledger(), 3000.0).unwrap();

        let keys: Vec<String> = report.months.iter().map(|m| m.month.key()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-02", "2024-01"]);

        let march = &report.months[0];
        let ids: Vec<i64> = march.transactions.iter().map(|t| t.id).collect();
        // Newest date first, ledger order kept for equal dates
        assert_eq!(ids, vec![1, 4, 2, 3]);
        assert_eq!(march.label, "March 2024");
    }

    #[test]
    fn test_monthly_report_budget_status() {
        let report = MonthlyReport::build(&ledger(), 1000.0).unwrap();
        let january = &report.months[2];
        assert_eq!(january.budget.tier, BudgetTier::Over);
        assert!(approx_eq(january.budget.remaining, -205.25));
    }

    #[test]
    fn test_monthly_report_invalid_budget() {
        assert!(matches!(
            MonthlyReport::build(&ledger(), 0.0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_statistics_zero_filled() {
        let report = StatisticsReport::build(&ledger(), &Config::default(), 3, None).unwrap();

        assert_eq!(report.periods.len(), 3);
        assert_eq!(report.periods[0].month.key(), "2024-03");
        assert_eq!(report.periods[2].month.key(), "2024-01");
        for period in &report.periods {
            assert_eq!(period.category_sums.len(), 7);
        }
        assert_eq!(report.periods[0].category_sums.amount("Housing"), 0.0);
        assert!(approx_eq(report.periods[2].total, 1205.25));
    }

    #[test]
    fn test_statistics_means_and_flags() {
        let report = StatisticsReport::build(&ledger(), &Config::default(), 3, None).unwrap();

        assert!(approx_eq(report.means.amount("Housing"), 400.0));
        assert!(report.periods[2].above_mean.get("Housing").copied().unwrap());
        assert!(!report.periods[0].above_mean.get("Housing").copied().unwrap());

        let expected_average = (230.82 + 149.0 + 1205.25) / 3.0;
        assert!(approx_eq(report.average_total, expected_average));
    }

    #[test]
    fn test_statistics_shares() {
        let report = StatisticsReport::build(&ledger(), &Config::default(), 3, None).unwrap();

        let share_sum: f64 = report.periods[0].shares.values().sum();
        assert!(approx_eq(share_sum, 100.0));
        assert!(approx_eq(
            report.periods[0].shares.amount("Transport"),
            70.0 / 230.82 * 100.0
        ));
    }

    #[test]
    fn test_statistics_empty_month_has_zero_shares() {
        let report =
            StatisticsReport::build(&ledger(), &Config::default(), 1, Some(month("2023-06"))).unwrap();
        assert_eq!(report.periods[0].total, 0.0);
        assert!(report.periods[0].shares.values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_statistics_zero_months() {
        assert!(matches!(
            StatisticsReport::build(&ledger(), &Config::default(), 0, None),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_statistics_window_past_earliest_month() {
        let earliest = Month::from_date(chrono::NaiveDate::MIN);
        assert!(matches!(
            StatisticsReport::build(&ledger(), &Config::default(), 2, Some(earliest)),
            Err(Error::InvalidInput(_))
        ));
        assert!(StatisticsReport::build(&ledger(), &Config::default(), 1, Some(earliest)).is_ok());
    }

    #[test]
    fn test_statistics_huge_window() {
        assert!(matches!(
            StatisticsReport::build(&ledger(), &Config::default(), usize::MAX, None),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_statistics_retain_category() {
        let mut report = StatisticsReport::build(&ledger(), &Config::default(), 3, None).unwrap();
        report.retain_category(&Category::new("Food"));

        assert_eq!(report.categories, vec![Category::new("Food")]);
        assert_eq!(report.means.len(), 1);
        assert!(approx_eq(report.means.amount("Food"), 16.25 / 3.0));
        for period in &report.periods {
            assert_eq!(period.category_sums.len(), 1);
            assert_eq!(period.shares.len(), 1);
            assert_eq!(period.above_mean.len(), 1);
        }
        // Totals still cover the whole month
        assert!(approx_eq(report.periods[0].total, 230.82));
        assert!(approx_eq(
            report.periods[0].shares.amount("Food"),
            4.50 / 230.82 * 100.0
        ));
    }

    #[test]
    fn test_unlisted_category_is_reported() {
        let ledger = Ledger::from_transactions(vec![tx(1, "Vet", 80.0, "Pets", "2024-03-02")]).unwrap();
        let report = StatisticsReport::build(&ledger, &Config::default(), 1, None).unwrap();

        assert_eq!(report.categories.len(), 8);
        assert_eq!(report.categories.last().unwrap().as_str(), "Pets");
        assert!(approx_eq(report.periods[0].category_sums.amount("Pets"), 80.0));
    }
}
