use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use super::growth_service::grow;
use crate::calendar;
use crate::errors::CoreError;
use crate::models::chart::GrowthPoint;
use crate::models::profile::ValuationConfig;
use crate::models::transaction::Transaction;

/// Values a profile: the principal and every transaction compound
/// independently from their own date.
///
/// Pure business logic with no I/O and no hidden clock: the evaluation date
/// is always an argument. Malformed dates never raise; they contribute
/// nothing (transactions) or zero the result (start date).
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Total value on `now`.
    ///
    /// Principal grows for `max(0, now - start)` days. Each transaction dated
    /// on or before `now` grows from its own date and is added or subtracted
    /// by type; later-dated or unparseable transactions are ignored.
    /// Returns `0.0` when the start date does not parse.
    pub fn current_value(
        &self,
        config: &ValuationConfig,
        transactions: &[Transaction],
        now: NaiveDate,
    ) -> f64 {
        let Some(start) = config.parsed_start_date() else {
            debug!(start_date = %config.start_date, "unparseable start date, valuing at zero");
            return 0.0;
        };

        let days_passed = (now - start).num_days().max(0);
        let base = grow(config.initial_amount, config.annual_interest_rate, days_passed);

        let dated = dated_transactions(transactions);
        accumulate(base, config.annual_interest_rate, &dated, now)
    }

    /// One point per day offset `0..=horizon_days` from the start date.
    ///
    /// Each point applies the same accumulation as [`Self::current_value`]
    /// evaluated on that point's date, and flags the transactions dated
    /// exactly on it. Empty when the start date does not parse or the
    /// horizon is negative.
    pub fn generate_growth_series(
        &self,
        config: &ValuationConfig,
        transactions: &[Transaction],
        horizon_days: i64,
    ) -> Vec<GrowthPoint> {
        let Some(start) = config.parsed_start_date() else {
            debug!(start_date = %config.start_date, "unparseable start date, empty series");
            return Vec::new();
        };
        if horizon_days < 0 {
            return Vec::new();
        }

        let dated = dated_transactions(transactions);

        // Index transactions by date for O(1) lookup per day
        let mut by_date: HashMap<NaiveDate, Vec<&Transaction>> = HashMap::new();
        for (date, tx) in &dated {
            by_date.entry(*date).or_default().push(*tx);
        }

        let capacity = usize::try_from(horizon_days).unwrap_or(0).saturating_add(1);
        let mut series = Vec::with_capacity(capacity.min(MAX_PREALLOCATED_POINTS));

        for day in 0..=horizon_days {
            let Some(date) = calendar::shift_date(start, day) else {
                break;
            };

            let base = grow(config.initial_amount, config.annual_interest_rate, day);
            let amount = accumulate(base, config.annual_interest_rate, &dated, date);

            let transactions_on_this_day: Vec<Transaction> = by_date
                .get(&date)
                .map(|txs| txs.iter().map(|tx| (*tx).clone()).collect())
                .unwrap_or_default();

            series.push(GrowthPoint {
                date,
                day,
                amount,
                has_transaction: !transactions_on_this_day.is_empty(),
                transactions_on_this_day,
            });
        }

        series
    }

    /// Check that withdrawing `amount` on `now` would not exceed the balance.
    ///
    /// The valuation itself tolerates any history; this is the check the
    /// boundary applies before recording a new withdrawal.
    pub fn validate_withdrawal(
        &self,
        config: &ValuationConfig,
        transactions: &[Transaction],
        amount: f64,
        now: NaiveDate,
    ) -> Result<(), CoreError> {
        let available = self.current_value(config, transactions, now);
        if amount > available {
            return Err(CoreError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        Ok(())
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound on the series buffer reserved up front.
const MAX_PREALLOCATED_POINTS: usize = 1 << 16;

fn dated_transactions(transactions: &[Transaction]) -> Vec<(NaiveDate, &Transaction)> {
    transactions
        .iter()
        .filter_map(|tx| tx.parsed_date().map(|date| (date, tx)))
        .collect()
}

/// `base` plus every transaction dated on or before `at`, each grown to `at`.
fn accumulate(
    base: f64,
    annual_rate_percent: f64,
    dated: &[(NaiveDate, &Transaction)],
    at: NaiveDate,
) -> f64 {
    dated
        .iter()
        .filter(|(date, _)| *date <= at)
        .fold(base, |total, (date, tx)| {
            let days_growing = (at - *date).num_days();
            total + grow(tx.signed_amount(), annual_rate_percent, days_growing)
        })
}
