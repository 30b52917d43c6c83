//! Descriptive statistics shared by the estimators.
use crate::core::error::{HedgeError, HedgeResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trading-day annualization factor applied to period returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Price points assumed per contract month when sizing evaluation windows.
pub const TRADING_DAYS_PER_MONTH: usize = 20;

/// A month is a high season when its figure exceeds this multiple of the
/// mean across months.
pub const HIGH_SEASON_MULTIPLIER: f64 = 1.5;

/// Scaling factors that turn period statistics into annual figures.
///
/// The defaults treat every price point as a trading day, whatever the
/// actual sampling interval of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annualization {
    pub periods_per_year: f64,
    pub periods_per_month: usize,
}

impl Default for Annualization {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
            periods_per_month: TRADING_DAYS_PER_MONTH,
        }
    }
}

/// How values falling in the same calendar month are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyAggregate {
    Mean,
    Sum,
}

/// Period-over-period percentage returns, as fractions.
///
/// Yields `n - 1` values for `n` prices; the first price has no predecessor.
pub fn percentage_returns(prices: &[f64]) -> HedgeResult<Vec<f64>> {
    prices
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                return Err(HedgeError::DivisionByZero {
                    ratio: "period return",
                });
            }
            Ok(pair[1] / pair[0] - 1.0)
        })
        .collect()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two observations carry no dispersion and yield zero.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Finds the calendar month (1-12) whose aggregated value stands out.
///
/// Values are bucketed by calendar month across all years. The month with
/// the largest bucket is reported only when it exceeds
/// [`HIGH_SEASON_MULTIPLIER`] times the mean over all populated months.
/// Equal peaks resolve to the earlier month.
pub fn high_season_month<I>(observations: I, aggregate: MonthlyAggregate) -> Option<u32>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (date, value) in observations {
        let entry = buckets.entry(date.month()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let monthly: Vec<(u32, f64)> = buckets
        .into_iter()
        .map(|(month, (total, count))| match aggregate {
            MonthlyAggregate::Mean => (month, total / count as f64),
            MonthlyAggregate::Sum => (month, total),
        })
        .collect();

    let values: Vec<f64> = monthly.iter().map(|(_, v)| *v).collect();
    let overall = mean(&values)?;

    let (peak_month, peak_value) = monthly
        .iter()
        .copied()
        .fold(None, |best: Option<(u32, f64)>, (month, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((month, value)),
        })?;

    (peak_value > HIGH_SEASON_MULTIPLIER * overall).then_some(peak_month)
}
