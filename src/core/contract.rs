//! Evaluates candidate forward contracts and picks the best fit.
//!
//! Each duration class offers three contract terms. A term is scored on the
//! trailing window of the price series it spans: historical return and
//! volatility, then a trend-adjusted projection of both. Terms without enough
//! data are dropped rather than failing the whole evaluation.
use crate::core::duration::HedgeDuration;
use crate::core::error::HedgeResult;
use crate::core::profile::RiskTolerance;
use crate::core::records::CommodityPricePoint;
use crate::core::stats::{self, Annualization};
use rust_decimal::{Decimal, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCandidate {
    pub duration_months: u32,
    pub historical_return_pct: f64,
    pub historical_volatility_pct: f64,
    pub expected_future_return_pct: f64,
    pub expected_future_volatility_pct: f64,
}

impl ContractCandidate {
    /// Expected return per unit of expected volatility.
    ///
    /// The `+ 1` keeps near-zero volatility from blowing the ratio up.
    pub fn reward_to_risk(&self) -> f64 {
        self.expected_future_return_pct / (self.expected_future_volatility_pct + 1.0)
    }
}

/// Rounds to two decimals, half to even, on the exact binary value.
///
/// `2.675` is stored as `2.67499..` and rounds down, as it would in a
/// calculator working on doubles.
fn round_pct(pct: f64) -> f64 {
    Decimal::from_f64_retain(pct)
        .and_then(|d| d.round_dp(2).to_f64())
        .unwrap_or(pct)
}

/// Converts a fraction to a percentage rounded to two decimals.
fn to_rounded_pct(fraction: f64) -> f64 {
    round_pct(fraction * 100.0)
}

/// Scores a single contract term against the tail of `series`.
///
/// Returns `Ok(None)` when the trailing window holds fewer than two prices.
pub fn evaluate_term(
    series: &[CommodityPricePoint],
    term_months: u32,
    annualization: &Annualization,
) -> HedgeResult<Option<ContractCandidate>> {
    let window_len = (term_months as usize).saturating_mul(annualization.periods_per_month);
    let window = &series[series.len().saturating_sub(window_len)..];
    if window.len() < 2 {
        debug!("Not enough data for {term_months}-month duration. Skipping this contract.");
        return Ok(None);
    }

    let prices: Vec<f64> = window.iter().map(|p| p.price).collect();
    let returns = stats::percentage_returns(&prices)?;
    let Some(mean_return) = stats::mean(&returns) else {
        debug!("No period returns for {term_months}-month duration. Skipping this contract.");
        return Ok(None);
    };

    let historical_return = mean_return * window_len as f64;
    let historical_volatility =
        stats::sample_std_dev(&returns) * annualization.periods_per_year.sqrt();

    let (Some(first), Some(last)) = (prices.first(), prices.last()) else {
        debug!("Insufficient data points for forward analysis on {term_months}-month duration.");
        return Ok(None);
    };
    let trend = last / first;
    let expected_future_return = historical_return * trend;
    let expected_future_volatility = historical_volatility * trend.sqrt();

    Ok(Some(ContractCandidate {
        duration_months: term_months,
        historical_return_pct: to_rounded_pct(historical_return),
        historical_volatility_pct: to_rounded_pct(historical_volatility),
        expected_future_return_pct: to_rounded_pct(expected_future_return),
        expected_future_volatility_pct: to_rounded_pct(expected_future_volatility),
    }))
}

/// Scores every contract term of `duration`, shortest first.
pub fn evaluate_contracts(
    series: &[CommodityPricePoint],
    duration: HedgeDuration,
    annualization: &Annualization,
) -> HedgeResult<Vec<ContractCandidate>> {
    let mut candidates = Vec::new();
    for term in duration.contract_terms() {
        if let Some(candidate) = evaluate_term(series, term, annualization)? {
            debug!("Candidate contract: {candidate:?}");
            candidates.push(candidate);
        }
    }
    Ok(candidates)
}

/// Picks the candidate matching the business's risk appetite.
///
/// High risk tolerance preserves capital with the least volatile contract;
/// otherwise the best reward-to-risk ratio wins. Candidates are expected in
/// ascending term order and ties keep the earliest, i.e. the shortest term.
pub fn select_best_contract(
    candidates: &[ContractCandidate],
    risk_tolerance: RiskTolerance,
) -> Option<&ContractCandidate> {
    let mut best: Option<&ContractCandidate> = None;
    for candidate in candidates {
        let better = match best {
            None => true,
            Some(current) => match risk_tolerance {
                RiskTolerance::High => {
                    candidate.historical_volatility_pct < current.historical_volatility_pct
                }
                RiskTolerance::Moderate => candidate.reward_to_risk() > current.reward_to_risk(),
            },
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Evaluates the duration's contract terms and returns the best, if any survives.
pub fn recommend_contract(
    series: &[CommodityPricePoint],
    duration: HedgeDuration,
    risk_tolerance: RiskTolerance,
    annualization: &Annualization,
) -> HedgeResult<Option<ContractCandidate>> {
    let candidates = evaluate_contracts(series, duration, annualization)?;
    let best = select_best_contract(&candidates, risk_tolerance).cloned();
    match &best {
        Some(contract) => debug!("Best Contract: {contract:?}"),
        None => debug!("No viable contracts found."),
    }
    Ok(best)
}
