//! Hedge horizon classification.
use crate::core::profile::{FinancialProfile, RiskTolerance};
use crate::core::records::ExpenseRecord;
use crate::core::stats::{self, MonthlyAggregate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

const HIGH_VOLATILITY_PCT: f64 = 25.0;
const MEDIUM_VOLATILITY_PCT: f64 = 15.0;

/// Serialized with the same labels as [`Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum HedgeDuration {
    #[serde(rename = "Short-Term (1-3 months)")]
    ShortTerm,
    #[serde(rename = "Medium-Term (3-12 months)")]
    MediumTerm,
    #[serde(rename = "Long-Term (12+ months)")]
    LongTerm,
}

impl Display for HedgeDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                HedgeDuration::ShortTerm => "Short-Term (1-3 months)",
                HedgeDuration::MediumTerm => "Medium-Term (3-12 months)",
                HedgeDuration::LongTerm => "Long-Term (12+ months)",
            }
        )
    }
}

impl HedgeDuration {
    /// Candidate contract terms, in months, ascending.
    pub fn contract_terms(&self) -> [u32; 3] {
        match self {
            HedgeDuration::ShortTerm => [1, 2, 3],
            HedgeDuration::MediumTerm => [3, 6, 12],
            HedgeDuration::LongTerm => [12, 18, 24],
        }
    }

    /// Decision table over volatility (percent), risk tier and seasonality.
    ///
    /// Branches are checked in order and the first match wins.
    pub fn classify(volatility_pct: f64, risk_tolerance: RiskTolerance, seasonal: bool) -> Self {
        if volatility_pct > HIGH_VOLATILITY_PCT || risk_tolerance == RiskTolerance::High || seasonal
        {
            HedgeDuration::ShortTerm
        } else if (volatility_pct > MEDIUM_VOLATILITY_PCT && volatility_pct <= HIGH_VOLATILITY_PCT)
            || risk_tolerance == RiskTolerance::Moderate
        {
            HedgeDuration::MediumTerm
        } else {
            HedgeDuration::LongTerm
        }
    }
}

/// Recommends a hedge horizon for the business.
///
/// Expense seasonality is derived here from monthly expense totals, apart
/// from the commodity price seasonality.
pub fn recommend_hedge_duration(
    volatility_pct: f64,
    profile: &FinancialProfile,
    expenses: &[ExpenseRecord],
) -> HedgeDuration {
    let expense_season = stats::high_season_month(
        expenses.iter().map(|e| (e.date, e.amount)),
        MonthlyAggregate::Sum,
    );
    debug!("Expense high season: {expense_season:?}");

    HedgeDuration::classify(
        volatility_pct,
        profile.risk_tolerance,
        expense_season.is_some(),
    )
}
