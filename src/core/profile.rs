//! Financial risk profile derived from accounting statements.
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::records::{BalanceSheetRecord, CashFlowRecord, ProfitLossRecord};
use crate::core::stats;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

const MAX_DEBT_TO_EQUITY: f64 = 2.0;
const MIN_CURRENT_RATIO: f64 = 1.5;
const MIN_PROFIT_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    High,
    Moderate,
}

impl Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskTolerance::High => "High",
                RiskTolerance::Moderate => "Moderate",
            }
        )
    }
}

impl RiskTolerance {
    /// Classifies a business from its leverage, liquidity and margin.
    ///
    /// Any single stressed ratio puts the business in the `High` tier.
    pub fn classify(debt_to_equity_ratio: f64, current_ratio: f64, profit_margin: f64) -> Self {
        if debt_to_equity_ratio > MAX_DEBT_TO_EQUITY
            || current_ratio < MIN_CURRENT_RATIO
            || profit_margin < MIN_PROFIT_MARGIN
        {
            RiskTolerance::High
        } else {
            RiskTolerance::Moderate
        }
    }
}

/// Snapshot of the business's financial health, recomputed on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub cash_flow_stability: f64,
    pub current_ratio: f64,
    pub debt_to_equity_ratio: f64,
    pub profit_margin: f64,
    pub risk_tolerance: RiskTolerance,
}

fn mean_of<T>(rows: &[T], table: &'static str, field: impl Fn(&T) -> f64) -> HedgeResult<f64> {
    let values: Vec<f64> = rows.iter().map(field).collect();
    stats::mean(&values).ok_or(HedgeError::EmptyInput { table })
}

fn ratio(numerator: f64, denominator: f64, name: &'static str) -> HedgeResult<f64> {
    if denominator == 0.0 {
        return Err(HedgeError::DivisionByZero { ratio: name });
    }
    Ok(numerator / denominator)
}

/// Derives liquidity, leverage and profitability ratios from period averages.
pub fn assess_financial_profile(
    cash_flows: &[CashFlowRecord],
    balance_sheet: &[BalanceSheetRecord],
    profit_loss: &[ProfitLossRecord],
) -> HedgeResult<FinancialProfile> {
    let avg_inflow = mean_of(cash_flows, "cash flows", |r| r.inflow)?;
    let avg_outflow = mean_of(cash_flows, "cash flows", |r| r.outflow)?;

    let avg_assets = mean_of(balance_sheet, "balance sheet", |r| r.current_assets)?;
    let avg_liabilities = mean_of(balance_sheet, "balance sheet", |r| r.current_liabilities)?;
    let avg_long_term_debt = mean_of(balance_sheet, "balance sheet", |r| r.long_term_debt)?;
    let avg_equity = mean_of(balance_sheet, "balance sheet", |r| r.equity)?;

    let avg_revenue = mean_of(profit_loss, "profit and loss", |r| r.revenue)?;
    let avg_net_income = mean_of(profit_loss, "profit and loss", |r| r.net_income)?;

    let current_ratio = ratio(avg_assets, avg_liabilities, "current_ratio")?;
    let debt_to_equity_ratio = ratio(
        avg_liabilities + avg_long_term_debt,
        avg_equity,
        "debt_to_equity_ratio",
    )?;
    let profit_margin = ratio(avg_net_income, avg_revenue, "profit_margin")?;

    let profile = FinancialProfile {
        cash_flow_stability: avg_inflow - avg_outflow,
        current_ratio,
        debt_to_equity_ratio,
        profit_margin,
        risk_tolerance: RiskTolerance::classify(debt_to_equity_ratio, current_ratio, profit_margin),
    };
    debug!("Financial Profile: {profile:?}");
    Ok(profile)
}
