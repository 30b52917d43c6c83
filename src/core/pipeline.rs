//! Composes the analytics into a single hedge recommendation.
use crate::core::commodity::CommodityMapper;
use crate::core::contract::{self, ContractCandidate};
use crate::core::cost_driver;
use crate::core::duration::{self, HedgeDuration};
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::profile::{self, FinancialProfile};
use crate::core::records::{
    BalanceSheetRecord, CashFlowRecord, CommodityPricePoint, ExpenseRecord, ProfitLossRecord,
};
use crate::core::stats::Annualization;
use crate::core::volatility;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Validated tables ready for [`run`].
///
/// Only [`load_inputs`] builds this, so commodity prices are always in
/// chronological order and every table has at least one row.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInputs {
    expenses: Vec<ExpenseRecord>,
    cash_flows: Vec<CashFlowRecord>,
    balance_sheet: Vec<BalanceSheetRecord>,
    profit_loss: Vec<ProfitLossRecord>,
    commodity_prices: Vec<CommodityPricePoint>,
}

impl PipelineInputs {
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn commodity_prices(&self) -> &[CommodityPricePoint] {
        &self.commodity_prices
    }

    /// Chronological price series of one commodity.
    pub fn series_for(&self, commodity: &str) -> Vec<CommodityPricePoint> {
        self.commodity_prices
            .iter()
            .filter(|p| p.commodity == commodity)
            .cloned()
            .collect()
    }
}

/// Tunable knobs of the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSettings {
    pub mapper: CommodityMapper,
    pub annualization: Annualization,
}

/// Final output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub primary_cost_category: String,
    pub primary_cost: f64,
    pub mapped_commodity: String,
    pub financial_profile: FinancialProfile,
    pub commodity_volatility_pct: f64,
    pub high_season_month: Option<u32>,
    pub recommended_hedge_duration_class: HedgeDuration,
    pub best_contract: Option<ContractCandidate>,
}

fn require_rows<T>(rows: &[T], table: &'static str) -> HedgeResult<()> {
    if rows.is_empty() {
        return Err(HedgeError::EmptyInput { table });
    }
    Ok(())
}

/// Validates the raw tables at the pipeline boundary.
///
/// Each table must be non-empty, expense amounts must be finite and not
/// negative, and every commodity row must carry a name and a positive,
/// finite price. Commodity prices are stably sorted by date
/// so every later stage sees chronological series.
pub fn load_inputs(
    expenses: Vec<ExpenseRecord>,
    cash_flows: Vec<CashFlowRecord>,
    balance_sheet: Vec<BalanceSheetRecord>,
    profit_loss: Vec<ProfitLossRecord>,
    mut commodity_prices: Vec<CommodityPricePoint>,
) -> HedgeResult<PipelineInputs> {
    require_rows(&expenses, "expenses")?;
    require_rows(&cash_flows, "cash flows")?;
    require_rows(&balance_sheet, "balance sheet")?;
    require_rows(&profit_loss, "profit and loss")?;
    require_rows(&commodity_prices, "commodity prices")?;

    for (row, expense) in expenses.iter().enumerate() {
        if !expense.amount.is_finite() || expense.amount < 0.0 {
            return Err(HedgeError::InvalidRecord {
                table: "expenses",
                row: row + 1,
                reason: format!("amount must not be negative, got {}", expense.amount),
            });
        }
    }

    for (row, point) in commodity_prices.iter().enumerate() {
        if point.commodity.trim().is_empty() {
            return Err(HedgeError::InvalidRecord {
                table: "commodity prices",
                row: row + 1,
                reason: "missing commodity name".to_string(),
            });
        }
        if !point.price.is_finite() || point.price <= 0.0 {
            return Err(HedgeError::InvalidRecord {
                table: "commodity prices",
                row: row + 1,
                reason: format!("price must be positive, got {}", point.price),
            });
        }
    }

    if !commodity_prices.is_sorted_by_key(|p| p.date) {
        debug!("Commodity prices are not in date order, sorting");
        commodity_prices.sort_by_key(|p| p.date);
    }

    Ok(PipelineInputs {
        expenses,
        cash_flows,
        balance_sheet,
        profit_loss,
        commodity_prices,
    })
}

/// Runs the pipeline with default settings.
pub fn run(inputs: &PipelineInputs) -> HedgeResult<Recommendation> {
    run_with(inputs, &PipelineSettings::default())
}

/// Runs every stage in order and assembles the recommendation.
///
/// A missing best contract is a valid outcome, not an error.
pub fn run_with(
    inputs: &PipelineInputs,
    settings: &PipelineSettings,
) -> HedgeResult<Recommendation> {
    info!("Selecting primary cost driver...");
    let primary = cost_driver::select_primary_cost(&inputs.expenses)?;
    info!(
        "Primary Cost Category: {}, Primary Cost: {}",
        primary.category, primary.total
    );

    let mapped_commodity = settings.mapper.map(&primary.category).to_string();
    info!(
        "Mapped Commodity for '{}': {}",
        primary.category, mapped_commodity
    );

    let series = inputs.series_for(&mapped_commodity);
    if series.is_empty() {
        return Err(HedgeError::UnknownCommodity {
            commodity: mapped_commodity,
        });
    }

    info!("Calculating volatility and seasonality...");
    let estimate = volatility::estimate_volatility_and_seasonality(
        &series,
        settings.annualization.periods_per_year,
    )?;

    info!("Assessing financial profile...");
    let financial_profile = profile::assess_financial_profile(
        &inputs.cash_flows,
        &inputs.balance_sheet,
        &inputs.profit_loss,
    )?;
    info!("Risk tolerance: {}", financial_profile.risk_tolerance);

    info!("Recommending hedge duration...");
    let hedge_duration = duration::recommend_hedge_duration(
        estimate.volatility_pct,
        &financial_profile,
        &inputs.expenses,
    );
    info!("Recommended Hedge Duration: {hedge_duration}");

    info!("Analyzing and recommending contracts...");
    let best_contract = contract::recommend_contract(
        &series,
        hedge_duration,
        financial_profile.risk_tolerance,
        &settings.annualization,
    )?;

    Ok(Recommendation {
        primary_cost_category: primary.category,
        primary_cost: primary.total,
        mapped_commodity,
        financial_profile,
        commodity_volatility_pct: estimate.volatility_pct,
        high_season_month: estimate.high_season_month,
        recommended_hedge_duration_class: hedge_duration,
        best_contract,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::RiskTolerance;
    use chrono::{Months, NaiveDate};

    fn month(i: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 31)
            .unwrap()
            .checked_add_months(Months::new(i))
            .unwrap()
    }

    fn expense(category: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord {
            date: month(0),
            category: category.to_string(),
            amount,
        }
    }

    fn moderate_tables() -> (
        Vec<CashFlowRecord>,
        Vec<BalanceSheetRecord>,
        Vec<ProfitLossRecord>,
    ) {
        (
            vec![CashFlowRecord {
                date: month(0),
                inflow: 5000.0,
                outflow: 4000.0,
            }],
            vec![BalanceSheetRecord {
                date: month(0),
                current_assets: 20000.0,
                current_liabilities: 10000.0,
                long_term_debt: 5000.0,
                equity: 15000.0,
            }],
            vec![ProfitLossRecord {
                date: month(0),
                revenue: 10000.0,
                net_income: 1000.0,
            }],
        )
    }

    fn flat_corn(months: u32) -> Vec<CommodityPricePoint> {
        (0..months)
            .map(|i| CommodityPricePoint::new(month(i), "Corn", 100.0))
            .collect()
    }

    fn inputs(expenses: Vec<ExpenseRecord>, prices: Vec<CommodityPricePoint>) -> PipelineInputs {
        let (cash_flows, balance_sheet, profit_loss) = moderate_tables();
        load_inputs(expenses, cash_flows, balance_sheet, profit_loss, prices).unwrap()
    }

    #[test]
    fn test_flat_corn_scenario() {
        let inputs = inputs(
            vec![expense("Food Supplies", 1000.0), expense("Beverages", 500.0)],
            flat_corn(24),
        );
        let rec = run(&inputs).unwrap();

        assert_eq!(rec.primary_cost_category, "Food Supplies");
        assert_eq!(rec.primary_cost, 1000.0);
        assert_eq!(rec.mapped_commodity, "Corn");
        assert_eq!(rec.commodity_volatility_pct, 0.0);
        assert_eq!(rec.high_season_month, None);
        assert_eq!(rec.financial_profile.current_ratio, 2.0);
        assert_eq!(rec.financial_profile.debt_to_equity_ratio, 1.0);
        assert_eq!(rec.financial_profile.profit_margin, 0.1);
        assert_eq!(rec.financial_profile.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(rec.recommended_hedge_duration_class, HedgeDuration::MediumTerm);

        let best = rec.best_contract.unwrap();
        assert_eq!(best.duration_months, 3);
        assert_eq!(best.historical_return_pct, 0.0);
        assert_eq!(best.historical_volatility_pct, 0.0);
    }

    #[test]
    fn test_run_is_deterministic() {
        let mut prices = flat_corn(30);
        for (i, p) in prices.iter_mut().enumerate() {
            p.price = 100.0 + (i as f64 * 1.7).sin() * 12.0;
        }
        let inputs = inputs(
            vec![expense("Food Supplies", 1000.0), expense("Utilities", 200.0)],
            prices,
        );
        assert_eq!(run(&inputs).unwrap(), run(&inputs).unwrap());
    }

    #[test]
    fn test_unsorted_prices_are_resorted() {
        let mut prices = flat_corn(6);
        prices[5].price = 160.0;
        let mut shuffled = prices.clone();
        shuffled.reverse();

        let (cf, bs, pl) = moderate_tables();
        let sorted = load_inputs(
            vec![expense("Food Supplies", 1.0)],
            cf.clone(),
            bs.clone(),
            pl.clone(),
            prices,
        )
        .unwrap();
        let resorted =
            load_inputs(vec![expense("Food Supplies", 1.0)], cf, bs, pl, shuffled).unwrap();

        assert_eq!(sorted.commodity_prices(), resorted.commodity_prices());
        assert_eq!(run(&sorted).unwrap(), run(&resorted).unwrap());
    }

    #[test]
    fn test_unmapped_commodity_without_prices() {
        let inputs = inputs(vec![expense("Beverages", 1000.0)], flat_corn(12));
        let err = run(&inputs).unwrap_err();
        assert_eq!(
            err,
            HedgeError::UnknownCommodity {
                commodity: "Sugar".to_string()
            }
        );
    }

    #[test]
    fn test_single_price_is_insufficient() {
        let inputs = inputs(vec![expense("Food Supplies", 10.0)], flat_corn(1));
        let err = run(&inputs).unwrap_err();
        assert!(matches!(err, HedgeError::InsufficientData { found: 1, .. }));
    }

    #[test]
    fn test_load_inputs_rejects_empty_and_invalid_tables() {
        let (cf, bs, pl) = moderate_tables();
        let err = load_inputs(vec![], cf.clone(), bs.clone(), pl.clone(), flat_corn(3))
            .unwrap_err();
        assert_eq!(err, HedgeError::EmptyInput { table: "expenses" });

        let err = load_inputs(
            vec![expense("Food Supplies", 1.0)],
            cf.clone(),
            bs.clone(),
            pl.clone(),
            vec![],
        )
        .unwrap_err();
        assert_eq!(
            err,
            HedgeError::EmptyInput {
                table: "commodity prices"
            }
        );

        let mut prices = flat_corn(3);
        prices[1].price = 0.0;
        let err = load_inputs(
            vec![expense("Food Supplies", 1.0)],
            cf.clone(),
            bs.clone(),
            pl.clone(),
            prices,
        )
        .unwrap_err();
        assert!(matches!(err, HedgeError::InvalidRecord { row: 2, .. }));

        let mut prices = flat_corn(3);
        prices[0].commodity = "  ".to_string();
        let err = load_inputs(vec![expense("Food Supplies", 1.0)], cf, bs, pl, prices)
            .unwrap_err();
        assert!(matches!(err, HedgeError::InvalidRecord { row: 1, .. }));
    }

    #[test]
    fn test_load_inputs_rejects_negative_expense() {
        let (cf, bs, pl) = moderate_tables();
        let expenses = vec![expense("Food Supplies", 10.0), expense("Refunds", -5.0)];
        let err = load_inputs(expenses, cf.clone(), bs.clone(), pl.clone(), flat_corn(3))
            .unwrap_err();
        assert!(matches!(
            err,
            HedgeError::InvalidRecord {
                table: "expenses",
                row: 2,
                ..
            }
        ));

        // Zero is a valid amount
        let expenses = vec![expense("Food Supplies", 10.0), expense("Beverages", 0.0)];
        assert!(load_inputs(expenses, cf, bs, pl, flat_corn(3)).is_ok());
    }

    #[test]
    fn test_recommendation_json_uses_duration_label() {
        let inputs = inputs(vec![expense("Food Supplies", 1000.0)], flat_corn(24));
        let json = serde_json::to_value(run(&inputs).unwrap()).unwrap();
        assert_eq!(json["recommended_hedge_duration_class"], "Medium-Term (3-12 months)");
    }

    #[test]
    fn test_custom_default_commodity() {
        let mut prices = flat_corn(12);
        for p in prices.iter_mut() {
            p.commodity = "Wheat".to_string();
        }
        let settings = PipelineSettings {
            mapper: CommodityMapper::new(Default::default(), "Wheat"),
            ..Default::default()
        };
        let rec = run_with(&inputs(vec![expense("Labor", 10.0)], prices), &settings).unwrap();
        assert_eq!(rec.mapped_commodity, "Wheat");
    }

    #[test]
    fn test_high_risk_business_gets_short_term_hedge() {
        let (cf, mut bs, pl) = moderate_tables();
        bs[0].long_term_debt = 40000.0;
        let inputs = load_inputs(
            vec![expense("Food Supplies", 1000.0)],
            cf,
            bs,
            pl,
            flat_corn(24),
        )
        .unwrap();
        let rec = run(&inputs).unwrap();
        assert_eq!(rec.financial_profile.risk_tolerance, RiskTolerance::High);
        assert_eq!(rec.recommended_hedge_duration_class, HedgeDuration::ShortTerm);
        assert_eq!(rec.best_contract.unwrap().duration_months, 1);
    }
}
