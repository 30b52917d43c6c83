//! Tabular record types consumed by the pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRecord {
    pub date: NaiveDate,
    pub inflow: f64,
    pub outflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetRecord {
    pub date: NaiveDate,
    pub current_assets: f64,
    pub current_liabilities: f64,
    pub long_term_debt: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossRecord {
    pub date: NaiveDate,
    pub revenue: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityPricePoint {
    pub date: NaiveDate,
    pub commodity: String,
    pub price: f64,
}

impl CommodityPricePoint {
    pub fn new(date: NaiveDate, commodity: &str, price: f64) -> Self {
        Self {
            date,
            commodity: commodity.to_string(),
            price,
        }
    }
}
