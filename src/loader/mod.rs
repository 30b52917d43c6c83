//! Loads bookkeeping exports and price histories into typed records.
//!
//! Sources are CSV files or `.xlsx` sheets with named header columns. Every
//! row is parsed eagerly; a row with a missing column or an unparseable value
//! fails the load so malformed data never reaches the pipeline.
pub mod csv_table;
pub mod excel_table;

use crate::core::config::{DataSources, TableSource};
use crate::core::records::{
    BalanceSheetRecord, CashFlowRecord, CommodityPricePoint, ExpenseRecord, ProfitLossRecord,
};
use crate::core::{PipelineInputs, load_inputs};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, info};

/// A header-keyed row with trimmed cell text.
pub type RawRow = HashMap<String, String>;

pub trait TableReader {
    fn read_rows(&self, source: &TableSource) -> Result<Vec<RawRow>>;
}

/// Picks a reader from the source file's extension.
pub fn reader_for(source: &TableSource) -> Result<Box<dyn TableReader>> {
    let ext = source
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Ok(Box::new(csv_table::CsvTableReader)),
        "xlsx" => Ok(Box::new(excel_table::ExcelTableReader)),
        _ => bail!(
            "Unsupported table format '{ext}' for {} (expected .csv or .xlsx)",
            source.path.display()
        ),
    }
}

/// Accessor for one raw row that reports failures with table and row.
struct Row<'a> {
    table: &'static str,
    line: usize,
    cells: &'a RawRow,
}

impl Row<'_> {
    fn text(&self, column: &str) -> Result<&str> {
        match self.cells.get(column).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(anyhow!(
                "{} row {}: missing value for column '{column}'",
                self.table,
                self.line
            )),
        }
    }

    fn number(&self, column: &str) -> Result<f64> {
        let raw = self.text(column)?;
        let value: f64 = raw.replace(',', "").parse().map_err(|_| {
            anyhow!(
                "{} row {}: column '{column}' is not a number: {raw}",
                self.table,
                self.line
            )
        })?;
        if !value.is_finite() {
            bail!(
                "{} row {}: column '{column}' is not finite: {raw}",
                self.table,
                self.line
            );
        }
        Ok(value)
    }

    fn date(&self, column: &str) -> Result<NaiveDate> {
        let raw = self.text(column)?;
        parse_date(raw).ok_or_else(|| {
            anyhow!(
                "{} row {}: column '{column}' is not a date: {raw}",
                self.table,
                self.line
            )
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_table<T>(
    table: &'static str,
    rows: &[RawRow],
    parse: impl Fn(&Row<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    rows.iter()
        .enumerate()
        .map(|(i, cells)| {
            parse(&Row {
                table,
                line: i + 1,
                cells,
            })
        })
        .collect()
}

pub fn parse_expenses(rows: &[RawRow]) -> Result<Vec<ExpenseRecord>> {
    parse_table("Expense Report", rows, |row| {
        Ok(ExpenseRecord {
            date: row.date("Date")?,
            category: row.text("Expense_Category")?.to_string(),
            amount: row.number("Amount")?,
        })
    })
}

pub fn parse_cash_flows(rows: &[RawRow]) -> Result<Vec<CashFlowRecord>> {
    parse_table("Cash Flow Statement", rows, |row| {
        Ok(CashFlowRecord {
            date: row.date("Date")?,
            inflow: row.number("Cash_Inflow")?,
            outflow: row.number("Cash_Outflow")?,
        })
    })
}

pub fn parse_balance_sheet(rows: &[RawRow]) -> Result<Vec<BalanceSheetRecord>> {
    parse_table("Balance Sheet", rows, |row| {
        Ok(BalanceSheetRecord {
            date: row.date("Date")?,
            current_assets: row.number("Current_Assets")?,
            current_liabilities: row.number("Current_Liabilities")?,
            long_term_debt: row.number("Long_Term_Debt")?,
            equity: row.number("Equity")?,
        })
    })
}

pub fn parse_profit_loss(rows: &[RawRow]) -> Result<Vec<ProfitLossRecord>> {
    parse_table("Profit & Loss Statement", rows, |row| {
        Ok(ProfitLossRecord {
            date: row.date("Date")?,
            revenue: row.number("Revenue")?,
            net_income: row.number("Net_Income")?,
        })
    })
}

pub fn parse_commodity_prices(rows: &[RawRow]) -> Result<Vec<CommodityPricePoint>> {
    parse_table("Commodity Prices", rows, |row| {
        Ok(CommodityPricePoint {
            date: row.date("Date")?,
            commodity: row.text("Commodity")?.to_string(),
            price: row.number("Commodity_Price")?,
        })
    })
}

fn read_source(name: &str, source: &TableSource) -> Result<Vec<RawRow>> {
    debug!("Reading {name} from {}", source.path.display());
    let rows = reader_for(source)?
        .read_rows(source)
        .with_context(|| format!("Failed to load {name}"))?;
    debug!("Read {} {name} rows", rows.len());
    Ok(rows)
}

/// Reads every configured table and validates them for the pipeline.
pub fn load_tables(data: &DataSources) -> Result<PipelineInputs> {
    info!("Loading financial and commodity data...");
    let expenses = parse_expenses(&read_source("expenses", &data.expenses)?)?;
    let cash_flows = parse_cash_flows(&read_source("cash flows", &data.cash_flows)?)?;
    let balance_sheet = parse_balance_sheet(&read_source("balance sheet", &data.balance_sheet)?)?;
    let profit_loss = parse_profit_loss(&read_source("profit and loss", &data.profit_loss)?)?;
    let commodity_prices =
        parse_commodity_prices(&read_source("commodity prices", &data.commodity_prices)?)?;
    info!("Data loaded successfully!");

    Ok(load_inputs(
        expenses,
        cash_flows,
        balance_sheet,
        profit_loss,
        commodity_prices,
    )?)
}
