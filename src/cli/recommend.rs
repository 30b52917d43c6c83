use super::ui;
use crate::core::{Recommendation, config::AppConfig, run_with};
use crate::loader;
use anyhow::{Context, Result};
use chrono::Month;
use comfy_table::Cell;

fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

impl Recommendation {
    pub fn display_as_table(&self) -> String {
        let profile = &self.financial_profile;

        let mut summary = ui::new_styled_table();
        summary.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);
        summary.add_row(vec![
            ui::label_cell("Primary Cost Category"),
            Cell::new(&self.primary_cost_category),
        ]);
        summary.add_row(vec![
            ui::label_cell("Primary Cost"),
            ui::number_cell(self.primary_cost),
        ]);
        summary.add_row(vec![
            ui::label_cell("Mapped Commodity"),
            Cell::new(&self.mapped_commodity),
        ]);
        summary.add_row(vec![
            ui::label_cell("Commodity Volatility"),
            ui::change_cell(self.commodity_volatility_pct),
        ]);
        summary.add_row(vec![
            ui::label_cell("High Season"),
            ui::format_optional_cell(self.high_season_month.and_then(month_name), str::to_string),
        ]);
        summary.add_row(vec![
            ui::label_cell("Cash Flow Stability"),
            ui::number_cell(profile.cash_flow_stability),
        ]);
        summary.add_row(vec![
            ui::label_cell("Current Ratio"),
            ui::number_cell(profile.current_ratio),
        ]);
        summary.add_row(vec![
            ui::label_cell("Debt to Equity"),
            ui::number_cell(profile.debt_to_equity_ratio),
        ]);
        summary.add_row(vec![
            ui::label_cell("Profit Margin"),
            ui::change_cell(profile.profit_margin * 100.0),
        ]);
        summary.add_row(vec![
            ui::label_cell("Risk Tolerance"),
            Cell::new(profile.risk_tolerance.to_string()),
        ]);

        let mut output = format!(
            "Hedge Duration: {}\n\n",
            ui::style_text(
                &self.recommended_hedge_duration_class.to_string(),
                ui::StyleType::Title
            )
        );
        output.push_str(&summary.to_string());

        match &self.best_contract {
            Some(contract) => {
                let mut table = ui::new_styled_table();
                table.set_header(vec![
                    ui::header_cell("Duration (months)"),
                    ui::header_cell("Historical Return"),
                    ui::header_cell("Historical Volatility"),
                    ui::header_cell("Expected Return"),
                    ui::header_cell("Expected Volatility"),
                ]);
                table.add_row(vec![
                    Cell::new(contract.duration_months),
                    ui::change_cell(contract.historical_return_pct),
                    ui::change_cell(contract.historical_volatility_pct),
                    ui::change_cell(contract.expected_future_return_pct),
                    ui::change_cell(contract.expected_future_volatility_pct),
                ]);
                output.push_str(&format!(
                    "\n\n{}\n\n{table}",
                    ui::style_text("Best Contract", ui::StyleType::Highlight)
                ));
            }
            None => output.push_str(&format!(
                "\n\n{}",
                ui::style_text("No viable contracts found.", ui::StyleType::Warning)
            )),
        }

        output
    }
}

/// Loads the configured tables, runs the pipeline and prints the result.
pub fn run(config: &AppConfig, json: bool) -> Result<()> {
    let inputs = loader::load_tables(&config.data)?;
    let settings = config.pipeline.to_settings()?;
    let recommendation = run_with(&inputs, &settings)
        .context("Failed to build hedge recommendation")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        println!("{}", recommendation.display_as_table());
    }
    Ok(())
}
