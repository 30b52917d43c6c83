//! Volatility and seasonality of a commodity price series.
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::records::CommodityPricePoint;
use crate::core::stats::{self, MonthlyAggregate};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    /// Annualized volatility in percent.
    pub volatility_pct: f64,
    pub high_season_month: Option<u32>,
}

/// Estimates annualized volatility and the price high season.
///
/// `series` must be one commodity's prices in chronological order. Volatility
/// scales the sample deviation of period returns by `sqrt(periods_per_year)`
/// regardless of the series' actual sampling interval.
pub fn estimate_volatility_and_seasonality(
    series: &[CommodityPricePoint],
    periods_per_year: f64,
) -> HedgeResult<VolatilityEstimate> {
    if series.len() < 2 {
        return Err(HedgeError::InsufficientData {
            series: series
                .first()
                .map_or("commodity prices".to_string(), |p| {
                    format!("{} prices", p.commodity)
                }),
            required: 2,
            found: series.len(),
        });
    }

    let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
    let returns = stats::percentage_returns(&prices)?;
    let volatility = stats::sample_std_dev(&returns) * periods_per_year.sqrt();

    let high_season_month = stats::high_season_month(
        series.iter().map(|p| (p.date, p.price)),
        MonthlyAggregate::Mean,
    );

    debug!(
        "Volatility: {:.2}%, High Season: {:?}",
        volatility * 100.0,
        high_season_month
    );
    Ok(VolatilityEstimate {
        volatility_pct: volatility * 100.0,
        high_season_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::TRADING_DAYS_PER_YEAR;
    use chrono::{Months, NaiveDate};

    fn monthly_series(prices: &[f64]) -> Vec<CommodityPricePoint> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 31).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                CommodityPricePoint::new(
                    start.checked_add_months(Months::new(i as u32)).unwrap(),
                    "Corn",
                    *price,
                )
            })
            .collect()
    }

    #[test]
    fn test_constant_series_has_no_volatility() {
        let series = monthly_series(&[100.0; 24]);
        let estimate = estimate_volatility_and_seasonality(&series, TRADING_DAYS_PER_YEAR).unwrap();
        assert_eq!(estimate.volatility_pct, 0.0);
        assert_eq!(estimate.high_season_month, None);
    }

    #[test]
    fn test_volatility_is_annualized_percent() {
        let series = monthly_series(&[100.0, 110.0, 99.0]);
        let estimate = estimate_volatility_and_seasonality(&series, TRADING_DAYS_PER_YEAR).unwrap();
        // Returns are +10% and -10%; sample std dev = sqrt(0.02)
        let expected = 0.02f64.sqrt() * 252.0f64.sqrt() * 100.0;
        assert!((estimate.volatility_pct - expected).abs() < 1e-9);
    }

    #[test]
    fn test_price_spike_flags_high_season() {
        let mut prices = vec![100.0; 12];
        prices[5] = 400.0; // June
        let estimate =
            estimate_volatility_and_seasonality(&monthly_series(&prices), TRADING_DAYS_PER_YEAR)
                .unwrap();
        assert_eq!(estimate.high_season_month, Some(6));
        assert!(estimate.volatility_pct > 0.0);
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let err = estimate_volatility_and_seasonality(&monthly_series(&[100.0]), 252.0)
            .unwrap_err();
        assert_eq!(
            err,
            HedgeError::InsufficientData {
                series: "Corn prices".to_string(),
                required: 2,
                found: 1,
            }
        );
    }
}
