use crate::core::commodity::{CommodityMapper, DEFAULT_COMMODITY, DEFAULT_MAPPING};
use crate::core::pipeline::PipelineSettings;
use crate::core::stats::{Annualization, TRADING_DAYS_PER_MONTH, TRADING_DAYS_PER_YEAR};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path, path::PathBuf};
use tracing::debug;

/// A table stored in a CSV file or in one sheet of an `.xlsx` workbook.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TableSource {
    pub path: PathBuf,
    pub sheet: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DataSources {
    pub expenses: TableSource,
    pub cash_flows: TableSource,
    pub balance_sheet: TableSource,
    pub profit_loss: TableSource,
    pub commodity_prices: TableSource,
}

impl DataSources {
    fn sources_mut(&mut self) -> [&mut TableSource; 5] {
        [
            &mut self.expenses,
            &mut self.cash_flows,
            &mut self.balance_sheet,
            &mut self.profit_loss,
            &mut self.commodity_prices,
        ]
    }

    /// Rebases relative table paths onto `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for source in self.sources_mut() {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }
}

fn default_commodity() -> String {
    DEFAULT_COMMODITY.to_string()
}

fn default_mapping() -> BTreeMap<String, String> {
    DEFAULT_MAPPING
        .iter()
        .map(|(category, commodity)| (category.to_string(), commodity.to_string()))
        .collect()
}

/// Upper bound on `periods_per_month`; daily data has about 23 points a month.
const MAX_PERIODS_PER_MONTH: usize = 1_000;

fn default_periods_per_year() -> f64 {
    TRADING_DAYS_PER_YEAR
}

fn default_periods_per_month() -> usize {
    TRADING_DAYS_PER_MONTH
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PipelineConfig {
    #[serde(default = "default_commodity")]
    pub default_commodity: String,
    #[serde(default = "default_mapping")]
    pub commodity_mapping: BTreeMap<String, String>,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
    #[serde(default = "default_periods_per_month")]
    pub periods_per_month: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            default_commodity: default_commodity(),
            commodity_mapping: default_mapping(),
            periods_per_year: default_periods_per_year(),
            periods_per_month: default_periods_per_month(),
        }
    }
}

impl PipelineConfig {
    /// Rejects annualization factors that would turn the statistics into NaN
    /// or empty every contract window.
    pub fn validate(&self) -> Result<()> {
        if !self.periods_per_year.is_finite() || self.periods_per_year <= 0.0 {
            bail!(
                "pipeline.periods_per_year must be a positive number, got {}",
                self.periods_per_year
            );
        }
        if !(1..=MAX_PERIODS_PER_MONTH).contains(&self.periods_per_month) {
            bail!(
                "pipeline.periods_per_month must be between 1 and {MAX_PERIODS_PER_MONTH}, got {}",
                self.periods_per_month
            );
        }
        Ok(())
    }

    pub fn to_settings(&self) -> Result<PipelineSettings> {
        self.validate()?;
        Ok(PipelineSettings {
            mapper: CommodityMapper::new(
                self.commodity_mapping.clone(),
                self.default_commodity.clone(),
            ),
            annualization: Annualization {
                periods_per_year: self.periods_per_year,
                periods_per_month: self.periods_per_month,
            },
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub data: DataSources,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "hedgewise", "hedgewise")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        if let Some(base) = path.as_ref().parent() {
            config.data.resolve_relative_to(base);
        }
        config
            .pipeline
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
