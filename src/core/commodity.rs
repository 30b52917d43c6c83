//! Expense category to hedgeable commodity mapping
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_COMMODITY: &str = "Corn";

/// Built-in category table used when the config does not supply one.
pub const DEFAULT_MAPPING: [(&str, &str); 5] = [
    ("Food Supplies", "Corn"),
    ("Beverages", "Sugar"),
    ("Utilities", "Natural Gas"),
    ("Cleaning Supplies", "Cotton"),
    ("Packaging", "Wheat"),
];

/// Maps expense categories to commodities, falling back to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityMapper {
    mapping: BTreeMap<String, String>,
    default_commodity: String,
}

impl CommodityMapper {
    pub fn new(mapping: BTreeMap<String, String>, default_commodity: impl Into<String>) -> Self {
        Self {
            mapping,
            default_commodity: default_commodity.into(),
        }
    }

    /// Returns the commodity for `category`; unmapped categories yield the default.
    pub fn map(&self, category: &str) -> &str {
        match self.mapping.get(category) {
            Some(commodity) => commodity,
            None => &self.default_commodity,
        }
    }

    pub fn default_commodity(&self) -> &str {
        &self.default_commodity
    }
}

impl Default for CommodityMapper {
    fn default() -> Self {
        let mapping = DEFAULT_MAPPING
            .iter()
            .map(|(category, commodity)| (category.to_string(), commodity.to_string()))
            .collect();
        Self::new(mapping, DEFAULT_COMMODITY)
    }
}
