//! Error types raised by the recommendation pipeline.

use thiserror::Error;

/// A specialized Result type for pipeline operations.
pub type HedgeResult<T> = Result<T, HedgeError>;

/// Typed failures of the analytical core.
///
/// Every variant names the table, series or ratio that violated its
/// precondition so a caller can tell which stage failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HedgeError {
    /// A required table has zero rows.
    #[error("Empty input: {table} has no rows")]
    EmptyInput { table: &'static str },

    /// Fewer data points than a return/volatility calculation needs.
    #[error("Insufficient data for {series}: need at least {required} points, found {found}")]
    InsufficientData {
        series: String,
        required: usize,
        found: usize,
    },

    /// A ratio denominator evaluated to zero.
    #[error("Division by zero while computing {ratio}")]
    DivisionByZero { ratio: &'static str },

    /// The mapped commodity has no rows in the price table.
    #[error("Unknown commodity: no price rows for {commodity}")]
    UnknownCommodity { commodity: String },

    /// A row failed boundary validation.
    #[error("Invalid record in {table} (row {row}): {reason}")]
    InvalidRecord {
        table: &'static str,
        row: usize,
        reason: String,
    },
}
