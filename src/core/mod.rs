//! Core hedge analytics and supporting plumbing

pub mod commodity;
pub mod config;
pub mod contract;
pub mod cost_driver;
pub mod duration;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod profile;
pub mod records;
pub mod stats;
pub mod volatility;

// Re-export main types for cleaner imports
pub use contract::ContractCandidate;
pub use duration::HedgeDuration;
pub use error::{HedgeError, HedgeResult};
pub use pipeline::{PipelineInputs, PipelineSettings, Recommendation, load_inputs, run, run_with};
pub use profile::{FinancialProfile, RiskTolerance};
