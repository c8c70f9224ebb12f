//! Error types for comfort evaluation and mode decisions.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a comfort function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// PMV evaluated to NaN or infinity.
    #[error("Non-finite PMV at {clothing} clothing: {value}")]
    NonFinitePmv { clothing: &'static str, value: f64 },

    /// Clothing surface temperature iteration did not settle.
    #[error("Clothing temperature iteration did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    /// The PMV target cannot be reached inside the search interval.
    #[error("PMV target {target} not bracketed between {lo} and {hi} °C")]
    TargetNotBracketed { target: f64, lo: f64, hi: f64 },
}
