//! Error types for pricing parameter validation.

use thiserror::Error;

/// Errors raised while constructing [`OptionParams`](crate::OptionParams).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// Scalar parameter is NaN or infinite.
    #[error("Parameter '{name}' must be finite, got {value}")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Scalar parameter outside its valid range.
    #[error("Parameter '{name}' out of range: {value} ({constraint})")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Human-readable constraint, e.g. "must be > 0".
        constraint: &'static str,
    },

    /// Required builder field was never set.
    #[error("Parameter '{name}' must be specified")]
    Missing {
        /// Parameter name.
        name: &'static str,
    },
}
