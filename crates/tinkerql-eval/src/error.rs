//! Interpolation errors

use thiserror::Error;

/// A quality-level interpolation request that cannot be answered.
///
/// Distinct from "requirements unmet": these signal "cannot determine", not
/// "cannot use", and are never produced by in-bracket requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    /// Target QL outside the known bracket; extrapolation is refused
    #[error("quality level {target} outside known bracket [{low}, {high}]")]
    QlOutOfRange { target: i32, low: i32, high: i32 },

    /// Bracket with low QL not strictly below high QL
    #[error("invalid bracket: low quality level {low} must be below high {high}")]
    InvertedBracket { low: i32, high: i32 },

    /// Variants from different item families
    #[error("cannot interpolate between different items '{low}' and '{high}'")]
    NameMismatch { low: String, high: String },
}
