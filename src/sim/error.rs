//! Simulation error types.
//!
//! Physics faults are recovered locally; these errors only surface from
//! construction-time validation and from pointer events the interpreter
//! refuses. None of them are fatal to the host.

use std::fmt;

/// Top-level error enum for the sandbox kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A body, obstacle or region was given a non-positive or non-finite
    /// dimension or mass.
    InvalidBodyConfiguration {
        /// Which quantity was rejected (`"radius"`, `"mass"`, `"width"`, ...).
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A spring was requested with identical endpoints or bad parameters.
    InvalidSpring {
        /// Human-readable reason.
        reason: &'static str,
    },

    /// An operation named a body id the scene does not own.
    UnknownBody {
        /// The missing id.
        id: u32,
    },

    /// A pointer event arrived for a pointer other than the one driving the
    /// active gesture.
    StaleGesture {
        /// Pointer id of the active gesture.
        expected: u32,
        /// Pointer id carried by the event.
        got: u32,
    },

    /// Scene configuration failed to parse or validate.
    InvalidConfig {
        /// Human-readable reason.
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidBodyConfiguration { field, value } => {
                write!(f, "invalid body configuration: {} = {} (must be finite and > 0)", field, value)
            }
            SimError::InvalidSpring { reason } => write!(f, "invalid spring: {}", reason),
            SimError::UnknownBody { id } => write!(f, "no body with id {}", id),
            SimError::StaleGesture { expected, got } => write!(
                f,
                "pointer {} does not own the active gesture (owned by pointer {})",
                got, expected
            ),
            SimError::InvalidConfig { reason } => write!(f, "invalid scene configuration: {}", reason),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(field: &'static str, value: f32) -> SimResult<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidBodyConfiguration { field, value })
    }
}
