use thiserror::Error;

use crate::network::PlankAddress;

/// Top-level error type for plank network generation.
#[derive(Debug, Error)]
pub enum PlankError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Logic(#[from] LogicError),
}

impl PlankError {
    /// Returns `true` for errors that abort a whole operation rather than a
    /// single address.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Input rejected before any geometry work starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{parameter} must be positive, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("{parameter} must be at least {min}, got {value}")]
    TooFew {
        parameter: &'static str,
        value: usize,
        min: usize,
    },

    #[error("cut gap must be finite and non-negative, got {0}")]
    NegativeGap(f64),

    #[error(
        "plank and cutter structures do not match ({} missing, {} unexpected)",
        missing.len(),
        unexpected.len()
    )]
    StructureMismatch {
        /// Target addresses with no cutter counterpart.
        missing: Vec<PlankAddress>,
        /// Cutter addresses with no target counterpart.
        unexpected: Vec<PlankAddress>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A geometry-kernel operation produced an empty or degenerate result.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("{operation} failed: {reason}")]
    Failed {
        operation: &'static str,
        reason: String,
    },

    #[error("{0} returned no result")]
    EmptyResult(&'static str),
}

/// An internal invariant of the intersection engine was violated.
#[derive(Debug, Error)]
pub enum LogicError {
    #[error("segment {segment} has {found} edges parallel to the sweep, need 2")]
    ParallelEdgeCount { segment: usize, found: usize },

    #[error("interior edge {edge} meets the outline {found} times, need 2")]
    CutHitCount { edge: usize, found: usize },

    #[error("plank invariant violated: {0}")]
    Invariant(String),
}

/// Convenience type alias for results using [`PlankError`].
pub type Result<T> = std::result::Result<T, PlankError>;
