//! Error types for gamma strip packing.

use thiserror::Error;

/// Result type alias for packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while packing details onto a sheet.
#[derive(Debug, Error)]
pub enum Error {
    /// The LRP is too small to cut a stripe for the next detail.
    ///
    /// This is fatal: the engine must not be used after returning it.
    #[error(
        "Unable to cut a new stripe for detail {index} ({width} x {height}), LRP is too small"
    )]
    PackingInfeasible {
        /// Placement index the detail would have received.
        index: u64,
        /// Extent of the detail along the placement axis.
        width: f64,
        /// Extent of the detail across the placement axis.
        height: f64,
    },

    /// A statistic listener failed while handling an event.
    #[error("Statistic listener failed: {0}")]
    Listener(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Wraps any listener-side error.
    pub fn listener<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Listener(err.into())
    }

    /// Returns true if this is the fatal infeasibility error.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Error::PackingInfeasible { .. })
    }
}
