//! Error types for statistic output.

use thiserror::Error;

/// Errors raised by statistic listeners and their output handlers.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Writing to the output file failed.
    #[error("Failed to write statistics to {path}: {source}")]
    Io {
        /// The file being written.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The listener needs the placed-details collection, but tracking is off.
    #[error("{0} requires the engine to track placed details")]
    UntrackedPlacements(&'static str),
}

impl From<StatsError> for gamma_pack_core::Error {
    fn from(err: StatsError) -> Self {
        gamma_pack_core::Error::listener(err)
    }
}
