//! Engine configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of one packing run.
///
/// `gamma` and `n0` are fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GammaConfig {
    /// Exponent of the mandatory gap `(1 / i)^gamma`.
    pub gamma: f64,

    /// Index of the first detail to be placed (must be at least 1).
    pub n0: u64,

    /// Whether the engine keeps the placed-details collection up to date.
    ///
    /// Disabling it skips all collection edits; the engine stays correct
    /// using only its internal state.
    pub track_placed: bool,

    /// Number of details the driver intends to place, if known.
    pub max_placed: Option<u64>,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            gamma: 25.0 / 17.0,
            n0: 100,
            track_placed: true,
            max_placed: None,
        }
    }
}

impl GammaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gap exponent.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the index of the first detail.
    pub fn with_n0(mut self, n0: u64) -> Self {
        self.n0 = n0;
        self
    }

    /// Enables or disables tracking of the placed-details collection.
    pub fn with_tracking(mut self, track_placed: bool) -> Self {
        self.track_placed = track_placed;
        self
    }

    /// Sets the expected number of placements.
    pub fn with_max_placed(mut self, max_placed: u64) -> Self {
        self.max_placed = Some(max_placed);
        self
    }

    /// Checks the parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(Error::ConfigError(format!(
                "gamma must be a positive finite number, got {}",
                self.gamma
            )));
        }
        if self.n0 == 0 {
            return Err(Error::ConfigError("n0 must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Gap required before a detail when measured from placement index `index`.
    #[inline]
    pub fn required_gap(&self, index: u64) -> f64 {
        (1.0 / index as f64).powf(self.gamma)
    }
}
