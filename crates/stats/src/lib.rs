//! # Gamma Pack Stats
//!
//! Statistic listeners for [`gamma_pack_core::GammaAlgorithm`].
//!
//! ```rust
//! use gamma_pack_core::{GammaAlgorithm, GammaConfig};
//! use gamma_pack_stats::{OutputHandler, PrintEachN};
//!
//! let mut engine = GammaAlgorithm::new(GammaConfig::default());
//! engine.register_listener(Box::new(PrintEachN::new(1000, OutputHandler::console())));
//! ```

pub mod error;
pub mod listeners;
pub mod output;

pub use error::StatsError;
pub use listeners::{
    normal_box_ratio, LrpOccupancyRatioHarmonicRectangleTracker, LrpOccupancyRatioTracker,
    NormalBoxFinalMaxRatioTracker, NormalBoxMaxRatioTracker, PrintEachN, PrintInfoAtEnd,
};
pub use output::{OutputHandler, OutputTarget};
