//! # Gamma Pack
//!
//! Gamma-parameterized sequential strip packing of rectangle streams.
//!
//! This crate bundles:
//! - **Core**: the placement engine, box pool and event model
//! - **Stats**: statistic listeners writing to the console or files
//! - **Runner**: harmonic size streams, the placer, persistence and sweeps
//!
//! ## Quick Start
//!
//! ```rust
//! use gamma_pack::core::{Detail, GammaAlgorithm, GammaConfig};
//!
//! let mut engine = GammaAlgorithm::new(GammaConfig::new().with_n0(100));
//! let mut placed = vec![Detail::sheet((0.0, 0.0), 0.1, 0.1)];
//! for i in 100..200u64 {
//!     engine.place_next((1.0 / i as f64, 1.0 / (i + 1) as f64), &mut placed)?;
//! }
//! assert_eq!(engine.placed_count(), 100);
//! # Ok::<(), gamma_pack::core::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `stats` (default): statistic listeners
//! - `runner` (default): driver, generator, persistence and sweeps
//! - `serde`: Serialization support for core types

/// Placement engine and event model.
pub use gamma_pack_core as core;

/// Statistic listeners.
#[cfg(feature = "stats")]
pub use gamma_pack_stats as stats;

/// Driver, generators, persistence and sweeps.
#[cfg(feature = "runner")]
pub use gamma_pack_runner as runner;

// Re-export commonly used types at root level
pub use gamma_pack_core::{Detail, DetailType, Error, GammaAlgorithm, GammaConfig, Result};
