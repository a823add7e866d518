//! # Gamma Pack Core
//!
//! Sequential strip packing of a rectangle stream onto a single sheet.
//!
//! Rectangles ("details") arrive one at a time and are never rotated. The
//! [`GammaAlgorithm`] places each one into an open stripe, keeping a mandatory
//! gap of `(1 / i)^gamma` after it, where `i` is the placement index at which
//! the stripe was opened. Leftover shapes are classified by provenance and
//! recycled through a [`BoxPool`]; new stripes are cut from the unassigned
//! remainder of the sheet (the LRP) only when no pooled box is thick enough.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Detail`], [`DetailType`]
//! - **Box pool**: [`BoxPool`], largest-minimum-side first
//! - **Engine**: [`GammaAlgorithm`] configured by [`GammaConfig`]
//! - **Events**: [`GammaEvent`], [`StatisticListener`], [`EventEmitter`]
//! - **Statistics**: [`PackingSummary`], [`count_detail_types`]
//!
//! ## Configuration
//!
//! ```rust
//! use gamma_pack_core::GammaConfig;
//!
//! let config = GammaConfig::new()
//!     .with_gamma(25.0 / 17.0)
//!     .with_n0(100)
//!     .with_tracking(true)
//!     .with_max_placed(10_000);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod detail;
pub mod engine;
pub mod error;
pub mod event;
pub mod pool;
pub mod summary;

// Re-exports
pub use config::GammaConfig;
pub use detail::{Detail, DetailType};
pub use engine::GammaAlgorithm;
pub use error::{Error, Result};
pub use event::{
    EndSnapshot, EngineSnapshot, EventEmitter, EventKind, FnListener, GammaEvent,
    StatisticListener,
};
pub use pool::BoxPool;
pub use summary::{count_detail_types, PackingSummary};
