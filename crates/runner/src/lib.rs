//! Driver and tooling for gamma strip packing runs.
//!
//! This crate provides:
//! - Harmonic rectangle size streams
//! - A placer that feeds an engine and reports the end of the run
//! - JSON persistence of placed-details collections
//! - Neighbourhood queries for inspecting saved layouts
//! - Parallel sweeps over the gap exponent

mod error;
mod generator;
mod io;
mod neighbours;
mod placer;
mod sweep;

pub use error::{Result, RunnerError};
pub use generator::HarmonicRectangleGenerator;
pub use io::{deserialize_details, load_details_json, save_details_json, serialize_details};
pub use neighbours::{find_neighbours_of_depth, touches};
pub use placer::{run_harmonic, DetailPlacer, RunConfig};
pub use sweep::{run_sweep, SweepConfig, SweepOutcome};
