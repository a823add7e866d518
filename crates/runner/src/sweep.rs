//! Parallel runs over a range of gap exponents.

use crate::generator::HarmonicRectangleGenerator;
use crate::placer::DetailPlacer;
use crate::error::RunnerError;
use gamma_pack_core::{Detail, Error, EventKind, FnListener, GammaAlgorithm, GammaConfig, GammaEvent};
use gamma_pack_stats::normal_box_ratio;
use rayon::prelude::*;
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;

/// Settings shared by every run of a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Gap exponents to run, one engine each.
    pub gammas: Vec<f64>,
    /// Index of the first rectangle.
    pub n0: u64,
    /// Number of rectangles per run.
    pub max_placed: u64,
    /// Place rectangles on their shorter side.
    pub is_width_smaller: bool,
}

impl SweepConfig {
    /// Creates a sweep over `gammas`.
    pub fn new(gammas: Vec<f64>, n0: u64, max_placed: u64) -> Self {
        Self {
            gammas,
            n0,
            max_placed,
            is_width_smaller: false,
        }
    }

    /// `steps` evenly spaced exponents from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
        match steps {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (steps - 1) as f64;
                (0..steps).map(|i| start + step * i as f64).collect()
            }
        }
    }

    /// Places rectangles on their shorter side.
    pub fn with_width_smaller(mut self, is_width_smaller: bool) -> Self {
        self.is_width_smaller = is_width_smaller;
        self
    }
}

/// Result of one run of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    /// Gap exponent of the run.
    pub gamma: f64,
    /// Number of details placed.
    pub placed: u64,
    /// Largest `min_side / max_side^gamma` over all normal boxes.
    pub max_ratio: Option<f64>,
    /// Index of the detail that could not be placed.
    pub failed_at: Option<u64>,
    /// Any other failure, such as an invalid exponent.
    pub error: Option<String>,
}

impl SweepOutcome {
    /// Returns true if every requested detail was placed.
    pub fn completed(&self) -> bool {
        self.failed_at.is_none() && self.error.is_none()
    }
}

/// Runs one untracked harmonic packing per exponent on the rayon pool.
///
/// Outcomes are returned in the order of `config.gammas`.
pub fn run_sweep(config: &SweepConfig) -> Vec<SweepOutcome> {
    log::info!(
        "Sweeping {} gamma values with n0 = {} and {} details each",
        config.gammas.len(),
        config.n0,
        config.max_placed
    );
    config
        .gammas
        .par_iter()
        .map(|&gamma| run_single(config, gamma))
        .collect()
}

fn run_single(config: &SweepConfig, gamma: f64) -> SweepOutcome {
    let mut outcome = SweepOutcome {
        gamma,
        placed: 0,
        max_ratio: None,
        failed_at: None,
        error: None,
    };

    let engine_config = GammaConfig::new()
        .with_gamma(gamma)
        .with_n0(config.n0)
        .with_tracking(false)
        .with_max_placed(config.max_placed);
    if let Err(e) = engine_config.validate() {
        outcome.error = Some(e.to_string());
        return outcome;
    }

    let max_ratio = Rc::new(Cell::new(f64::NEG_INFINITY));
    let sink = max_ratio.clone();
    let mut engine = GammaAlgorithm::new(engine_config);
    engine.register_listener(Box::new(FnListener::new(
        EventKind::AfterDetailPlaced,
        move |event| {
            if let GammaEvent::AfterDetailPlaced {
                state, normal_box, ..
            } = event
            {
                let ratio = normal_box_ratio(normal_box, state.gamma);
                if ratio > sink.get() {
                    sink.set(ratio);
                }
            }
            Ok(())
        },
    )));

    let generator = HarmonicRectangleGenerator::new(config.n0, config.is_width_smaller);
    let (width, height) = generator.base_size();
    let sheet = Detail::sheet((0.0, 0.0), width, height);
    let mut placer = DetailPlacer::new(engine, sheet, Some(config.max_placed));

    match placer.run(generator) {
        Ok(_) => {}
        Err(RunnerError::Packing(Error::PackingInfeasible { index, .. })) => {
            log::warn!("gamma = {}: packing infeasible at index {}", gamma, index);
            outcome.failed_at = Some(index);
        }
        Err(e) => outcome.error = Some(e.to_string()),
    }

    outcome.placed = placer.engine().placed_count();
    let max = max_ratio.get();
    if max.is_finite() {
        outcome.max_ratio = Some(max);
    }
    outcome
}
