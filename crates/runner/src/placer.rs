//! Drives an engine over a size stream.

use crate::error::Result;
use crate::generator::HarmonicRectangleGenerator;
use gamma_pack_core::{Detail, EndSnapshot, GammaAlgorithm, GammaConfig, GammaEvent};
use gamma_pack_stats::{
    LrpOccupancyRatioHarmonicRectangleTracker, LrpOccupancyRatioTracker,
    NormalBoxFinalMaxRatioTracker, NormalBoxMaxRatioTracker, OutputHandler, PrintEachN,
    PrintInfoAtEnd,
};
use std::path::PathBuf;

/// Feeds sizes to a [`GammaAlgorithm`] and owns the placed-details collection.
#[derive(Debug)]
pub struct DetailPlacer {
    engine: GammaAlgorithm,
    sheet: Detail,
    max_placed: Option<u64>,
}

impl DetailPlacer {
    /// Creates a placer. `max_placed` bounds the number of placements; when
    /// `None` the engine configuration's limit applies, and without either
    /// the size stream must be finite.
    pub fn new(engine: GammaAlgorithm, sheet: Detail, max_placed: Option<u64>) -> Self {
        Self {
            engine,
            sheet,
            max_placed,
        }
    }

    /// The engine, for inspecting its state after a run.
    pub fn engine(&self) -> &GammaAlgorithm {
        &self.engine
    }

    /// The sheet every run starts from.
    pub fn sheet(&self) -> &Detail {
        &self.sheet
    }

    /// Consumes the placer, returning the engine.
    pub fn into_engine(self) -> GammaAlgorithm {
        self.engine
    }

    /// Places sizes until the stream or the limit is exhausted, then emits
    /// [`GammaEvent::AlgorithmEnd`].
    ///
    /// The returned collection holds only the sheet when the engine does not
    /// track placed details.
    pub fn run<I>(&mut self, sizes: I) -> Result<Vec<Detail>>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let limit = self.max_placed.or(self.engine.config().max_placed);
        let config = self.engine.config();
        log::info!(
            "Starting gamma run: gamma = {}, n0 = {}, limit = {:?}",
            config.gamma,
            config.n0,
            limit
        );

        let mut placed = vec![self.sheet.clone()];
        let limit = limit.map_or(usize::MAX, |limit| limit as usize);
        for size in sizes.into_iter().take(limit) {
            self.engine.place_next(size, &mut placed)?;
        }

        let config = self.engine.config();
        let end = EndSnapshot {
            gamma: config.gamma,
            n0: config.n0,
            max_placed: config.max_placed,
            last_placed_index: self.engine.last_placed_index(),
        };
        self.engine
            .emitter_mut()
            .emit(&GammaEvent::AlgorithmEnd(end))?;

        log::info!(
            "Gamma run finished: {} details placed, {} boxes pooled",
            self.engine.placed_count(),
            self.engine.pool().len()
        );
        Ok(placed)
    }
}

/// Settings for a harmonic rectangle run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Gap exponent.
    pub gamma: f64,
    /// Index of the first rectangle.
    pub n0: u64,
    /// Number of rectangles to place.
    pub max_placed: u64,
    /// Whether the engine maintains the placed-details collection.
    pub track_placed: bool,
    /// Place rectangles on their shorter side.
    pub is_width_smaller: bool,
    /// Print progress to the console every this many indices.
    pub print_each: Option<u64>,
    /// File receiving runs of normal box ratio maxima.
    pub max_ratio_file: Option<PathBuf>,
    /// File receiving LRP occupancy ratios before each cut.
    pub lrp_ratio_file: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        let engine = GammaConfig::default();
        Self {
            gamma: engine.gamma,
            n0: engine.n0,
            max_placed: 10_000,
            track_placed: true,
            is_width_smaller: false,
            print_each: None,
            max_ratio_file: None,
            lrp_ratio_file: None,
        }
    }
}

impl RunConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gap exponent.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the first index.
    pub fn with_n0(mut self, n0: u64) -> Self {
        self.n0 = n0;
        self
    }

    /// Sets the number of rectangles to place.
    pub fn with_max_placed(mut self, max_placed: u64) -> Self {
        self.max_placed = max_placed;
        self
    }

    /// Enables or disables tracking of placed details.
    pub fn with_tracking(mut self, track_placed: bool) -> Self {
        self.track_placed = track_placed;
        self
    }

    /// Places rectangles on their shorter side.
    pub fn with_width_smaller(mut self, is_width_smaller: bool) -> Self {
        self.is_width_smaller = is_width_smaller;
        self
    }

    /// Prints progress every `n` indices.
    pub fn with_print_each(mut self, n: u64) -> Self {
        self.print_each = Some(n);
        self
    }

    /// Writes normal box ratio maxima to `path`.
    pub fn with_max_ratio_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.max_ratio_file = Some(path.into());
        self
    }

    /// Writes LRP occupancy ratios to `path`.
    pub fn with_lrp_ratio_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lrp_ratio_file = Some(path.into());
        self
    }

    /// The engine configuration for this run.
    pub fn engine_config(&self) -> GammaConfig {
        GammaConfig::new()
            .with_gamma(self.gamma)
            .with_n0(self.n0)
            .with_tracking(self.track_placed)
            .with_max_placed(self.max_placed)
    }

    /// Builds an engine with the listeners this configuration asks for.
    ///
    /// The LRP occupancy file uses the exact tracker when placed details are
    /// tracked and the harmonic closed form otherwise.
    pub fn build_engine(&self) -> Result<GammaAlgorithm> {
        let config = self.engine_config();
        config.validate()?;
        let mut engine = GammaAlgorithm::new(config);

        if let Some(n) = self.print_each.filter(|n| *n > 0) {
            engine.register_listener(Box::new(PrintEachN::new(n, OutputHandler::console())));
        }
        if let Some(path) = &self.max_ratio_file {
            engine.register_listener(Box::new(NormalBoxMaxRatioTracker::new(
                OutputHandler::file_overwrite(path),
            )));
        }
        if let Some(path) = &self.lrp_ratio_file {
            let output = OutputHandler::file_overwrite(path);
            if self.track_placed {
                engine.register_listener(Box::new(LrpOccupancyRatioTracker::new(output)));
            } else {
                engine.register_listener(Box::new(
                    LrpOccupancyRatioHarmonicRectangleTracker::new(output),
                ));
            }
        }
        if self.print_each.is_some() {
            engine.register_listener(Box::new(NormalBoxFinalMaxRatioTracker::new(
                OutputHandler::console(),
            )));
            engine.register_listener(Box::new(PrintInfoAtEnd::new(OutputHandler::console())));
        }
        Ok(engine)
    }

    /// The size stream for this run.
    pub fn generator(&self) -> HarmonicRectangleGenerator {
        HarmonicRectangleGenerator::new(self.n0, self.is_width_smaller)
    }

    /// The sheet that holds every rectangle of the stream.
    pub fn sheet(&self) -> Detail {
        let (width, height) = self.generator().base_size();
        Detail::sheet((0.0, 0.0), width, height)
    }
}

/// Runs a harmonic rectangle stream as configured.
pub fn run_harmonic(config: &RunConfig) -> Result<(Vec<Detail>, GammaAlgorithm)> {
    let engine = config.build_engine()?;
    let mut placer = DetailPlacer::new(engine, config.sheet(), Some(config.max_placed));
    let placed = placer.run(config.generator())?;
    Ok((placed, placer.into_engine()))
}
