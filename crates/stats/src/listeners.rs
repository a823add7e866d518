//! Ready-made statistic listeners.
//!
//! Each listener writes plain text lines through an [`OutputHandler`] and
//! declares the single event kind it reacts to.

use crate::error::StatsError;
use crate::output::OutputHandler;
use gamma_pack_core::{Detail, DetailType, EventKind, GammaEvent, StatisticListener};

/// `min_side / max_side^gamma` of a normal box.
pub fn normal_box_ratio(normal_box: &Detail, gamma: f64) -> f64 {
    normal_box.min_side() / normal_box.max_side().powf(gamma)
}

/// Prints the index of every `n`-th placed detail.
#[derive(Debug)]
pub struct PrintEachN {
    n: u64,
    output: OutputHandler,
}

impl PrintEachN {
    /// Creates the listener.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(n: u64, output: OutputHandler) -> Self {
        assert!(n > 0, "print interval must be positive");
        Self { n, output }
    }

    /// The output handler.
    pub fn output(&self) -> &OutputHandler {
        &self.output
    }
}

impl StatisticListener for PrintEachN {
    fn event_kind(&self) -> EventKind {
        EventKind::AfterDetailPlaced
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> gamma_pack_core::Result<()> {
        let index = event.last_placed_index();
        if index % self.n == 0 {
            self.output
                .write(&format!("Placed detail with index {}", index))?;
        }
        Ok(())
    }
}

/// Prints a closing line once the run ends.
#[derive(Debug)]
pub struct PrintInfoAtEnd {
    output: OutputHandler,
}

impl PrintInfoAtEnd {
    /// Creates the listener.
    pub fn new(output: OutputHandler) -> Self {
        Self { output }
    }

    /// The output handler.
    pub fn output(&self) -> &OutputHandler {
        &self.output
    }
}

impl StatisticListener for PrintInfoAtEnd {
    fn event_kind(&self) -> EventKind {
        EventKind::AlgorithmEnd
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> gamma_pack_core::Result<()> {
        if let GammaEvent::AlgorithmEnd(end) = event {
            self.output.write(&format!(
                "Gamma algorithm with n0 = {} and gamma = {} ended",
                end.n0, end.gamma
            ))?;
        }
        Ok(())
    }
}

/// Tracks runs of consecutive new maxima of the normal box ratio.
///
/// A run starts at the first placement that beats the running maximum and
/// lasts while every following placement beats it again. When a placement
/// fails to, the run is written as
/// `{start} - {finish}: {start_value} - {finish_value}`.
#[derive(Debug)]
pub struct NormalBoxMaxRatioTracker {
    current_max: f64,
    start: Option<(u64, f64)>,
    finish: Option<(u64, f64)>,
    output: OutputHandler,
}

impl NormalBoxMaxRatioTracker {
    /// Creates the listener.
    pub fn new(output: OutputHandler) -> Self {
        Self {
            current_max: f64::NEG_INFINITY,
            start: None,
            finish: None,
            output,
        }
    }

    /// Largest ratio seen so far.
    pub fn current_max(&self) -> f64 {
        self.current_max
    }

    /// The output handler.
    pub fn output(&self) -> &OutputHandler {
        &self.output
    }
}

impl StatisticListener for NormalBoxMaxRatioTracker {
    fn event_kind(&self) -> EventKind {
        EventKind::AfterDetailPlaced
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> gamma_pack_core::Result<()> {
        let GammaEvent::AfterDetailPlaced {
            state, normal_box, ..
        } = event
        else {
            return Ok(());
        };

        let value = normal_box_ratio(normal_box, state.gamma);
        let index = state.last_placed_index;
        if value > self.current_max {
            self.current_max = value;
            self.finish = Some((index, value));
            if self.start.is_none() {
                self.start = Some((index, value));
            }
        } else if let (Some((start, start_value)), Some((finish, finish_value))) =
            (self.start.take(), self.finish)
        {
            self.output.write(&format!(
                "{} - {}: {} - {}",
                start, finish, start_value, finish_value
            ))?;
        }
        Ok(())
    }
}

/// Reports the largest normal box ratio once the planned run completes.
///
/// The line is written when the placement index reaches
/// `n0 + max_placed - 1`; runs without `max_placed` never write.
#[derive(Debug)]
pub struct NormalBoxFinalMaxRatioTracker {
    current_max: f64,
    output: OutputHandler,
}

impl NormalBoxFinalMaxRatioTracker {
    /// Creates the listener.
    pub fn new(output: OutputHandler) -> Self {
        Self {
            current_max: f64::NEG_INFINITY,
            output,
        }
    }

    /// Largest ratio seen so far.
    pub fn current_max(&self) -> f64 {
        self.current_max
    }

    /// The output handler.
    pub fn output(&self) -> &OutputHandler {
        &self.output
    }
}

impl StatisticListener for NormalBoxFinalMaxRatioTracker {
    fn event_kind(&self) -> EventKind {
        EventKind::AfterDetailPlaced
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> gamma_pack_core::Result<()> {
        let GammaEvent::AfterDetailPlaced {
            state, normal_box, ..
        } = event
        else {
            return Ok(());
        };

        let value = normal_box_ratio(normal_box, state.gamma);
        if value > self.current_max {
            self.current_max = value;
        }
        if let Some(max_placed) = state.max_placed {
            if max_placed > 0 && state.last_placed_index == state.n0 + max_placed - 1 {
                self.output.write(&format!(
                    "n0 = {}, gamma = {}, max_ratio = {}",
                    state.n0, state.gamma, self.current_max
                ))?;
            }
        }
        Ok(())
    }
}

/// Share of the free sheet area held by the LRP, measured before each cut.
///
/// Free area is the total area of every non-`detail` shape in the tracked
/// collection, so the engine must track placed details.
#[derive(Debug)]
pub struct LrpOccupancyRatioTracker {
    output: OutputHandler,
}

impl LrpOccupancyRatioTracker {
    /// Creates the listener.
    pub fn new(output: OutputHandler) -> Self {
        Self { output }
    }

    /// The output handler.
    pub fn output(&self) -> &OutputHandler {
        &self.output
    }
}

impl StatisticListener for LrpOccupancyRatioTracker {
    fn event_kind(&self) -> EventKind {
        EventKind::BeforeLrpCut
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> gamma_pack_core::Result<()> {
        let GammaEvent::BeforeLrpCut(state) = event else {
            return Ok(());
        };
        let placed = state
            .placed_details
            .ok_or(StatsError::UntrackedPlacements("LrpOccupancyRatioTracker"))?;

        let free_area: f64 = placed
            .iter()
            .filter(|d| d.detail_type != DetailType::Detail)
            .map(Detail::area)
            .sum();
        let ratio = state.lrp.area() / free_area;
        self.output.write(&format!(
            "Placed: {}, lrp: {}",
            state.last_placed_index, ratio
        ))?;
        Ok(())
    }
}

/// LRP occupancy for harmonic rectangle streams.
///
/// With details `1/i x 1/(i+1)` starting at `n0` on a sheet of area `1/n0`,
/// the free area after placing index `k` is exactly `1/(k+1)`. No tracked
/// collection is needed.
#[derive(Debug)]
pub struct LrpOccupancyRatioHarmonicRectangleTracker {
    output: OutputHandler,
}

impl LrpOccupancyRatioHarmonicRectangleTracker {
    /// Creates the listener.
    pub fn new(output: OutputHandler) -> Self {
        Self { output }
    }

    /// The output handler.
    pub fn output(&self) -> &OutputHandler {
        &self.output
    }
}

impl StatisticListener for LrpOccupancyRatioHarmonicRectangleTracker {
    fn event_kind(&self) -> EventKind {
        EventKind::BeforeLrpCut
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> gamma_pack_core::Result<()> {
        let GammaEvent::BeforeLrpCut(state) = event else {
            return Ok(());
        };
        let free_area = 1.0 / (state.last_placed_index + 1) as f64;
        let ratio = state.lrp.area() / free_area;
        self.output.write(&format!(
            "Placed: {}, lrp: {}",
            state.last_placed_index, ratio
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamma_pack_core::{EndSnapshot, EngineSnapshot, Error};

    fn snapshot<'a>(
        lrp: &'a Detail,
        last: u64,
        placed: Option<&'a [Detail]>,
    ) -> EngineSnapshot<'a> {
        EngineSnapshot {
            gamma: 1.0,
            n0: 10,
            max_placed: Some(3),
            lrp,
            stripe: None,
            stripe_first_index: last,
            is_stripe_horizontal: true,
            last_placed_index: last,
            endpoints_placed: 0,
            stripe_from: Some(DetailType::Lrp),
            size: (1.0, 1.0),
            placed_details: placed,
        }
    }

    fn placed_event<'a>(
        state: EngineSnapshot<'a>,
        detail: &'a Detail,
        normal_box: &'a Detail,
    ) -> GammaEvent<'a> {
        GammaEvent::AfterDetailPlaced {
            state,
            placed_detail: detail,
            normal_box,
            endpoint: detail,
        }
    }

    /// Normal box with the given sides; gamma 1 gives ratio `min / max`.
    fn normal_box(width: f64, height: f64) -> Detail {
        Detail::new((0.0, 0.0), (width, height), "B", DetailType::NormalBox1)
    }

    #[test]
    fn test_print_each_n() {
        let lrp = Detail::sheet((0.0, 0.0), 1.0, 1.0);
        let nb = normal_box(1.0, 1.0);
        let mut listener = PrintEachN::new(5, OutputHandler::buffer());

        for last in 9..=15 {
            let event = placed_event(snapshot(&lrp, last, None), &lrp, &nb);
            listener.handle(&event).unwrap();
        }
        assert_eq!(
            listener.output().lines(),
            &["Placed detail with index 10", "Placed detail with index 15"]
        );
    }

    #[test]
    fn test_print_info_at_end() {
        let mut listener = PrintInfoAtEnd::new(OutputHandler::buffer());
        let event = GammaEvent::AlgorithmEnd(EndSnapshot {
            gamma: 1.5,
            n0: 100,
            max_placed: None,
            last_placed_index: 199,
        });
        listener.handle(&event).unwrap();
        assert_eq!(
            listener.output().lines(),
            &["Gamma algorithm with n0 = 100 and gamma = 1.5 ended"]
        );
    }

    #[test]
    fn test_max_ratio_tracker_reports_finished_runs() {
        let lrp = Detail::sheet((0.0, 0.0), 1.0, 1.0);
        let mut listener = NormalBoxMaxRatioTracker::new(OutputHandler::buffer());

        // ratios 0.25, 0.5, 0.4 (run 10-11 ends), 0.8, 0.1 (run 13-13 ends), 0.05
        let boxes = [
            normal_box(1.0, 4.0),
            normal_box(2.0, 4.0),
            normal_box(2.0, 5.0),
            normal_box(4.0, 5.0),
            normal_box(1.0, 10.0),
            normal_box(1.0, 20.0),
        ];
        for (offset, nb) in boxes.iter().enumerate() {
            let event = placed_event(snapshot(&lrp, 10 + offset as u64, None), &lrp, nb);
            listener.handle(&event).unwrap();
        }

        assert_eq!(
            listener.output().lines(),
            &["10 - 11: 0.25 - 0.5", "13 - 13: 0.8 - 0.8"]
        );
        assert_eq!(listener.current_max(), 0.8);
    }

    #[test]
    fn test_final_max_ratio_written_at_planned_end() {
        let lrp = Detail::sheet((0.0, 0.0), 1.0, 1.0);
        let mut listener = NormalBoxFinalMaxRatioTracker::new(OutputHandler::buffer());

        // n0 = 10, max_placed = 3: the last index is 12
        let boxes = [normal_box(1.0, 2.0), normal_box(1.0, 4.0), normal_box(1.0, 8.0)];
        for (offset, nb) in boxes.iter().enumerate() {
            let event = placed_event(snapshot(&lrp, 10 + offset as u64, None), &lrp, nb);
            listener.handle(&event).unwrap();
        }
        assert_eq!(
            listener.output().lines(),
            &["n0 = 10, gamma = 1, max_ratio = 0.5"]
        );
    }

    #[test]
    fn test_lrp_occupancy_ratio() {
        let lrp = Detail::new((0.0, 2.0), (10.0, 10.0), "LRP", DetailType::Lrp);
        let placed = vec![
            Detail::new((0.0, 0.0), (2.0, 1.0), "S1", DetailType::Detail),
            Detail::new((0.0, 1.0), (2.0, 2.0), "B1", DetailType::NormalBox1),
            Detail::new((2.0, 0.0), (10.0, 2.0), "Ep1", DetailType::Endpoint1),
            lrp.clone(),
        ];
        let mut listener = LrpOccupancyRatioTracker::new(OutputHandler::buffer());
        let event = GammaEvent::BeforeLrpCut(snapshot(&lrp, 1, Some(&placed)));
        listener.handle(&event).unwrap();

        let expected = 80.0 / 98.0;
        assert_eq!(
            listener.output().lines(),
            &[format!("Placed: 1, lrp: {}", expected)]
        );
    }

    #[test]
    fn test_lrp_occupancy_requires_tracking() {
        let lrp = Detail::sheet((0.0, 0.0), 1.0, 1.0);
        let mut listener = LrpOccupancyRatioTracker::new(OutputHandler::buffer());
        let event = GammaEvent::BeforeLrpCut(snapshot(&lrp, 1, None));

        let err = listener.handle(&event).unwrap_err();
        assert!(matches!(err, Error::Listener(_)));
        assert!(listener.output().lines().is_empty());
    }

    #[test]
    fn test_harmonic_occupancy_ratio() {
        // Free area after index 3 is 1/4
        let lrp = Detail::sheet((0.0, 0.0), 0.5, 0.25);
        let mut listener = LrpOccupancyRatioHarmonicRectangleTracker::new(OutputHandler::buffer());
        let event = GammaEvent::BeforeLrpCut(snapshot(&lrp, 3, None));
        listener.handle(&event).unwrap();
        assert_eq!(listener.output().lines(), &["Placed: 3, lrp: 0.5"]);
    }

    #[test]
    fn test_listeners_ignore_other_events() {
        let end = GammaEvent::AlgorithmEnd(EndSnapshot {
            gamma: 1.0,
            n0: 1,
            max_placed: None,
            last_placed_index: 1,
        });
        let mut tracker = LrpOccupancyRatioTracker::new(OutputHandler::buffer());
        tracker.handle(&end).unwrap();
        assert!(tracker.output().lines().is_empty());
    }
}
