//! Integration tests for gamma-pack-core.

use gamma_pack_core::{
    count_detail_types, Detail, DetailType, EventKind, FnListener, GammaAlgorithm, GammaConfig,
    GammaEvent, PackingSummary,
};
use std::cell::RefCell;
use std::rc::Rc;

const GAMMA: f64 = 25.0 / 17.0;
const N0: u64 = 100;

/// Rectangles `1/i x 1/(i+1)` placed on their longer side.
fn harmonic_sizes(n0: u64, count: u64) -> impl Iterator<Item = (f64, f64)> {
    (n0..n0 + count).map(|i| (1.0 / i as f64, 1.0 / (i + 1) as f64))
}

/// Square sheet whose area equals the total area of all harmonic rectangles from `n0`.
fn harmonic_sheet(n0: u64) -> Detail {
    let side = (1.0 / n0 as f64).sqrt();
    Detail::sheet((0.0, 0.0), side, side)
}

fn run_harmonic(config: GammaConfig, count: u64) -> (GammaAlgorithm, Vec<Detail>) {
    let n0 = config.n0;
    let mut engine = GammaAlgorithm::new(config);
    let mut placed = vec![harmonic_sheet(n0)];
    for size in harmonic_sizes(n0, count) {
        engine.place_next(size, &mut placed).unwrap();
    }
    (engine, placed)
}

fn assert_no_overlap(placed: &[Detail]) {
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            let overlap = a.intersection_area(b);
            assert!(overlap < 1e-15, "{} overlaps {} by {}", a, b, overlap);
        }
    }
}

fn total_area(placed: &[Detail]) -> f64 {
    placed.iter().map(Detail::area).sum()
}

mod property_tests {
    use super::*;

    #[test]
    fn test_harmonic_run_completes() {
        let config = GammaConfig::new().with_gamma(GAMMA).with_n0(N0);
        let (engine, placed) = run_harmonic(config, 100);

        assert_eq!(engine.last_placed_index(), N0 + 99);
        assert_eq!(engine.placed_count(), 100);

        let counts = count_detail_types(&placed);
        assert_eq!(counts.get(&DetailType::Detail), Some(&100));
        assert_eq!(counts.get(&DetailType::Lrp), Some(&1));

        let lrp = placed
            .iter()
            .find(|d| d.detail_type == DetailType::Lrp)
            .unwrap();
        assert_eq!(Some(lrp), engine.lrp());
        assert!(lrp.area() > 0.0);
    }

    #[test]
    fn test_non_overlap_and_area_conservation_at_every_step() {
        let sheet = harmonic_sheet(N0);
        let sheet_area = sheet.area();
        let mut engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(GAMMA).with_n0(N0));
        let mut placed = vec![sheet.clone()];

        for (step, size) in harmonic_sizes(N0, 100).enumerate() {
            engine.place_next(size, &mut placed).unwrap();

            let area = total_area(&placed);
            assert!(
                (area - sheet_area).abs() < 1e-12,
                "step {}: area {} != {}",
                step,
                area,
                sheet_area
            );
            for detail in &placed {
                assert!(sheet.contains(detail, 1e-12), "{} outside the sheet", detail);
            }
            if step % 10 == 0 {
                assert_no_overlap(&placed);
            }
        }
        assert_no_overlap(&placed);
    }

    #[test]
    fn test_live_shapes_have_positive_size() {
        let config = GammaConfig::new().with_gamma(GAMMA).with_n0(N0);
        let (engine, placed) = run_harmonic(config, 300);

        for detail in &placed {
            assert!(detail.width() > 0.0 && detail.height() > 0.0, "{}", detail);
        }
        for pooled in engine.pool().iter() {
            assert!(pooled.width() > 0.0 && pooled.height() > 0.0, "{}", pooled);
        }
    }

    #[test]
    fn test_monotonic_index() {
        let indices = Rc::new(RefCell::new(Vec::new()));
        let sink = indices.clone();
        let mut engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(GAMMA).with_n0(N0));
        engine.register_listener(Box::new(FnListener::new(
            EventKind::AfterDetailPlaced,
            move |event| {
                sink.borrow_mut().push(event.last_placed_index());
                Ok(())
            },
        )));

        let mut placed = vec![harmonic_sheet(N0)];
        for size in harmonic_sizes(N0, 100) {
            engine.place_next(size, &mut placed).unwrap();
        }

        let expected: Vec<u64> = (N0..N0 + 100).collect();
        assert_eq!(*indices.borrow(), expected);
    }

    #[test]
    fn test_gap_monotonicity() {
        for gamma in [0.5, 1.0, GAMMA, 2.0] {
            let engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(gamma).with_n0(1));
            for index in 1..500 {
                assert!(engine.required_gap(index + 1) < engine.required_gap(index));
            }
        }
    }

    #[test]
    fn test_provenance_lineage() {
        // (stripe_first_index, stripe_from, endpoint type) per placement
        let records = Rc::new(RefCell::new(Vec::new()));
        let sink = records.clone();
        let mut engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(GAMMA).with_n0(N0));
        engine.register_listener(Box::new(FnListener::new(
            EventKind::AfterDetailPlaced,
            move |event| {
                if let GammaEvent::AfterDetailPlaced {
                    state,
                    normal_box,
                    endpoint,
                    ..
                } = event
                {
                    sink.borrow_mut().push((
                        state.stripe_first_index,
                        state.stripe_from,
                        normal_box.detail_type,
                        endpoint.detail_type,
                    ));
                }
                Ok(())
            },
        )));

        let mut placed = vec![harmonic_sheet(N0)];
        for size in harmonic_sizes(N0, 1000) {
            engine.place_next(size, &mut placed).unwrap();
        }

        let records = records.borrow();
        for (_, stripe_from, box_type, endpoint_type) in records.iter() {
            let expected_box = if *stripe_from == Some(DetailType::Lrp) {
                DetailType::NormalBox1
            } else {
                DetailType::NormalBox2
            };
            assert_eq!(*box_type, expected_box);

            match stripe_from {
                Some(DetailType::Lrp) | Some(DetailType::Endpoint1) => {
                    assert_eq!(*endpoint_type, DetailType::Endpoint1)
                }
                _ => assert_eq!(*endpoint_type, DetailType::Endpoint2),
            }
        }

        // Within one stripe the endpoint type never changes
        for pair in records.windows(2) {
            if pair[0].0 == pair[1].0 {
                assert_eq!(pair[0].3, pair[1].3);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let config = GammaConfig::new().with_gamma(GAMMA).with_n0(N0);
        let (first_engine, first) = run_harmonic(config.clone(), 200);
        let (second_engine, second) = run_harmonic(config, 200);

        assert_eq!(first, second);
        assert_eq!(first_engine.lrp(), second_engine.lrp());
        assert_eq!(first_engine.stripe(), second_engine.stripe());
    }

    #[test]
    fn test_tracking_does_not_change_geometry() {
        let tracked = GammaConfig::new().with_gamma(GAMMA).with_n0(N0);
        let untracked = tracked.clone().with_tracking(false);
        let (tracked_engine, placed) = run_harmonic(tracked, 500);
        let (untracked_engine, untracked_placed) = run_harmonic(untracked, 500);

        assert_eq!(untracked_placed.len(), 1);
        assert_eq!(tracked_engine.lrp(), untracked_engine.lrp());
        assert_eq!(tracked_engine.stripe(), untracked_engine.stripe());
        assert_eq!(
            tracked_engine.endpoints_placed(),
            untracked_engine.endpoints_placed()
        );

        // The tracked collection holds the LRP, the open stripe, every pooled box
        // and every placed detail
        let expected = 1 + 1 + tracked_engine.pool().len() + 500;
        assert_eq!(placed.len(), expected);
    }

    #[test]
    fn test_infeasible_small_sheet() {
        let mut engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(GAMMA).with_n0(N0));
        let mut placed = vec![Detail::sheet((0.0, 0.0), 0.01, 0.01)];

        let err = engine.place_next((0.5, 0.5), &mut placed).unwrap_err();
        assert!(err.is_infeasible());
        assert!(engine.stripe().is_none());
        assert_eq!(engine.lrp(), Some(&placed[0]));
    }
}

mod event_tests {
    use super::*;

    #[test]
    fn test_cut_events_bracket_each_cut() {
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let mut engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(GAMMA).with_n0(N0));
        for kind in [EventKind::BeforeLrpCut, EventKind::AfterLrpCut] {
            let sink = kinds.clone();
            engine.register_listener(Box::new(FnListener::new(kind, move |event| {
                let state = event.state().unwrap();
                sink.borrow_mut().push((event.kind(), state.lrp.area()));
                Ok(())
            })));
        }

        let mut placed = vec![harmonic_sheet(N0)];
        for size in harmonic_sizes(N0, 100) {
            engine.place_next(size, &mut placed).unwrap();
        }

        let kinds = kinds.borrow();
        assert!(!kinds.is_empty());
        assert_eq!(kinds.len() % 2, 0);
        for pair in kinds.chunks(2) {
            assert_eq!(pair[0].0, EventKind::BeforeLrpCut);
            assert_eq!(pair[1].0, EventKind::AfterLrpCut);
            // Every cut shrinks the LRP
            assert!(pair[1].1 < pair[0].1);
        }
    }

    #[test]
    fn test_before_cut_sees_collection_without_new_stripe() {
        let mut engine = GammaAlgorithm::new(GammaConfig::new().with_gamma(GAMMA).with_n0(N0));
        engine.register_listener(Box::new(FnListener::new(
            EventKind::BeforeLrpCut,
            |event| {
                let state = event.state().unwrap();
                assert!(state.stripe.is_none());
                let placed = state.placed_details.unwrap();
                assert!(placed.contains(state.lrp));
                Ok(())
            },
        )));

        let mut placed = vec![harmonic_sheet(N0)];
        for size in harmonic_sizes(N0, 50) {
            engine.place_next(size, &mut placed).unwrap();
        }
    }
}

mod summary_tests {
    use super::*;

    #[test]
    fn test_summary_of_harmonic_run() {
        let config = GammaConfig::new().with_gamma(GAMMA).with_n0(N0);
        let (_, placed) = run_harmonic(config, 100);
        let sheet_area = harmonic_sheet(N0).area();
        let summary = PackingSummary::from_details(sheet_area, &placed);

        // Harmonic rectangles 100..=199 cover 1/100 - 1/200 of area
        let expected_placed = 1.0 / 100.0 - 1.0 / 200.0;
        assert!((summary.placed_area - expected_placed).abs() < 1e-12);
        assert!((summary.density() - 0.5).abs() < 1e-9);
        assert!(summary.area_defect().abs() < 1e-12);
        assert_eq!(summary.count(DetailType::Detail), 100);
    }
}
