//! The gamma placement engine.
//!
//! Details arrive one at a time. Each one goes into the currently open
//! stripe, flush against the stripe's anchor corner, and splits the stripe
//! into three shapes: the detail itself, a normal box across the placement
//! axis, and an endpoint along it. The endpoint becomes the next stripe; the
//! normal box goes to the [`BoxPool`].
//!
//! Every detail must leave at least `(1 / i)^gamma` of free length in its
//! stripe, where `i` is the index the stripe was opened at. When the open
//! stripe cannot take the next detail it is closed into the pool and a new
//! stripe is taken from the pool or, failing that, cut from the LRP.
//!
//! # Provenance
//!
//! - normal boxes are `normal_box_1` iff the stripe was cut from the LRP;
//! - endpoints are `endpoint_1` iff the stripe was cut from the LRP or taken
//!   from a pooled `endpoint_1`. An `endpoint_2` lineage never turns back.

use crate::config::GammaConfig;
use crate::detail::{Detail, DetailType};
use crate::event::{EngineSnapshot, EventEmitter, GammaEvent, StatisticListener};
use crate::pool::BoxPool;
use crate::{Error, Result};

const DETAIL_PREFIX: &str = "S";
const NORMAL_BOX_PREFIX: &str = "B";
const ENDPOINT_PREFIX: &str = "Ep";
const LRP_NAME: &str = "LRP";

/// Mutable packing state, kept apart from the emitter so events can borrow it.
#[derive(Debug, Clone)]
struct EngineState {
    pool: BoxPool,
    lrp: Option<Detail>,
    stripe: Option<Detail>,
    stripe_first_index: u64,
    is_stripe_horizontal: bool,
    last_placed_index: u64,
    endpoints_placed: u64,
    stripe_from: Option<DetailType>,
    failed: bool,
}

impl EngineState {
    fn new(n0: u64) -> Self {
        Self {
            pool: BoxPool::new(),
            lrp: None,
            stripe: None,
            stripe_first_index: n0 - 1,
            is_stripe_horizontal: false,
            last_placed_index: n0 - 1,
            endpoints_placed: 1,
            stripe_from: None,
            failed: false,
        }
    }

    fn snapshot<'a>(
        &'a self,
        config: &GammaConfig,
        size: (f64, f64),
        placed_details: Option<&'a [Detail]>,
    ) -> Option<EngineSnapshot<'a>> {
        let lrp = self.lrp.as_ref()?;
        Some(EngineSnapshot {
            gamma: config.gamma,
            n0: config.n0,
            max_placed: config.max_placed,
            lrp,
            stripe: self.stripe.as_ref(),
            stripe_first_index: self.stripe_first_index,
            is_stripe_horizontal: self.is_stripe_horizontal,
            last_placed_index: self.last_placed_index,
            endpoints_placed: self.endpoints_placed,
            stripe_from: self.stripe_from,
            size,
            placed_details,
        })
    }

    fn normal_box_type(&self) -> DetailType {
        if self.stripe_from == Some(DetailType::Lrp) {
            DetailType::NormalBox1
        } else {
            DetailType::NormalBox2
        }
    }

    fn endpoint_type(&self) -> DetailType {
        match self.stripe_from {
            Some(DetailType::Lrp) | Some(DetailType::Endpoint1) => DetailType::Endpoint1,
            _ => DetailType::Endpoint2,
        }
    }
}

/// Stateful sequential strip-packing engine for one sheet.
///
/// # Example
///
/// ```rust
/// use gamma_pack_core::{Detail, GammaAlgorithm, GammaConfig};
///
/// let config = GammaConfig::new().with_gamma(1.0).with_n0(1);
/// let mut engine = GammaAlgorithm::new(config);
/// let mut placed = vec![Detail::sheet((0.0, 0.0), 10.0, 10.0)];
///
/// engine.place_next((2.0, 1.0), &mut placed).unwrap();
/// assert_eq!(engine.last_placed_index(), 1);
/// assert_eq!(placed.len(), 4);
/// ```
#[derive(Debug)]
pub struct GammaAlgorithm {
    config: GammaConfig,
    emitter: EventEmitter,
    state: EngineState,
}

impl GammaAlgorithm {
    /// Creates an engine without listeners.
    ///
    /// # Panics
    ///
    /// Panics if `config.n0 == 0` or `config.gamma` is not finite.
    pub fn new(config: GammaConfig) -> Self {
        Self::with_emitter(config, EventEmitter::new())
    }

    /// Creates an engine that reports to the given listeners.
    pub fn with_emitter(config: GammaConfig, emitter: EventEmitter) -> Self {
        assert!(config.n0 >= 1, "n0 must be at least 1");
        assert!(config.gamma.is_finite(), "gamma must be finite");
        let state = EngineState::new(config.n0);
        Self {
            config,
            emitter,
            state,
        }
    }

    /// Registers a listener after the existing ones.
    pub fn register_listener(&mut self, listener: Box<dyn StatisticListener>) {
        self.emitter.register(listener);
    }

    /// Places the next detail.
    ///
    /// `size.0` is the detail's extent along the placement axis of the
    /// stripe and `size.1` its extent across it. `placed` is the driver-owned
    /// collection; its first element must be the whole sheet before the
    /// first call. It is edited only when tracking is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackingInfeasible`] when a stripe has to be cut and
    /// the LRP is too small. The engine must not be called again afterwards.
    /// Listener failures are returned as [`Error::Listener`].
    ///
    /// # Panics
    ///
    /// Panics on non-positive or non-finite sizes, on an empty `placed`
    /// collection at bootstrap, and when called after a fatal error.
    pub fn place_next(&mut self, size: (f64, f64), placed: &mut Vec<Detail>) -> Result<()> {
        assert!(
            !self.state.failed,
            "engine called again after packing became infeasible"
        );
        assert!(
            size.0 > 0.0 && size.1 > 0.0 && size.0.is_finite() && size.1.is_finite(),
            "detail size must be positive and finite, got {:?}",
            size
        );

        self.bootstrap(placed);
        self.check_stripe_capacity(size);
        if self.state.stripe.is_none() {
            self.choose_stripe(size, placed)?;
        }
        self.place_in_stripe(size, placed)
    }

    /// Takes the whole sheet as the LRP on the first call.
    fn bootstrap(&mut self, placed: &[Detail]) {
        if self.state.lrp.is_none() {
            assert!(
                !placed.is_empty(),
                "placed details must start with the sheet before the first placement"
            );
            self.state.lrp = Some(placed[0].clone());
        }
    }

    /// Closes the open stripe if it cannot hold `size` plus the required gap.
    fn check_stripe_capacity(&mut self, size: (f64, f64)) {
        let Some(stripe) = self.state.stripe.as_ref() else {
            return;
        };
        let required_gap = self.config.required_gap(self.state.stripe_first_index);
        let total_length = size.0 + required_gap;
        let available = if self.state.is_stripe_horizontal {
            stripe.width()
        } else {
            stripe.height()
        };
        if total_length > available {
            if let Some(stripe) = self.state.stripe.take() {
                self.state.pool.insert(stripe);
            }
            self.state.endpoints_placed += 1;
        }
    }

    /// Opens a new stripe from the pool, or cuts one from the LRP.
    fn choose_stripe(&mut self, size: (f64, f64), placed: &mut Vec<Detail>) -> Result<()> {
        self.state.stripe_first_index = self.state.last_placed_index + 1;
        let required_gap = self.config.required_gap(self.state.stripe_first_index);
        let max_box_size = self.state.pool.best_min_side().unwrap_or(-1.0);

        if size.1 + required_gap <= max_box_size {
            if let Some(stripe) = self.state.pool.remove_best() {
                self.state.stripe_from = Some(stripe.detail_type);
                self.state.is_stripe_horizontal = stripe.width() >= stripe.height();
                log::debug!(
                    "Stripe {} ({}) taken from pool at index {}, {} boxes left",
                    stripe.name,
                    stripe.detail_type,
                    self.state.stripe_first_index,
                    self.state.pool.len()
                );
                self.state.stripe = Some(stripe);
                return Ok(());
            }
        }

        self.cut_new_stripe(size, placed)
    }

    /// Cuts a stripe parallel to the LRP's shorter side.
    fn cut_new_stripe(&mut self, size: (f64, f64), placed: &mut Vec<Detail>) -> Result<()> {
        let tracked = self.config.track_placed.then_some(placed.as_slice());
        if let Some(state) = self.state.snapshot(&self.config, size, tracked) {
            self.emitter.emit(&GammaEvent::BeforeLrpCut(state))?;
        }

        let Some(lrp) = self.state.lrp.as_ref() else {
            unreachable!("LRP is bootstrapped before any cut");
        };
        self.state.stripe_from = Some(DetailType::Lrp);
        let next_index = self.state.last_placed_index + 1;
        let required_gap = self.config.required_gap(next_index);

        if size.1 + required_gap > lrp.max_side() || size.0 + required_gap > lrp.min_side() {
            log::warn!(
                "LRP {} x {} too small for detail {} ({} x {}) with gap {}",
                lrp.width(),
                lrp.height(),
                next_index,
                size.0,
                size.1,
                required_gap
            );
            self.state.failed = true;
            return Err(Error::PackingInfeasible {
                index: next_index,
                width: size.0,
                height: size.1,
            });
        }

        let thickness = size.1 + required_gap;
        let (bl, tr) = (lrp.bottom_left, lrp.top_right);
        let (stripe_corners, lrp_corners) = if lrp.width() <= lrp.height() {
            self.state.is_stripe_horizontal = true;
            (
                ((bl.x, bl.y), (tr.x, bl.y + thickness)),
                ((bl.x, bl.y + thickness), (tr.x, tr.y)),
            )
        } else {
            self.state.is_stripe_horizontal = false;
            (
                ((tr.x - thickness, bl.y), (tr.x, tr.y)),
                ((bl.x, bl.y), (tr.x - thickness, tr.y)),
            )
        };

        let stripe = Detail::new(
            stripe_corners.0,
            stripe_corners.1,
            format!("{}{}", ENDPOINT_PREFIX, self.state.endpoints_placed),
            DetailType::Endpoint1,
        );
        let new_lrp = Detail::new(lrp_corners.0, lrp_corners.1, LRP_NAME, DetailType::Lrp);

        log::debug!(
            "Cut stripe {} of thickness {} from LRP at index {} (horizontal: {})",
            stripe.name,
            thickness,
            next_index,
            self.state.is_stripe_horizontal
        );

        if self.config.track_placed {
            remove_detail(placed, lrp);
            placed.push(stripe.clone());
            placed.push(new_lrp.clone());
        }
        self.state.stripe = Some(stripe);
        self.state.lrp = Some(new_lrp);

        let tracked = self.config.track_placed.then_some(placed.as_slice());
        if let Some(state) = self.state.snapshot(&self.config, size, tracked) {
            self.emitter.emit(&GammaEvent::AfterLrpCut(state))?;
        }
        Ok(())
    }

    /// Splits the open stripe into detail, normal box and endpoint.
    fn place_in_stripe(&mut self, size: (f64, f64), placed: &mut Vec<Detail>) -> Result<()> {
        let normal_box_type = self.state.normal_box_type();
        let endpoint_type = self.state.endpoint_type();

        let Some(stripe) = self.state.stripe.take() else {
            unreachable!("a stripe is open before placement");
        };
        self.state.last_placed_index += 1;
        let index = self.state.last_placed_index;

        let (w, h) = size;
        let (bl, tr) = (stripe.bottom_left, stripe.top_right);
        let (detail_corners, box_corners, endpoint_corners) = if self.state.is_stripe_horizontal {
            (
                ((bl.x, bl.y), (bl.x + w, bl.y + h)),
                ((bl.x, bl.y + h), (bl.x + w, tr.y)),
                ((bl.x + w, bl.y), (tr.x, tr.y)),
            )
        } else {
            (
                ((tr.x - h, bl.y), (tr.x, bl.y + w)),
                ((bl.x, bl.y), (tr.x - h, bl.y + w)),
                ((bl.x, bl.y + w), (tr.x, tr.y)),
            )
        };

        let placed_detail = Detail::new(
            detail_corners.0,
            detail_corners.1,
            format!("{}{}", DETAIL_PREFIX, index),
            DetailType::Detail,
        );
        let normal_box = Detail::new(
            box_corners.0,
            box_corners.1,
            format!("{}{}", NORMAL_BOX_PREFIX, index),
            normal_box_type,
        );
        let endpoint = Detail::new(
            endpoint_corners.0,
            endpoint_corners.1,
            format!("{}{}", ENDPOINT_PREFIX, self.state.endpoints_placed),
            endpoint_type,
        );

        log::trace!("Placed {} in stripe {}", placed_detail, stripe.name);

        if self.config.track_placed {
            remove_detail(placed, &stripe);
            placed.push(placed_detail.clone());
            placed.push(normal_box.clone());
            placed.push(endpoint.clone());
        }
        self.state.stripe = Some(endpoint);
        self.state.pool.insert(normal_box.clone());

        let tracked = self.config.track_placed.then_some(placed.as_slice());
        if let (Some(state), Some(endpoint)) = (
            self.state.snapshot(&self.config, size, tracked),
            self.state.stripe.as_ref(),
        ) {
            self.emitter.emit(&GammaEvent::AfterDetailPlaced {
                state,
                placed_detail: &placed_detail,
                normal_box: &normal_box,
                endpoint,
            })?;
        }
        Ok(())
    }

    /// The engine configuration.
    pub fn config(&self) -> &GammaConfig {
        &self.config
    }

    /// The current LRP, once bootstrapped.
    pub fn lrp(&self) -> Option<&Detail> {
        self.state.lrp.as_ref()
    }

    /// The open stripe, if any.
    pub fn stripe(&self) -> Option<&Detail> {
        self.state.stripe.as_ref()
    }

    /// The pool of reusable boxes.
    pub fn pool(&self) -> &BoxPool {
        &self.state.pool
    }

    /// Index of the last placed detail (`n0 - 1` before the first placement).
    pub fn last_placed_index(&self) -> u64 {
        self.state.last_placed_index
    }

    /// Index at which the current stripe was opened.
    pub fn stripe_first_index(&self) -> u64 {
        self.state.stripe_first_index
    }

    /// Number of endpoints placed so far (starts at 1).
    pub fn endpoints_placed(&self) -> u64 {
        self.state.endpoints_placed
    }

    /// Type of the shape the current stripe was taken from.
    pub fn stripe_from(&self) -> Option<DetailType> {
        self.state.stripe_from
    }

    /// Whether the current stripe advances along the x axis.
    pub fn is_stripe_horizontal(&self) -> bool {
        self.state.is_stripe_horizontal
    }

    /// Number of details placed so far.
    pub fn placed_count(&self) -> u64 {
        self.state.last_placed_index + 1 - self.config.n0
    }

    /// Returns true once a cut has failed.
    pub fn is_failed(&self) -> bool {
        self.state.failed
    }

    /// Gap required before a detail when measured from `index`.
    pub fn required_gap(&self, index: u64) -> f64 {
        self.config.required_gap(index)
    }

    /// The listener registry, e.g. for emitting `AlgorithmEnd`.
    pub fn emitter_mut(&mut self) -> &mut EventEmitter {
        &mut self.emitter
    }
}

/// Removes the most recent entry equal to `target`.
fn remove_detail(placed: &mut Vec<Detail>, target: &Detail) {
    match placed.iter().rposition(|d| d == target) {
        Some(pos) => {
            placed.remove(pos);
        }
        None => log::warn!("{} missing from placed details", target.name),
    }
}
