//! Lifecycle events and listener dispatch.
//!
//! The engine emits [`GammaEvent::AfterDetailPlaced`], [`GammaEvent::BeforeLrpCut`]
//! and [`GammaEvent::AfterLrpCut`]. [`GammaEvent::AlgorithmEnd`] is emitted by
//! the driver once its size stream is exhausted.
//!
//! Listeners are purely observational. Each one declares the single
//! [`EventKind`] it handles; dispatch runs in registration order and stops at
//! the first failing listener.

use crate::detail::{Detail, DetailType};
use crate::Result;

/// The kind of event a listener is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A detail was placed into the current stripe.
    AfterDetailPlaced,
    /// A stripe is about to be cut from the LRP.
    BeforeLrpCut,
    /// A stripe was cut from the LRP.
    AfterLrpCut,
    /// The driver finished feeding details.
    AlgorithmEnd,
}

/// Transient engine state at the moment an event fires.
#[derive(Debug, Clone, Copy)]
pub struct EngineSnapshot<'a> {
    /// The gap exponent.
    pub gamma: f64,
    /// Index of the first detail of the run.
    pub n0: u64,
    /// Planned number of placements, if configured.
    pub max_placed: Option<u64>,
    /// Current LRP.
    pub lrp: &'a Detail,
    /// Current stripe, if one is open.
    pub stripe: Option<&'a Detail>,
    /// Placement index at which the current stripe was opened.
    pub stripe_first_index: u64,
    /// Whether details advance along the x axis of the stripe.
    pub is_stripe_horizontal: bool,
    /// Index of the last placed detail.
    pub last_placed_index: u64,
    /// Number of endpoints placed so far.
    pub endpoints_placed: u64,
    /// Type of the shape the current stripe was taken from.
    pub stripe_from: Option<DetailType>,
    /// The size being placed: extent along the placement axis, then across it.
    pub size: (f64, f64),
    /// The placed-details collection, present only when tracking is enabled.
    pub placed_details: Option<&'a [Detail]>,
}

/// Terminal state reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndSnapshot {
    /// The gap exponent.
    pub gamma: f64,
    /// Index of the first detail of the run.
    pub n0: u64,
    /// Planned number of placements, if configured.
    pub max_placed: Option<u64>,
    /// Index of the last placed detail.
    pub last_placed_index: u64,
}

/// An event emitted during a packing run.
#[derive(Debug, Clone, Copy)]
pub enum GammaEvent<'a> {
    /// A detail was placed, producing a normal box and a new endpoint.
    AfterDetailPlaced {
        /// Engine state after the placement.
        state: EngineSnapshot<'a>,
        /// The placed detail.
        placed_detail: &'a Detail,
        /// The normal box generated by the placement.
        normal_box: &'a Detail,
        /// The endpoint that became the new stripe.
        endpoint: &'a Detail,
    },
    /// A stripe is about to be cut from the LRP.
    BeforeLrpCut(EngineSnapshot<'a>),
    /// A stripe was cut from the LRP.
    AfterLrpCut(EngineSnapshot<'a>),
    /// The run finished.
    AlgorithmEnd(EndSnapshot),
}

impl<'a> GammaEvent<'a> {
    /// Returns the kind tag used for dispatch.
    pub fn kind(&self) -> EventKind {
        match self {
            GammaEvent::AfterDetailPlaced { .. } => EventKind::AfterDetailPlaced,
            GammaEvent::BeforeLrpCut(_) => EventKind::BeforeLrpCut,
            GammaEvent::AfterLrpCut(_) => EventKind::AfterLrpCut,
            GammaEvent::AlgorithmEnd(_) => EventKind::AlgorithmEnd,
        }
    }

    /// Engine state, for every event except `AlgorithmEnd`.
    pub fn state(&self) -> Option<&EngineSnapshot<'a>> {
        match self {
            GammaEvent::AfterDetailPlaced { state, .. }
            | GammaEvent::BeforeLrpCut(state)
            | GammaEvent::AfterLrpCut(state) => Some(state),
            GammaEvent::AlgorithmEnd(_) => None,
        }
    }

    /// The gap exponent of the run.
    pub fn gamma(&self) -> f64 {
        match self {
            GammaEvent::AlgorithmEnd(end) => end.gamma,
            _ => self.state().map(|s| s.gamma).unwrap_or_default(),
        }
    }

    /// Index of the last placed detail.
    pub fn last_placed_index(&self) -> u64 {
        match self {
            GammaEvent::AlgorithmEnd(end) => end.last_placed_index,
            _ => self.state().map(|s| s.last_placed_index).unwrap_or_default(),
        }
    }
}

/// Observer of packing events.
pub trait StatisticListener {
    /// The single event kind this listener handles.
    fn event_kind(&self) -> EventKind;

    /// Handles an event of [`Self::event_kind`]. An error halts the run.
    fn handle(&mut self, event: &GammaEvent<'_>) -> Result<()>;
}

/// Adapts a closure into a [`StatisticListener`].
pub struct FnListener<F> {
    kind: EventKind,
    f: F,
}

impl<F> FnListener<F>
where
    F: FnMut(&GammaEvent<'_>) -> Result<()>,
{
    /// Creates a listener for `kind` that calls `f`.
    pub fn new(kind: EventKind, f: F) -> Self {
        Self { kind, f }
    }
}

impl<F> StatisticListener for FnListener<F>
where
    F: FnMut(&GammaEvent<'_>) -> Result<()>,
{
    fn event_kind(&self) -> EventKind {
        self.kind
    }

    fn handle(&mut self, event: &GammaEvent<'_>) -> Result<()> {
        (self.f)(event)
    }
}

/// Ordered registry of listeners.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<Box<dyn StatisticListener>>,
}

impl EventEmitter {
    /// Creates an emitter without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener; it runs after all earlier registrations.
    pub fn register(&mut self, listener: Box<dyn StatisticListener>) {
        self.listeners.push(listener);
    }

    /// Builder-style registration.
    pub fn with_listener(mut self, listener: Box<dyn StatisticListener>) -> Self {
        self.register(listener);
        self
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns true if some listener handles `kind`.
    pub fn has_listener_for(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|l| l.event_kind() == kind)
    }

    /// Delivers `event` to every listener declaring its kind.
    pub fn emit(&mut self, event: &GammaEvent<'_>) -> Result<()> {
        let kind = event.kind();
        for listener in self
            .listeners
            .iter_mut()
            .filter(|l| l.event_kind() == kind)
        {
            listener.handle(event)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
