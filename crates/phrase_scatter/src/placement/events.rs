//! Event types and sinks for observing placement runs.
//!
//! This module defines [`PlacementEvent`] and a set of sinks to emit, collect, or
//! forward events while a [`crate::placement::PlacementEngine`] places phrases.
use crate::placement::region::TextRegion;
use crate::placement::TextPlacement;
use crate::zone::ZoneId;

/// Describes events emitted while placing phrases.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted when a run over a phrase list starts.
    RunStarted {
        /// Number of phrases to place.
        phrase_count: usize,
        /// Number of zones available to the run.
        zone_count: usize,
    },

    /// Emitted whenever a zone is drawn for an attempt.
    ZonePicked {
        /// Index of the phrase being placed.
        phrase_index: usize,
        /// The zone drawn.
        zone: ZoneId,
    },

    /// Emitted when a candidate region collides with an occupied one.
    AttemptRejected {
        /// Index of the phrase being placed.
        phrase_index: usize,
        /// One-based attempt number.
        attempt: usize,
        /// The discarded candidate.
        region: TextRegion,
    },

    /// Emitted when a phrase found a free spot.
    TextPlaced {
        /// Index of the placed phrase.
        phrase_index: usize,
        /// The placement data.
        placement: TextPlacement,
    },

    /// Emitted when every phrase of the run is placed.
    RunFinished {
        /// Number of phrases placed.
        placed: usize,
    },
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }
}
