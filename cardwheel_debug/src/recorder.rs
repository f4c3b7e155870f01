// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores each event as a
//! [`RecordedEvent`], preserving arrival order across event kinds. Use
//! [`json::export`](crate::json::export) to serialize a recording.

use cardwheel_core::trace::{CardResolveEvent, SweepBeginEvent, SweepEndEvent, TraceSink};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A sweep started.
    SweepBegin(SweepBeginEvent),
    /// A sweep completed.
    SweepEnd(SweepEndEvent),
    /// A card was resolved.
    CardResolve(CardResolveEvent),
}

/// A [`TraceSink`] that stores events in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded events.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }
}

impl TraceSink for RecorderSink {
    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        self.events.push(RecordedEvent::SweepBegin(*e));
    }

    fn on_sweep_end(&mut self, e: &SweepEndEvent) {
        self.events.push(RecordedEvent::SweepEnd(*e));
    }

    fn on_card_resolve(&mut self, e: &CardResolveEvent) {
        self.events.push(RecordedEvent::CardResolve(*e));
    }
}
