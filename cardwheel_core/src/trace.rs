// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the sweep loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! sweep-loop instrumentation calls at each stage. All method bodies
//! default to no-ops, so implementing only the events you care about is
//! fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`CardResolveEvent`] and the
//!   corresponding `TraceSink` method.

use crate::deck::SweepChanges;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a sweep starts.
#[derive(Clone, Copy, Debug)]
pub struct SweepBeginEvent {
    /// Monotonic sweep counter.
    pub sweep_index: u64,
    /// Deck scroll position at the start of the sweep.
    pub scroll: f64,
    /// Number of live cards in the strip.
    pub cards: u32,
}

/// Emitted when a sweep completes, summarizing what changed.
#[derive(Clone, Copy, Debug)]
pub struct SweepEndEvent {
    /// Sweep counter, matching the begin event.
    pub sweep_index: u64,
    /// Number of cards whose pose was recomputed.
    pub poses: u32,
    /// Number of cards whose alpha was recomputed.
    pub alphas: u32,
    /// Number of visible→hidden transitions.
    pub hidden: u32,
    /// Number of hidden→visible transitions.
    pub unhidden: u32,
    /// Whether the strip membership or order changed.
    pub strip_changed: bool,
}

impl SweepEndEvent {
    /// Creates a `SweepEndEvent` from a finished [`SweepChanges`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "change-list lengths are bounded by the u32 slot counter"
    )]
    pub fn new(sweep_index: u64, changes: &SweepChanges) -> Self {
        Self {
            sweep_index,
            poses: changes.poses.len() as u32,
            alphas: changes.alphas.len() as u32,
            hidden: changes.hidden.len() as u32,
            unhidden: changes.unhidden.len() as u32,
            strip_changed: changes.strip_changed,
        }
    }
}

/// A per-card resolve record (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct CardResolveEvent {
    /// Sweep counter.
    pub sweep_index: u64,
    /// Raw slot index of the resolved card.
    pub card: u32,
    /// Scroll position the card was resolved at.
    pub position: f64,
    /// Resolved rotation in degrees.
    pub rotation: f64,
    /// Resolved alpha.
    pub alpha: f32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the sweep loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a sweep starts.
    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        _ = e;
    }

    /// Called when a sweep completes.
    fn on_sweep_end(&mut self, e: &SweepEndEvent) {
        _ = e;
    }

    /// Called once per resolved card (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_card_resolve(&mut self, e: &CardResolveEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SweepBeginEvent`].
    #[inline]
    pub fn sweep_begin(&mut self, e: &SweepBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sweep_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SweepEndEvent`].
    #[inline]
    pub fn sweep_end(&mut self, e: &SweepEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sweep_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CardResolveEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn card_resolve(&mut self, e: &CardResolveEvent) {
        if let Some(s) = &mut self.sink {
            s.on_card_resolve(e);
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        begins: u32,
        ends: u32,
    }

    impl TraceSink for CountingSink {
        fn on_sweep_begin(&mut self, _e: &SweepBeginEvent) {
            self.begins += 1;
        }

        fn on_sweep_end(&mut self, _e: &SweepEndEvent) {
            self.ends += 1;
        }
    }

    #[test]
    fn tracer_dispatches_to_sink() {
        let mut sink = CountingSink::default();
        let mut tracer = Tracer::new(&mut sink);
        tracer.sweep_begin(&SweepBeginEvent {
            sweep_index: 0,
            scroll: 0.0,
            cards: 3,
        });
        tracer.sweep_end(&SweepEndEvent::new(0, &SweepChanges::default()));
        drop(tracer);
        assert_eq!(sink.begins, 1);
        assert_eq!(sink.ends, 1);
    }

    #[test]
    fn none_tracer_is_silent() {
        let mut tracer = Tracer::none();
        tracer.sweep_begin(&SweepBeginEvent {
            sweep_index: 0,
            scroll: 0.0,
            cards: 0,
        });
    }
}
