// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use cardwheel_core::trace::{CardResolveEvent, SweepBeginEvent, SweepEndEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        let _ = writeln!(
            self.writer,
            "sweep {:>4} begin  scroll={:+.3} cards={}",
            e.sweep_index, e.scroll, e.cards
        );
    }

    fn on_sweep_end(&mut self, e: &SweepEndEvent) {
        let _ = writeln!(
            self.writer,
            "sweep {:>4} end    poses={} alphas={} hidden={} unhidden={} strip_changed={}",
            e.sweep_index, e.poses, e.alphas, e.hidden, e.unhidden, e.strip_changed
        );
    }

    fn on_card_resolve(&mut self, e: &CardResolveEvent) {
        let _ = writeln!(
            self.writer,
            "  card {:>3}        pos={:+.3} rot={:+8.3} alpha={:.3}",
            e.card, e.position, e.rotation, e.alpha
        );
    }
}
