// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded sweeps.
//!
//! [`export`] serializes a [`RecorderSink`](crate::recorder::RecorderSink)
//! recording as a JSON array of event objects, one object per event, for
//! offline inspection or plotting.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as a JSON array.
///
/// Each event becomes one object tagged with a `"type"` field
/// (`sweep_begin`, `sweep_end`, or `card_resolve`).
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());

    for event in events {
        match event {
            RecordedEvent::SweepBegin(e) => {
                out.push(json!({
                    "type": "sweep_begin",
                    "sweep_index": e.sweep_index,
                    "scroll": e.scroll,
                    "cards": e.cards,
                }));
            }
            RecordedEvent::SweepEnd(e) => {
                out.push(json!({
                    "type": "sweep_end",
                    "sweep_index": e.sweep_index,
                    "poses": e.poses,
                    "alphas": e.alphas,
                    "hidden": e.hidden,
                    "unhidden": e.unhidden,
                    "strip_changed": e.strip_changed,
                }));
            }
            RecordedEvent::CardResolve(e) => {
                out.push(json!({
                    "type": "card_resolve",
                    "sweep_index": e.sweep_index,
                    "card": e.card,
                    "position": e.position,
                    "rotation": e.rotation,
                    "alpha": e.alpha,
                }));
            }
        }
    }

    serde_json::to_writer_pretty(&mut *writer, &out)?;
    writer.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use cardwheel_core::trace::{CardResolveEvent, SweepBeginEvent};

    use super::*;

    #[test]
    fn export_is_parseable_and_tagged() {
        let events = [
            RecordedEvent::SweepBegin(SweepBeginEvent {
                sweep_index: 3,
                scroll: 0.25,
                cards: 2,
            }),
            RecordedEvent::CardResolve(CardResolveEvent {
                sweep_index: 3,
                card: 1,
                position: 0.75,
                rotation: 22.5,
                alpha: 0.75,
            }),
        ];

        let mut buf = Vec::new();
        export(&events, &mut buf).unwrap();

        let parsed: Vec<Value> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["type"], "sweep_begin");
        assert_eq!(parsed[0]["cards"], 2);
        assert_eq!(parsed[1]["type"], "card_resolve");
        assert_eq!(parsed[1]["rotation"], 22.5);
    }
}
