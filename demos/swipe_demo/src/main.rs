// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated swipe loop that exercises the whole Cardwheel stack.
//!
//! Builds a bilingual animal deck from the preference store, sweeps the
//! scroll position across every card while recording events to both a
//! [`PrettyPrintSink`](cardwheel_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](cardwheel_debug::recorder::RecorderSink), grades the
//! gesture with the continuity tracker, then exports a JSON trace file.

use std::fs::File;
use std::io::BufWriter;

use cardwheel_core::deck::{CardId, DeckStore, SweepChanges};
use cardwheel_core::presenter::Presenter;
use cardwheel_core::trace::{CardResolveEvent, SweepBeginEvent, SweepEndEvent, TraceSink};
use cardwheel_core::transform::RotationTransform;
use kurbo::Size;

use cardwheel_harness::{ContinuityTracker, SweepPlan, SweepSample};
use cardwheel_prefs::{Language, PrefStore};

use cardwheel_debug::pretty::PrettyPrintSink;
use cardwheel_debug::recorder::RecorderSink;

/// Inner polygon angle between adjacent cards.
const DEGREES_BETWEEN_CARDS: i32 = 150;
/// Simulated card size in pixels.
const CARD_EXTENT: Size = Size::new(1000.0, 1600.0);
/// Frames per swiped card.
const FRAMES_PER_CARD: u32 = 30;
/// Number of cards in the demo deck.
const CARD_COUNT: u32 = 4;

/// Words shown on the deck, per language (a nod to the classic animal
/// flashcards).
const WORDS: [[&str; 3]; CARD_COUNT as usize] = [
    ["dog", "chien", "perro"],
    ["cat", "chat", "gato"],
    ["bird", "oiseau", "pájaro"],
    ["fish", "poisson", "pez"],
];

fn word(card: usize, language: Language) -> &'static str {
    let column = match language {
        Language::English => 0,
        Language::French => 1,
        Language::Spanish => 2,
    };
    WORDS[card][column]
}

/// A presenter that narrates changes instead of driving native views.
struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn apply(&mut self, deck: &DeckStore, changes: &SweepChanges) {
        for &idx in &changes.poses {
            if deck.presented_hidden_at(idx) {
                continue;
            }
            let pose = deck.resolved_pose_at(idx);
            let alpha = deck.resolved_alpha_at(idx);
            if alpha > 0.0 {
                println!(
                    "    apply card {idx}: rot={:+7.3} tx={:+8.1} alpha={:.3}",
                    pose.rotation, pose.translation_x, alpha
                );
            }
        }
    }
}

fn main() {
    env_logger::init();

    // -- preferences -------------------------------------------------------
    let prefs_path = std::env::temp_dir().join("cardwheel-swipe-demo-prefs.json");
    let mut prefs = PrefStore::open_or_default(&prefs_path);
    let (top, bottom) = (prefs.top_language(), prefs.bottom_language());
    println!(
        "deck languages: {top} ({}) over {bottom} ({})",
        top.flag_asset(),
        bottom.flag_asset()
    );

    // Swap the faces for next run, through the staged editor.
    if let Err(e) = prefs
        .edit()
        .set_top_language(bottom)
        .set_bottom_language(top)
        .commit()
    {
        log::warn!("could not persist language swap: {e}");
    }

    // -- deck --------------------------------------------------------------
    let transform = RotationTransform::new(DEGREES_BETWEEN_CARDS);
    let mut deck = DeckStore::new(transform);
    let cards: Vec<CardId> = (0..CARD_COUNT).map(|_| deck.create_card()).collect();
    for (i, &id) in cards.iter().enumerate() {
        deck.set_extent(id, CARD_EXTENT);
        println!(
            "card {i}: {} / {}",
            word(i, top),
            word(i, bottom)
        );
    }

    // -- sinks and metrics -------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut presenter = ConsolePresenter;
    let mut tracker: ContinuityTracker<32> = ContinuityTracker::new(transform, 2.0);
    let watched = cards[1];

    // -- simulated swipe ---------------------------------------------------
    let last = f64::from(CARD_COUNT - 1);
    let steps = FRAMES_PER_CARD * (CARD_COUNT - 1);
    let mut changes = SweepChanges::default();
    let mut report = None;

    for (sweep_index, scroll) in SweepPlan::new(0.0, last, steps).enumerate() {
        let sweep_index = sweep_index as u64;
        deck.set_scroll(scroll);

        let begin = SweepBeginEvent {
            sweep_index,
            scroll,
            cards: CARD_COUNT,
        };
        pretty.on_sweep_begin(&begin);
        recorder.on_sweep_begin(&begin);

        deck.sweep_into(&mut changes);

        for &idx in &changes.poses {
            let resolve = CardResolveEvent {
                sweep_index,
                card: idx,
                position: deck.position_at(idx),
                rotation: deck.resolved_pose_at(idx).rotation,
                alpha: deck.resolved_alpha_at(idx),
            };
            pretty.on_card_resolve(&resolve);
            recorder.on_card_resolve(&resolve);
        }

        presenter.apply(&deck, &changes);

        let end = SweepEndEvent::new(sweep_index, &changes);
        pretty.on_sweep_end(&end);
        recorder.on_sweep_end(&end);

        report = Some(tracker.observe(SweepSample {
            position: deck.position(watched),
            rotation: deck.resolved_pose(watched).rotation,
            alpha: deck.resolved_alpha(watched),
        }));
    }

    if let Some(report) = report {
        println!(
            "continuity grade {} (max step {:.3} deg, {} alpha violations over {} frames)",
            report.grade.as_str(),
            report.max_rotation_step,
            report.alpha_violations,
            report.total_samples
        );
    }

    // -- export ------------------------------------------------------------
    let out_path = std::env::temp_dir().join("cardwheel-swipe-demo-trace.json");
    match File::create(&out_path) {
        Ok(file) => {
            let mut writer = BufWriter::new(file);
            match cardwheel_debug::json::export(recorder.events(), &mut writer) {
                Ok(()) => println!("wrote {} events to {}", recorder.events().len(), out_path.display()),
                Err(e) => log::error!("trace export failed: {e}"),
            }
        }
        Err(e) => log::error!("could not create {}: {e}", out_path.display()),
    }
}
