// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Language-selection preferences for bilingual card decks.
//!
//! A bilingual deck shows a prompt in a *top* language and an answer in a
//! *bottom* language. This crate provides the enumerated [`Language`]
//! domain (with wire codes and flag-asset lookup) and [`PrefStore`], a
//! small JSON-file store for the two selections.
//!
//! Writes go through a staged [`Editor`](store::Editor): values set on the
//! editor only reach disk when [`commit`](store::Editor::commit) is called,
//! and dropping the editor discards them. Reads are tolerant — unknown
//! language codes decode as English, and each slot has its own default
//! (English on top, French on the bottom).

pub mod language;
pub mod store;

pub use language::Language;
pub use store::{Editor, PrefStore, PrefsError};
