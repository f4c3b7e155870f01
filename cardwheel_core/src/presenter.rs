// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presenter contract for host view-pagers.
//!
//! Cardwheel computes transforms; it never touches a platform view tree.
//! The host side provides the following pieces:
//!
//! - **Scroll source** — Feeds drag and settle offsets into
//!   [`DeckStore::set_scroll`] once per frame. This is host-specific and
//!   not abstracted by a trait because gesture plumbing differs
//!   fundamentally across UI frameworks.
//!
//! - **Presenter** — Implements the [`Presenter`] trait to apply sweep
//!   changes to native views (pivot, rotation, horizontal offset, alpha).
//!
//! # Crate boundaries
//!
//! `cardwheel_core` owns the data model, the transform math, and this
//! contract module. Host integrations depend on `cardwheel_core` and wire
//! the pieces together in their frame callback.
//!
//! [`DeckStore::set_scroll`]: crate::deck::DeckStore::set_scroll

use crate::deck::{DeckStore, SweepChanges};

/// Applies swept deck changes to a host-native view hierarchy.
///
/// Both real view-pager integrations and test doubles implement this
/// trait, enabling generic frame loops.
///
/// # Frame loop pseudocode
///
/// A typical drag callback wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_drag(offset_in_cards: f64) {
///     deck.set_scroll(offset_in_cards);
///     let changes = deck.sweep();
///     presenter.apply(&deck, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`SweepChanges`] to the backing view hierarchy,
    /// reading current resolved values from `deck` as needed.
    fn apply(&mut self, deck: &DeckStore, changes: &SweepChanges);
}
