// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Cardwheel uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! keep per-frame sweeps incremental. Each channel represents an independent
//! category of change.
//!
//! # Propagation semantics
//!
//! Channels differ in whether dirtiness reaches the whole strip:
//!
//! - **Deck-wide** — [`POSE`] and [`ALPHA`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges
//!   from each card to the reserved wheel key. Marking the wheel (scroll or
//!   transform-parameter changes) automatically marks every card, because
//!   every card's position on the polygon moves with the wheel. Per-card
//!   marks (extent changes) stay local.
//!
//! - **Local-only** — [`VISIBILITY`] is marked with the default policy.
//!   The strip is flat, so a hidden flag affects only the flagged card.
//!
//! - **Structural** — [`STRIP`] is marked on strip mutations (create or
//!   destroy card). Cards behind a destroyed card are re-marked on [`POSE`]
//!   and [`ALPHA`] because their strip positions shift.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`DeckStore::sweep`](crate::deck::DeckStore::sweep) call drains all
//! channels and surfaces the results as
//! [`SweepChanges`](crate::deck::SweepChanges), which presenters
//! [consume](crate::presenter::Presenter::apply) to apply incremental
//! updates.

use understory_dirty::Channel;

/// Pose input changed — the card's pivot, rotation, or translation must be
/// recomputed.
pub const POSE: Channel = Channel::new(0);

/// Alpha input changed — the card's opacity must be recomputed.
pub const ALPHA: Channel = Channel::new(1);

/// Hidden flag changed — no propagation needed.
pub const VISIBILITY: Channel = Channel::new(2);

/// Strip membership changed — a card was created or destroyed.
pub const STRIP: Channel = Channel::new(3);
