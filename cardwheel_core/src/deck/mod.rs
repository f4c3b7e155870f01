// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deck data model.
//!
//! A *card* is one swipeable view in a pager deck. Each card has:
//!
//! - An identity ([`CardId`]) — a generational handle that becomes stale
//!   when the card is destroyed, preventing use-after-free bugs at the API
//!   level.
//! - A place in the *strip* — the flat, ordered sequence of live cards. A
//!   card's scroll position is its strip index minus the deck scroll.
//! - **Local properties** set by the caller:
//!   [`extent`](DeckStore::set_extent) and [`flags`](DeckStore::set_flags).
//! - **Computed properties** produced by [`sweep`](DeckStore::sweep): the
//!   resolved [`CardPose`](crate::transform::CardPose) and alpha for the
//!   current scroll position.
//!
//! Deck-level properties — the scroll position and the
//! [`RotationTransform`](crate::transform::RotationTransform) parameters —
//! live on the store itself and invalidate every card when mutated.
//!
//! Cards are stored in struct-of-arrays layout with index-based handles for
//! cache-friendly sweeps.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)). Deck-level mutations propagate to all
//! cards through the wheel key; per-card mutations are local.

mod evaluate;
mod id;
mod iter;
mod store;

pub use evaluate::SweepChanges;
pub use id::{CardId, INVALID};
pub use iter::Cards;
pub use store::{CardFlags, DeckStore};
