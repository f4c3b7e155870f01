// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon-rotation transform and deck model for swipeable card pagers.
//!
//! `cardwheel_core` provides the geometry and data model behind the
//! "rotating polygon" page effect: each card in a deck is treated as one
//! edge of an imagined regular polygon, and swiping between cards rotates
//! that polygon so adjacent cards appear to join at an edge. It is `no_std`
//! compatible (with `alloc`) and uses array-based struct-of-arrays storage
//! with index handles for cache-friendly sweeps.
//!
//! # Architecture
//!
//! The crate is organized around a sweep loop that turns host scroll
//! updates into incremental per-card transform changes:
//!
//! ```text
//!   Host view-pager (drag / settle)
//!       │
//!       ▼
//!   DeckStore::set_scroll ──► DeckStore::sweep() ──► SweepChanges
//!                                                        │
//!                 ┌──────────────────────────────────────┘
//!                 ▼
//!   Presenter::apply() ──► native views (pivot, rotation, offset, alpha)
//! ```
//!
//! **[`transform`]** — The closed-form rotation function: scroll position
//! and card extent in, pivot, rotation, translation, and alpha out.
//!
//! **[`deck`]** — Struct-of-arrays card storage with generational handles.
//! Per-card properties (extent, flags) and deck-level properties (scroll,
//! transform parameters) are set by the caller; resolved poses and alphas
//! are computed by sweeping.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! Property mutations automatically mark the appropriate channel. Deck-level
//! mutations propagate to every card through the wheel key; per-card
//! mutations are local.
//!
//! **[`presenter`]** — The [`Presenter`](presenter::Presenter) trait that
//! host view-pagers implement to apply sweep changes to native views.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! sweep-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-card
//!   resolve events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod deck;
pub mod dirty;
pub mod presenter;
pub mod trace;
pub mod transform;
