// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays card storage with allocation, strip order, and property
//! management.

use alloc::vec::Vec;

use kurbo::Size;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::transform::{CardPose, RotationTransform};

use super::id::{CardId, INVALID};
use super::iter::Cards;

/// Reserved dirty-tracker key for deck-level properties.
///
/// Every card has dependency edges to this key on the POSE and ALPHA
/// channels, so marking the wheel eagerly marks the whole strip. Must never
/// collide with a card slot index.
pub(crate) const WHEEL: u32 = u32::MAX - 1;

/// Per-card boolean flags.
///
/// Setting [`hidden`](Self::hidden) suppresses the card's visual
/// contribution without removing it from the strip; neighbouring cards keep
/// their positions. Properties can still be mutated while hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CardFlags {
    /// Whether the card is hidden.
    pub hidden: bool,
}

/// Struct-of-arrays storage for all cards in a deck.
///
/// Cards are addressed by [`CardId`] handles. Internally, each card occupies
/// a slot in parallel arrays. Destroyed cards are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// The deck also owns the two wheel-level properties that drive every card:
/// the [scroll position](Self::set_scroll) and the
/// [`RotationTransform`](Self::set_transform) parameters.
#[derive(Debug)]
pub struct DeckStore {
    // -- Strip --
    pub(crate) strip: Vec<u32>,
    pub(crate) strip_index: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) extent: Vec<Size>,
    pub(crate) flags: Vec<CardFlags>,

    // -- Wheel-level properties --
    pub(crate) transform: RotationTransform,
    pub(crate) scroll: f64,

    // -- Computed properties (written by sweep) --
    pub(crate) resolved_pose: Vec<CardPose>,
    pub(crate) resolved_alpha: Vec<f32>,
    pub(crate) presented_hidden: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) strip_pending: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl DeckStore {
    /// Creates an empty deck driven by the given transform parameters.
    #[must_use]
    pub fn new(transform: RotationTransform) -> Self {
        Self {
            strip: Vec::new(),
            strip_index: Vec::new(),
            extent: Vec::new(),
            flags: Vec::new(),
            transform,
            scroll: 0.0,
            resolved_pose: Vec::new(),
            resolved_alpha: Vec::new(),
            presented_hidden: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            strip_pending: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new card and appends it to the end of the strip.
    ///
    /// The card starts with a zero extent, default flags, and a rest pose;
    /// callers set the extent once the host has laid the card out.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "strip length is bounded by the u32 slot counter"
    )]
    pub fn create_card(&mut self) -> CardId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.extent[idx as usize] = Size::ZERO;
            self.flags[idx as usize] = CardFlags::default();
            self.resolved_pose[idx as usize] = CardPose::REST;
            self.resolved_alpha[idx as usize] = 1.0;
            self.presented_hidden[idx as usize] = false;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.strip_index.push(INVALID);
            self.extent.push(Size::ZERO);
            self.flags.push(CardFlags::default());
            self.resolved_pose.push(CardPose::REST);
            self.resolved_alpha.push(1.0);
            self.presented_hidden.push(false);
            self.generation.push(0);
            idx
        };

        self.strip.push(idx);
        self.strip_index[idx as usize] = (self.strip.len() - 1) as u32;

        // Dirty dependency edges: the card follows the wheel for POSE and ALPHA.
        let _ = self.dirty.add_dependency(idx, WHEEL, dirty::POSE);
        let _ = self.dirty.add_dependency(idx, WHEEL, dirty::ALPHA);

        // Resolve the new card on the next sweep.
        self.dirty.mark(idx, dirty::POSE);
        self.dirty.mark(idx, dirty::ALPHA);

        self.strip_pending = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::STRIP);

        CardId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a card, removing it from the strip and freeing its slot for
    /// reuse.
    ///
    /// Cards behind the destroyed one shift forward; their poses and alphas
    /// are recomputed on the next sweep.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_card(&mut self, id: CardId) {
        self.validate(id);
        let idx = id.idx;

        let at = self.strip_index[idx as usize] as usize;
        self.strip.remove(at);
        self.strip_index[idx as usize] = INVALID;

        // Everything behind the removed card moves one position forward.
        for &shifted in &self.strip[at..] {
            self.strip_index[shifted as usize] -= 1;
            self.dirty.mark(shifted, dirty::POSE);
            self.dirty.mark(shifted, dirty::ALPHA);
        }

        // Remove dirty tracking dependencies.
        self.dirty.remove_dependency(idx, WHEEL, dirty::POSE);
        self.dirty.remove_dependency(idx, WHEEL, dirty::ALPHA);
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.strip_pending = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::STRIP);
    }

    /// Returns whether the given handle refers to a live card.
    #[must_use]
    pub fn is_alive(&self, id: CardId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Strip API --

    /// Returns the number of live cards in the strip.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.strip.len()
    }

    /// Returns the raw slot indices of live cards in strip order.
    #[must_use]
    pub fn strip_order(&self) -> &[u32] {
        &self.strip
    }

    /// Returns an iterator over the live cards in strip order.
    #[must_use]
    pub fn cards(&self) -> Cards<'_> {
        Cards::new(self)
    }

    /// Returns the scroll position of a card: its strip index minus the
    /// deck scroll (0 = centered, ±1 = fully adjacent).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn position(&self, id: CardId) -> f64 {
        self.validate(id);
        self.position_of(id.idx)
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the extent of a card in pixels.
    #[must_use]
    pub fn extent(&self, id: CardId) -> Size {
        self.validate(id);
        self.extent[id.idx as usize]
    }

    /// Returns the flags of a card.
    #[must_use]
    pub fn flags(&self, id: CardId) -> CardFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the deck scroll position in card units.
    #[must_use]
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Returns the transform parameters driving the deck.
    #[must_use]
    pub fn transform(&self) -> RotationTransform {
        self.transform
    }

    /// Returns the resolved pose of a card.
    ///
    /// Only valid after [`sweep`](Self::sweep) has been called.
    #[must_use]
    pub fn resolved_pose(&self, id: CardId) -> CardPose {
        self.validate(id);
        self.resolved_pose[id.idx as usize]
    }

    /// Returns the resolved alpha of a card.
    ///
    /// Only valid after [`sweep`](Self::sweep) has been called.
    #[must_use]
    pub fn resolved_alpha(&self, id: CardId) -> f32 {
        self.validate(id);
        self.resolved_alpha[id.idx as usize]
    }

    /// Returns whether the card was hidden as of the last sweep.
    ///
    /// Only valid after [`sweep`](Self::sweep) has been called.
    #[must_use]
    pub fn presented_hidden(&self, id: CardId) -> bool {
        self.validate(id);
        self.presented_hidden[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the extent of a card in pixels.
    ///
    /// Marks the POSE channel dirty for that card (the pivot depends on the
    /// extent; the fade does not).
    pub fn set_extent(&mut self, id: CardId, extent: Size) {
        self.validate(id);
        self.extent[id.idx as usize] = extent;
        self.dirty.mark(id.idx, dirty::POSE);
    }

    /// Sets the flags of a card.
    pub fn set_flags(&mut self, id: CardId, flags: CardFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
        self.dirty.mark(id.idx, dirty::VISIBILITY);
    }

    /// Sets the deck scroll position in card units.
    ///
    /// Marks the wheel dirty on POSE and ALPHA with eager propagation, so
    /// every card is recomputed on the next sweep.
    pub fn set_scroll(&mut self, scroll: f64) {
        self.scroll = scroll;
        self.dirty.mark_with(WHEEL, dirty::POSE, &EagerPolicy);
        self.dirty.mark_with(WHEEL, dirty::ALPHA, &EagerPolicy);
    }

    /// Replaces the transform parameters driving the deck.
    ///
    /// Marks the wheel dirty on POSE and ALPHA with eager propagation.
    pub fn set_transform(&mut self, transform: RotationTransform) {
        self.transform = transform;
        self.dirty.mark_with(WHEEL, dirty::POSE, &EagerPolicy);
        self.dirty.mark_with(WHEEL, dirty::ALPHA, &EagerPolicy);
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `SweepChanges`) rather than
    // `CardId` handles, skipping generation validation. Only use with
    // indices that came from `SweepChanges` or `strip_order()`.

    /// Returns the resolved pose at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn resolved_pose_at(&self, idx: u32) -> CardPose {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.resolved_pose[idx as usize]
    }

    /// Returns the resolved alpha at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn resolved_alpha_at(&self, idx: u32) -> f32 {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.resolved_alpha[idx as usize]
    }

    /// Returns whether the card at raw slot `idx` was hidden as of the last
    /// sweep.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn presented_hidden_at(&self, idx: u32) -> bool {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.presented_hidden[idx as usize]
    }

    /// Returns the scroll position of the card at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len` or the slot is not in the strip.
    #[must_use]
    pub fn position_at(&self, idx: u32) -> f64 {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        assert!(
            self.strip_index[idx as usize] != INVALID,
            "slot index {idx} is not in the strip"
        );
        self.position_of(idx)
    }

    /// Returns the extent at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn extent_at(&self, idx: u32) -> Size {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.extent[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: CardId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale CardId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Scroll position of the card at slot `idx` (must be live).
    pub(crate) fn position_of(&self, idx: u32) -> f64 {
        f64::from(self.strip_index[idx as usize]) - self.scroll
    }
}
