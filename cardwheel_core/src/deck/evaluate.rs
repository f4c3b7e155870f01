// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sweep evaluation and change tracking.
//!
//! A sweep follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **POSE** — Drain dirty indices, recompute each card's resolved pose
//!    from the transform parameters, its extent, and its scroll position.
//! 2. **ALPHA** — Drain dirty indices, recompute each card's resolved
//!    alpha from its scroll position.
//! 3. **VISIBILITY** — Drain dirty indices, record hidden/unhidden
//!    transitions against the last presented state.
//! 4. **STRIP** — Drain and discard (strip order is maintained eagerly by
//!    create/destroy).
//!
//! [`SweepChanges`] uses raw slot indices (`u32`) rather than [`CardId`]
//! handles so that presenters can index directly into the store's SoA
//! arrays via the `*_at()` accessors (e.g.
//! [`resolved_pose_at`](super::DeckStore::resolved_pose_at)) without paying
//! for generation checks on every access.
//!
//! [`CardId`]: super::CardId

use alloc::vec::Vec;

use crate::dirty;

use super::id::INVALID;
use super::store::DeckStore;

/// The set of changes produced by a single [`DeckStore::sweep`] call.
///
/// Each field contains the raw slot indices of cards that changed in the
/// corresponding category. Presenters use these to apply incremental
/// updates.
#[derive(Clone, Debug, Default)]
pub struct SweepChanges {
    /// Cards whose resolved pose was recomputed.
    pub poses: Vec<u32>,
    /// Cards whose resolved alpha was recomputed.
    pub alphas: Vec<u32>,
    /// Cards that transitioned from visible to hidden.
    pub hidden: Vec<u32>,
    /// Cards that transitioned from hidden to visible.
    pub unhidden: Vec<u32>,
    /// Cards added since the last sweep.
    pub added: Vec<u32>,
    /// Cards removed since the last sweep.
    pub removed: Vec<u32>,
    /// Whether the strip membership or order changed.
    pub strip_changed: bool,
}

impl SweepChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.poses.clear();
        self.alphas.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.added.clear();
        self.removed.clear();
        self.strip_changed = false;
    }
}

impl DeckStore {
    /// Sweeps the deck, recomputing dirty cards and returning the set of
    /// changes.
    ///
    /// This drains each dirty channel and resolves poses and alphas for the
    /// current scroll position. Cards untouched since the last sweep are
    /// not recomputed.
    pub fn sweep(&mut self) -> SweepChanges {
        let mut changes = SweepChanges::default();
        self.sweep_into(&mut changes);
        changes
    }

    /// Like [`sweep`](Self::sweep), but reuses a caller-provided buffer to
    /// avoid allocation.
    pub fn sweep_into(&mut self, changes: &mut SweepChanges) {
        changes.clear();

        if self.strip_pending {
            changes.strip_changed = true;
            self.strip_pending = false;
        }

        // Drain POSE channel — collect dirty indices, then recompute. The
        // drain includes the wheel key and may include freed slots; both are
        // filtered out by the liveness check.
        let mut dirty_poses: Vec<u32> = self
            .dirty
            .drain(dirty::POSE)
            .affected()
            .deterministic()
            .run()
            .collect();
        dirty_poses.retain(|&idx| self.is_live_slot(idx));
        for &idx in &dirty_poses {
            let position = self.position_of(idx);
            self.resolved_pose[idx as usize] =
                self.transform.pose(self.extent[idx as usize], position);
        }
        changes.poses = dirty_poses;

        // Drain ALPHA channel.
        let mut dirty_alphas: Vec<u32> = self
            .dirty
            .drain(dirty::ALPHA)
            .affected()
            .deterministic()
            .run()
            .collect();
        dirty_alphas.retain(|&idx| self.is_live_slot(idx));
        for &idx in &dirty_alphas {
            let position = self.position_of(idx);
            self.resolved_alpha[idx as usize] = self.transform.alpha(position);
        }
        changes.alphas = dirty_alphas;

        // Drain VISIBILITY channel — record transitions only.
        let mut dirty_visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        dirty_visibility.retain(|&idx| self.is_live_slot(idx));
        for &idx in &dirty_visibility {
            let new_hidden = self.flags[idx as usize].hidden;
            let old_hidden = self.presented_hidden[idx as usize];
            if new_hidden != old_hidden {
                if new_hidden {
                    changes.hidden.push(idx);
                } else {
                    changes.unhidden.push(idx);
                }
                self.presented_hidden[idx as usize] = new_hidden;
            }
        }

        // Drain STRIP channel (just consume, changes are structural).
        let _: Vec<u32> = self.dirty.drain(dirty::STRIP).deterministic().run().collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Whether `idx` names a live card slot (filters the wheel key and
    /// freed slots out of drain output).
    fn is_live_slot(&self, idx: u32) -> bool {
        idx < self.len && self.strip_index[idx as usize] != INVALID
    }
}
