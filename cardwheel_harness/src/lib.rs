// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable sweep-continuity metrics and grading for demo harnesses.
//!
//! A swipe should read as one continuous rotation: no frame-to-frame
//! rotation jumps, no card brighter than fully opaque, no on-screen card
//! dimmer than the configured floor. [`ContinuityTracker`] is fed one
//! [`SweepSample`] per resolved frame and grades the gesture as it runs,
//! for HUD display or assertions in stress tests.

#![no_std]

extern crate alloc;

use cardwheel_core::transform::RotationTransform;

/// Per-frame sample fed into [`ContinuityTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct SweepSample {
    /// Scroll position the card was resolved at.
    pub position: f64,
    /// Resolved rotation in degrees.
    pub rotation: f64,
    /// Resolved alpha.
    pub alpha: f32,
}

/// Letter grade for swipe smoothness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepGrade {
    /// Continuous rotation, all alphas within bounds.
    A,
    /// Small rotation jumps.
    B,
    /// Noticeable rotation jumps.
    C,
    /// Teleporting rotation or out-of-bounds alphas.
    D,
}

impl SweepGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`ContinuityTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct SweepReport {
    /// Current grade.
    pub grade: SweepGrade,
    /// Largest rotation change between consecutive samples, in degrees.
    pub max_rotation_step: f64,
    /// Samples whose alpha violated the transform's bounds.
    pub alpha_violations: u64,
    /// Total samples observed.
    pub total_samples: u64,
}

/// Rolling continuity tracker with a fixed-size rotation-step history.
///
/// `N` is the ring-buffer size used for the rolling step statistics;
/// `step_budget` is the largest rotation change (degrees) between
/// consecutive samples that still reads as smooth at the host's frame
/// rate.
#[derive(Debug)]
pub struct ContinuityTracker<const N: usize> {
    transform: RotationTransform,
    step_budget: f64,
    steps: [f64; N],
    cursor: usize,
    prev: Option<SweepSample>,
    max_step: f64,
    alpha_violations: u64,
    total_samples: u64,
}

impl<const N: usize> ContinuityTracker<N> {
    /// Creates a tracker for decks driven by `transform`.
    #[must_use]
    pub const fn new(transform: RotationTransform, step_budget: f64) -> Self {
        Self {
            transform,
            step_budget,
            steps: [0.0; N],
            cursor: 0,
            prev: None,
            max_step: 0.0,
            alpha_violations: 0,
            total_samples: 0,
        }
    }

    /// Observes one frame and returns an updated report.
    ///
    /// Rotation steps are scored only while the card is on screen in both
    /// consecutive samples. Crossing the ±1 boundary snaps the card to its
    /// rest rotation while a neighbouring page covers the view; that snap is
    /// part of the effect, not a continuity defect.
    #[must_use]
    pub fn observe(&mut self, sample: SweepSample) -> SweepReport {
        self.total_samples = self.total_samples.saturating_add(1);

        if let Some(prev) = self.prev
            && on_screen(prev.position)
            && on_screen(sample.position)
        {
            let step = abs(sample.rotation - prev.rotation);
            self.steps[self.cursor % N] = step;
            self.cursor = (self.cursor + 1) % N;
            if step > self.max_step {
                self.max_step = step;
            }
        }
        self.prev = Some(sample);

        if self.alpha_out_of_bounds(sample) {
            self.alpha_violations = self.alpha_violations.saturating_add(1);
        }

        SweepReport {
            grade: self.grade(),
            max_rotation_step: self.max_step,
            alpha_violations: self.alpha_violations,
            total_samples: self.total_samples,
        }
    }

    /// Mean rotation step over the ring-buffer window, in degrees.
    #[must_use]
    pub fn rolling_mean_step(&self) -> f64 {
        let mut sum = 0.0;
        for step in &self.steps {
            sum += step;
        }
        sum / N as f64
    }

    fn alpha_out_of_bounds(&self, sample: SweepSample) -> bool {
        if !(0.0..=1.0).contains(&sample.alpha) {
            return true;
        }
        if on_screen(sample.position) {
            sample.alpha < self.transform.min_alpha()
        } else {
            sample.alpha != 0.0
        }
    }

    fn grade(&self) -> SweepGrade {
        if self.alpha_violations > 0 {
            return SweepGrade::D;
        }
        let ratio = self.max_step / self.step_budget;
        if ratio <= 1.0 {
            SweepGrade::A
        } else if ratio <= 2.0 {
            SweepGrade::B
        } else if ratio <= 4.0 {
            SweepGrade::C
        } else {
            SweepGrade::D
        }
    }
}

/// Evenly spaced scroll values for a simulated swipe, endpoints included.
///
/// Yields `steps + 1` values from `from` to `to`; a degenerate plan with
/// `steps == 0` yields only `from`.
#[derive(Clone, Copy, Debug)]
pub struct SweepPlan {
    from: f64,
    to: f64,
    steps: u32,
    next: u32,
}

impl SweepPlan {
    /// Creates a plan sweeping from `from` to `to` in `steps` increments.
    #[must_use]
    pub const fn new(from: f64, to: f64, steps: u32) -> Self {
        Self {
            from,
            to,
            steps,
            next: 0,
        }
    }
}

impl Iterator for SweepPlan {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next > self.steps {
            return None;
        }
        let t = if self.steps == 0 {
            0.0
        } else {
            f64::from(self.next) / f64::from(self.steps)
        };
        self.next += 1;
        Some(self.from + (self.to - self.from) * t)
    }
}

fn on_screen(position: f64) -> bool {
    (-1.0..=1.0).contains(&position)
}

/// `f64::abs` without requiring a float runtime in `no_std` builds.
fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(position: f64, transform: &RotationTransform) -> SweepSample {
        SweepSample {
            position,
            rotation: if (-1.0..=1.0).contains(&position) {
                position * f64::from(180 - transform.degrees())
            } else {
                0.0
            },
            alpha: transform.alpha(position),
        }
    }

    #[test]
    fn dense_sweep_grades_a() {
        let xf = RotationTransform::new(150);
        let mut tracker: ContinuityTracker<16> = ContinuityTracker::new(xf, 2.0);

        let mut report = None;
        for position in SweepPlan::new(-1.0, 1.0, 120) {
            report = Some(tracker.observe(sample(position, &xf)));
        }
        let report = report.unwrap();
        assert_eq!(report.grade, SweepGrade::A);
        assert_eq!(report.alpha_violations, 0);
        assert_eq!(report.total_samples, 121);
        // 30 degrees over 120 steps.
        assert!(report.max_rotation_step <= 0.25 + 1e-9);
    }

    #[test]
    fn teleporting_sweep_degrades() {
        let xf = RotationTransform::new(150);
        let mut tracker: ContinuityTracker<16> = ContinuityTracker::new(xf, 2.0);

        let _ = tracker.observe(sample(-1.0, &xf));
        let report = tracker.observe(sample(1.0, &xf));
        // 60 degrees in one frame.
        assert_eq!(report.grade, SweepGrade::D);
        assert_eq!(report.max_rotation_step, 60.0);
    }

    #[test]
    fn boundary_crossing_is_not_a_step() {
        let xf = RotationTransform::new(150);
        let mut tracker: ContinuityTracker<16> = ContinuityTracker::new(xf, 2.0);

        // Rotation snaps from ~29.4 to 0 as the card leaves the screen.
        let _ = tracker.observe(sample(0.98, &xf));
        let report = tracker.observe(sample(1.02, &xf));
        assert_eq!(report.grade, SweepGrade::A);
        assert_eq!(report.max_rotation_step, 0.0);
        assert_eq!(report.alpha_violations, 0);
    }

    #[test]
    fn alpha_violation_forces_d() {
        let xf = RotationTransform::with_min_alpha(150, 0.7);
        let mut tracker: ContinuityTracker<16> = ContinuityTracker::new(xf, 2.0);

        let report = tracker.observe(SweepSample {
            position: 0.5,
            rotation: 15.0,
            alpha: 0.2, // below the floor while on screen
        });
        assert_eq!(report.grade, SweepGrade::D);
        assert_eq!(report.alpha_violations, 1);
    }

    #[test]
    fn off_screen_alpha_must_be_zero() {
        let xf = RotationTransform::new(150);
        let mut tracker: ContinuityTracker<16> = ContinuityTracker::new(xf, 2.0);

        let report = tracker.observe(SweepSample {
            position: 1.5,
            rotation: 0.0,
            alpha: 0.3,
        });
        assert_eq!(report.alpha_violations, 1);
    }

    #[test]
    fn sweep_plan_is_inclusive_and_even() {
        let values: alloc::vec::Vec<f64> = SweepPlan::new(0.0, 1.0, 4).collect();
        assert_eq!(values, [0.0, 0.25, 0.5, 0.75, 1.0]);

        let degenerate: alloc::vec::Vec<f64> = SweepPlan::new(0.5, 2.0, 0).collect();
        assert_eq!(degenerate, [0.5]);
    }

    #[test]
    fn grade_labels() {
        assert_eq!(SweepGrade::A.as_str(), "A");
        assert_eq!(SweepGrade::D.as_str(), "D");
    }
}
