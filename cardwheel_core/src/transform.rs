// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed-form polygon-rotation transform.
//!
//! [`RotationTransform`] maps a card's extent and scroll position to the
//! pose and opacity that make a deck of cards read as the edges of a
//! regular polygon rotating under the user's finger. The mapping is pure:
//! no state survives between calls, and the host invokes it once per
//! visible or adjacent card per frame.

use kurbo::{Affine, Point, Size};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Default lower bound on card opacity.
pub const DEFAULT_MIN_ALPHA: f32 = 0.7;

/// Parameters of the rotating-polygon effect, constant once constructed.
///
/// `degrees` is the inner angle between two edges of the imagined polygon
/// that the cards lie on. An acute angle places the cards on the inside of
/// the shape, an obtuse angle on the outside. Degenerate angles (0, 360)
/// produce extreme but well-defined geometry; no clamping is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationTransform {
    /// Inner polygon angle in degrees.
    degrees: i32,
    /// Lower bound on card opacity while on screen.
    min_alpha: f32,
    /// `tan(degrees/2)/2`, derived once at construction.
    distance_to_centre_factor: f64,
}

impl RotationTransform {
    /// Creates a transform with the default minimum alpha of
    /// [`DEFAULT_MIN_ALPHA`].
    #[must_use]
    pub fn new(degrees: i32) -> Self {
        Self::with_min_alpha(degrees, DEFAULT_MIN_ALPHA)
    }

    /// Creates a transform with an explicit minimum alpha.
    ///
    /// `min_alpha` is the least faded-out that an on-screen card can be,
    /// in `[0.0, 1.0]`.
    #[must_use]
    pub fn with_min_alpha(degrees: i32, min_alpha: f32) -> Self {
        let distance_to_centre_factor = (f64::from(degrees) / 2.0).to_radians().tan() / 2.0;
        Self {
            degrees,
            min_alpha,
            distance_to_centre_factor,
        }
    }

    /// Returns the inner polygon angle in degrees.
    #[inline]
    #[must_use]
    pub const fn degrees(&self) -> i32 {
        self.degrees
    }

    /// Returns the minimum on-screen alpha.
    #[inline]
    #[must_use]
    pub const fn min_alpha(&self) -> f32 {
        self.min_alpha
    }

    /// Returns the derived pivot-distance factor, `tan(degrees/2)/2`.
    #[inline]
    #[must_use]
    pub const fn distance_to_centre_factor(&self) -> f64 {
        self.distance_to_centre_factor
    }

    /// Returns the rotation pivot for a card of the given extent.
    ///
    /// The pivot sits below the card at the imagined polygon's centre,
    /// `(w/2, h + w * distance_to_centre_factor)` in card-local pixels, so
    /// that adjacent cards appear to join at an edge.
    #[must_use]
    pub fn pivot(&self, extent: Size) -> Point {
        Point::new(
            extent.width / 2.0,
            extent.height + extent.width * self.distance_to_centre_factor,
        )
    }

    /// Computes the pose of a card at the given scroll position.
    ///
    /// `position` is 0 for the centered card and ±1 for fully adjacent
    /// cards. Within `[-1, 1]` the card is translated back to the centre
    /// and rotated by its share of the polygon's exterior angle. Outside
    /// that range the card is fully off-screen and parked at rest (the
    /// cheap early-out; [`alpha`](Self::alpha) reports it invisible).
    #[must_use]
    pub fn pose(&self, extent: Size, position: f64) -> CardPose {
        let pivot = self.pivot(extent);
        if !(-1.0..=1.0).contains(&position) {
            return CardPose {
                pivot,
                rotation: 0.0,
                translation_x: 0.0,
            };
        }
        CardPose {
            pivot,
            rotation: position * f64::from(180 - self.degrees),
            translation_x: -position * extent.width,
        }
    }

    /// Computes the opacity of a card at the given scroll position.
    ///
    /// On-screen cards fade with distance from the centre, floored at
    /// `min_alpha`; off-screen cards (`|position| > 1`) are invisible.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "fade fraction is in [0, 1]; f32 precision is plenty for opacity"
    )]
    pub fn alpha(&self, position: f64) -> f32 {
        if !(-1.0..=1.0).contains(&position) {
            return 0.0;
        }
        self.min_alpha.max((1.0 - position.abs() / 3.0) as f32)
    }

    /// Computes the full resolved transform (pose plus alpha) for a card.
    ///
    /// Total over its numeric domain: zero-width extents produce degenerate
    /// but defined output. Callers guarantee nonzero card dimensions.
    #[must_use]
    pub fn resolve(&self, extent: Size, position: f64) -> CardTransform {
        CardTransform {
            pose: self.pose(extent, position),
            alpha: self.alpha(position),
        }
    }
}

/// The geometric part of a resolved card transform.
///
/// Rotation is applied about [`pivot`](Self::pivot), then the card is
/// offset horizontally by [`translation_x`](Self::translation_x). Hosts
/// that consume matrices can use [`to_affine`](Self::to_affine); hosts
/// with pivot/rotation/offset properties (the common view-pager case)
/// apply the fields directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPose {
    /// Rotation pivot in card-local pixels.
    pub pivot: Point,
    /// Rotation angle in degrees.
    pub rotation: f64,
    /// Horizontal offset in pixels.
    pub translation_x: f64,
}

impl CardPose {
    /// The rest pose: origin pivot, no rotation, no offset.
    pub const REST: Self = Self {
        pivot: Point::ZERO,
        rotation: 0.0,
        translation_x: 0.0,
    };

    /// Returns the pose as an affine map from card-local to pager space.
    ///
    /// Equivalent to rotating about the pivot and then translating.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.translation_x, 0.0))
            * Affine::rotate_about(self.rotation.to_radians(), self.pivot)
    }
}

impl Default for CardPose {
    #[inline]
    fn default() -> Self {
        Self::REST
    }
}

/// A fully resolved card transform: pose plus opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    /// Geometric pose.
    pub pose: CardPose,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;

    const EXTENT: Size = Size::new(1000.0, 2000.0);

    #[test]
    fn pivot_is_polygon_centre() {
        let xf = RotationTransform::new(150);
        let pivot = xf.pivot(EXTENT);
        assert_eq!(pivot.x, 500.0);
        // h + w * tan(75deg) / 2
        let expected_y = 2000.0 + 1000.0 * (75.0_f64.to_radians().tan() / 2.0);
        assert!((pivot.y - expected_y).abs() < 1e-9, "got {}", pivot.y);
    }

    #[test]
    fn centered_card_is_at_rest() {
        let xf = RotationTransform::new(150);
        let t = xf.resolve(EXTENT, 0.0);
        assert_eq!(t.pose.rotation, 0.0);
        assert_eq!(t.pose.translation_x, 0.0);
        assert_eq!(t.alpha, 1.0);
    }

    #[test]
    fn adjacent_card_right() {
        let xf = RotationTransform::new(150);
        let t = xf.resolve(EXTENT, 1.0);
        assert_eq!(t.pose.rotation, 30.0);
        assert_eq!(t.pose.translation_x, -1000.0);
        // 1 - 1/3 < 0.7, so the floor wins.
        assert_eq!(t.alpha, 0.7);
    }

    #[test]
    fn adjacent_card_left_mirrors_right() {
        let xf = RotationTransform::new(150);
        let t = xf.resolve(EXTENT, -1.0);
        assert_eq!(t.pose.rotation, -30.0);
        assert_eq!(t.pose.translation_x, 1000.0);
        assert_eq!(t.alpha, 0.7);
    }

    #[test]
    fn low_floor_exposes_fade_curve() {
        let xf = RotationTransform::with_min_alpha(150, 0.2);
        let a = xf.alpha(1.0);
        assert!((f64::from(a) - 2.0 / 3.0).abs() < 1e-6, "got {a}");
    }

    #[test]
    fn halfway_swipe_worked_example() {
        let xf = RotationTransform::with_min_alpha(150, 0.7);
        let t = xf.resolve(EXTENT, 0.5);
        assert_eq!(t.pose.rotation, 15.0);
        assert_eq!(t.pose.translation_x, -500.0);
        assert!((f64::from(t.alpha) - (1.0 - 0.5 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn off_screen_cards_are_parked_and_invisible() {
        let xf = RotationTransform::with_min_alpha(60, 0.9);
        for position in [-7.5, -1.001, 1.001, 3.0] {
            let t = xf.resolve(EXTENT, position);
            assert_eq!(t.pose.rotation, 0.0, "position {position}");
            assert_eq!(t.pose.translation_x, 0.0, "position {position}");
            assert_eq!(t.alpha, 0.0, "position {position}");
            // The pivot is a function of extent alone.
            assert_eq!(t.pose.pivot, xf.pivot(EXTENT));
        }
    }

    #[test]
    fn alpha_never_drops_below_floor_on_screen() {
        let xf = RotationTransform::with_min_alpha(120, 0.85);
        let mut position = -1.0;
        while position <= 1.0 {
            assert!(xf.alpha(position) >= 0.85, "position {position}");
            position += 0.05;
        }
    }

    #[test]
    fn rotation_is_linear_in_position() {
        let xf = RotationTransform::new(90);
        // 180 - 90 = 90 degrees of rotation across a full page.
        assert_eq!(xf.pose(EXTENT, 0.25).rotation, 22.5);
        assert_eq!(xf.pose(EXTENT, -0.5).rotation, -45.0);
    }

    #[test]
    fn affine_fixes_pivot_up_to_translation() {
        let xf = RotationTransform::new(150);
        let pose = xf.pose(EXTENT, 0.5);
        let mapped = pose.to_affine() * pose.pivot;
        assert!((mapped.x - (pose.pivot.x + pose.translation_x)).abs() < 1e-9);
        assert!((mapped.y - pose.pivot.y).abs() < 1e-9);
    }

    #[test]
    fn rest_pose_is_identity() {
        let a = CardPose::REST.to_affine();
        let p = a * Point::new(12.0, 34.0);
        assert!((p.x - 12.0).abs() < 1e-12);
        assert!((p.y - 34.0).abs() < 1e-12);
        assert_eq!(CardPose::default(), CardPose::REST);
    }
}
