// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry and threshold math for the deck.
//!
//! Everything here is a pure function of its inputs so that the gesture state
//! machine and the window stacking share one definition of the numbers.
//!
//! ## Drag progress
//!
//! A drag of `dx` on a host of width `w` has progress `p = clamp(dx / (w / 2), -1, 1)`.
//! Rotation, card opacity, and indicator opacity are all linear in `p`.
//!
//! ```
//! use understory_deck::geometry::{drag_progress, rotation_for};
//!
//! let p = drag_progress(50.0, 400.0);
//! assert_eq!(p, 0.25);
//! assert_eq!(rotation_for(p, 15.0), 3.75);
//! ```

use kurbo::{Point, Rect, Size, Vec2};

use crate::types::SwipeDirection;

/// Fraction of the host width a drag must exceed to commit.
pub const COMMIT_FRACTION: f64 = 0.25;

/// Distance of the rotation pivot below the card's bottom edge, in card heights.
pub const PIVOT_DEPTH: f64 = 1.0;

/// Elevation step between neighbouring cards in the stack.
pub const ELEVATION_STEP: f64 = 10.0;

/// Multiplier applied to the full-drag rotation once a card is exiting.
pub const EXIT_ROTATION_FACTOR: f64 = 2.0;

/// Signed drag progress in `[-1, 1]`.
///
/// Returns `0` for a degenerate host width (zero, negative, or non-finite) and
/// for a non-finite `dx`.
pub fn drag_progress(dx: f64, host_width: f64) -> f64 {
    if !(host_width.is_finite() && host_width > 0.0) || !dx.is_finite() {
        return 0.0;
    }
    (dx / (host_width * 0.5)).clamp(-1.0, 1.0)
}

/// Card rotation in degrees for a given progress.
pub fn rotation_for(progress: f64, degrees_at_full_drag: f64) -> f64 {
    progress * degrees_at_full_drag
}

/// Card opacity: `1` at rest, falling linearly to `opacity_end` at full drag.
pub fn card_opacity(progress: f64, opacity_end: f64) -> f64 {
    1.0 - progress.abs() * (1.0 - opacity_end)
}

/// Indicator opacities as `(left, right)`.
///
/// Only the indicator on the side of the drag becomes visible.
pub fn indicator_opacities(progress: f64) -> (f64, f64) {
    ((-progress).max(0.0), progress.max(0.0))
}

/// Direction a release at `dx` commits to, if the drag crossed the threshold.
pub fn commit_direction(dx: f64, host_width: f64) -> Option<SwipeDirection> {
    if !(host_width.is_finite() && host_width > 0.0) {
        return None;
    }
    if dx.abs() > host_width * COMMIT_FRACTION {
        SwipeDirection::from_dx(dx)
    } else {
        None
    }
}

/// Rotation pivot in card-local coordinates.
///
/// Centred horizontally and [`PIVOT_DEPTH`] card heights below the bottom edge,
/// so a rotating card sweeps along an arc instead of spinning in place.
pub fn rotation_pivot(card_size: Size) -> Point {
    Point::new(
        card_size.width * 0.5,
        card_size.height * (1.0 + PIVOT_DEPTH),
    )
}

/// Vertical offset of the card at `index` in a window of `len` cards.
///
/// Index `0` is the bottom of the stack; the top card (`len - 1`) sits at `0`
/// and every card beneath it one more `spacing` lower.
pub fn stack_offset(index: usize, len: usize, spacing: f64) -> f64 {
    let depth = len.saturating_sub(1).saturating_sub(index);
    depth as f64 * spacing
}

/// Elevation hint for the card at `index` (bottom is `0`).
pub fn stack_elevation(index: usize) -> f64 {
    index as f64 * ELEVATION_STEP
}

/// Top-left position that puts a card entirely outside `bounds`.
///
/// The vertical component of `translation` is kept so the card leaves along
/// the line it was dragged on.
pub fn exit_position(
    origin: Point,
    translation: Vec2,
    card_size: Size,
    bounds: Rect,
    direction: SwipeDirection,
) -> Point {
    let x = match direction {
        SwipeDirection::Left => bounds.x0 - card_size.width,
        SwipeDirection::Right => bounds.x1,
    };
    Point::new(x, origin.y + translation.y)
}

/// Final rotation of an exiting card.
pub fn exit_rotation(degrees_at_full_drag: f64, direction: SwipeDirection) -> f64 {
    direction.sign() * degrees_at_full_drag * EXIT_ROTATION_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_and_monotonic() {
        let w = 400.0;
        let mut last = f64::NEG_INFINITY;
        let mut dx = -600.0;
        while dx <= 600.0 {
            let p = drag_progress(dx, w);
            assert!((-1.0..=1.0).contains(&p), "p={p} out of range");
            assert!(p >= last, "progress decreased at dx={dx}");
            last = p;
            dx += 7.5;
        }
        assert_eq!(drag_progress(200.0, w), 1.0);
        assert_eq!(drag_progress(-1000.0, w), -1.0);
        assert_eq!(drag_progress(0.0, w), 0.0);
    }

    #[test]
    fn degenerate_width_yields_no_progress() {
        assert_eq!(drag_progress(10.0, 0.0), 0.0);
        assert_eq!(drag_progress(10.0, -5.0), 0.0);
        assert_eq!(drag_progress(10.0, f64::NAN), 0.0);
        assert_eq!(drag_progress(f64::INFINITY, 100.0), 0.0);
        assert_eq!(commit_direction(500.0, 0.0), None);
    }

    #[test]
    fn rotation_and_opacity_at_rest() {
        assert_eq!(rotation_for(0.0, 15.0), 0.0);
        assert_eq!(card_opacity(0.0, 0.33), 1.0);
        assert_eq!(indicator_opacities(0.0), (0.0, 0.0));
    }

    #[test]
    fn full_drag_reaches_configured_extremes() {
        assert_eq!(rotation_for(1.0, 15.0), 15.0);
        assert_eq!(rotation_for(-1.0, 15.0), -15.0);
        assert!((card_opacity(1.0, 0.33) - 0.33).abs() < 1e-12);
        assert!((card_opacity(-1.0, 0.33) - 0.33).abs() < 1e-12);
        assert_eq!(indicator_opacities(1.0), (0.0, 1.0));
        assert_eq!(indicator_opacities(-1.0), (1.0, 0.0));
    }

    #[test]
    fn indicators_follow_drag_side() {
        let (left, right) = indicator_opacities(0.4);
        assert_eq!(left, 0.0);
        assert!((right - 0.4).abs() < 1e-12);
        let (left, right) = indicator_opacities(-0.7);
        assert!((left - 0.7).abs() < 1e-12);
        assert_eq!(right, 0.0);
    }

    #[test]
    fn commit_threshold_is_a_quarter_of_width() {
        let w = 400.0;
        assert_eq!(commit_direction(100.0, w), None);
        assert_eq!(commit_direction(-100.0, w), None);
        assert_eq!(commit_direction(40.0, w), None);
        assert_eq!(commit_direction(100.5, w), Some(SwipeDirection::Right));
        assert_eq!(commit_direction(-150.0, w), Some(SwipeDirection::Left));
    }

    #[test]
    fn pivot_sits_below_bottom_edge() {
        let size = Size::new(300.0, 400.0);
        let pivot = rotation_pivot(size);
        assert_eq!(pivot.x, 150.0);
        assert!(pivot.y > size.height);
    }

    #[test]
    fn stack_offsets_grow_towards_the_bottom() {
        let offsets: alloc::vec::Vec<f64> = (0..3).map(|i| stack_offset(i, 3, 15.0)).collect();
        assert_eq!(offsets, alloc::vec![30.0, 15.0, 0.0]);
        assert_eq!(stack_offset(0, 1, 15.0), 0.0);
        assert_eq!(stack_offset(0, 0, 15.0), 0.0);
        assert!(stack_elevation(2) > stack_elevation(1));
    }

    #[test]
    fn exit_position_clears_bounds() {
        let bounds = Rect::new(10.0, 20.0, 410.0, 620.0);
        let size = bounds.size();
        let origin = bounds.origin();
        let right = exit_position(
            origin,
            Vec2::new(150.0, 12.0),
            size,
            bounds,
            SwipeDirection::Right,
        );
        assert!(right.x >= bounds.x1);
        assert_eq!(right.y, origin.y + 12.0);
        let left = exit_position(
            origin,
            Vec2::new(-150.0, -3.0),
            size,
            bounds,
            SwipeDirection::Left,
        );
        assert!(left.x + size.width <= bounds.x0);
        assert_eq!(exit_rotation(15.0, SwipeDirection::Left), -30.0);
    }
}
