// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe gesture interpreter for the top card.
//!
//! ## State machine
//!
//! ```text
//! Idle --down--> Dragging --up, |dx| <= threshold--> Idle (snap back)
//!                         --up, |dx| >  threshold--> Exiting --exit done--> Finished
//! ```
//!
//! The interpreter is pure: it turns pointer positions into [`CardPose`]s and
//! [`Release`] decisions and leaves it to the [deck](crate::deck) to push poses
//! and animations to the host. Committing depends on distance only; there is no
//! velocity tracking.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_deck::config::SwipeConfig;
//! use understory_deck::gesture::{GesturePhase, Release, SwipeInterpreter};
//!
//! let config = SwipeConfig::default();
//! let bounds = Rect::new(0.0, 0.0, 400.0, 600.0);
//! let mut drag = SwipeInterpreter::new(bounds.origin(), bounds.size(), bounds);
//!
//! assert!(drag.pointer_down(Point::new(200.0, 300.0)));
//! drag.pointer_move(&config, Point::new(260.0, 310.0));
//! assert!((drag.progress() - 0.3).abs() < 1e-9);
//!
//! let release = drag.pointer_up(&config, Point::new(240.0, 300.0));
//! assert!(matches!(release, Some(Release::SnapBack { .. })));
//! assert_eq!(drag.phase(), GesturePhase::Idle);
//! ```

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::SwipeConfig;
use crate::geometry;
use crate::types::{CardPose, SwipeDirection, SwipeOutcome};

/// Phase of the interpreter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GesturePhase {
    /// No pointer is down on the card.
    Idle,
    /// The card follows the pointer.
    Dragging,
    /// The card is animating off screen; input is ignored.
    Exiting(SwipeDirection),
    /// The exit completed and the outcome was handed out.
    Finished,
}

/// Transient state of one drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureState {
    /// Card position when the drag started.
    pub origin: Point,
    /// Pointer position when the drag started.
    pub touch_start: Point,
    /// Pointer travel since `touch_start`.
    pub translation: Vec2,
}

/// What the deck should animate once the pointer is released.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Release {
    /// Below the threshold: animate back to the origin.
    SnapBack {
        /// Resting pose to return to.
        target: CardPose,
    },
    /// Past the threshold: animate off screen, then report the outcome.
    Exit {
        /// Committed direction.
        direction: SwipeDirection,
        /// Off-screen pose to animate to.
        target: CardPose,
    },
}

/// Drag interpreter bound to a single card for its tenure as top card.
#[derive(Clone, Debug, PartialEq)]
pub struct SwipeInterpreter {
    rest: Point,
    card_size: Size,
    bounds: Rect,
    phase: GesturePhase,
    drag: Option<GestureState>,
}

impl SwipeInterpreter {
    /// Create an idle interpreter for a card resting at `rest` inside `bounds`.
    pub fn new(rest: Point, card_size: Size, bounds: Rect) -> Self {
        Self {
            rest,
            card_size,
            bounds,
            phase: GesturePhase::Idle,
            drag: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// State of the drag in progress, if any.
    pub fn gesture(&self) -> Option<&GestureState> {
        self.drag.as_ref()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    /// Pose of the card when nothing is touching it.
    pub fn rest_pose(&self) -> CardPose {
        CardPose::at_rest(self.rest, geometry::rotation_pivot(self.card_size))
    }

    /// Signed drag progress of the current gesture, `0` when not dragging.
    pub fn progress(&self) -> f64 {
        self.drag.map_or(0.0, |d| {
            geometry::drag_progress(d.translation.x, self.bounds.width())
        })
    }

    /// Move the resting position, e.g. after the host bounds changed.
    ///
    /// Ignored unless idle.
    pub fn relocate(&mut self, rest: Point, card_size: Size, bounds: Rect) {
        if self.phase == GesturePhase::Idle {
            self.rest = rest;
            self.card_size = card_size;
            self.bounds = bounds;
        }
    }

    /// Start a drag on a card at rest. Returns `false` if the interpreter is not idle.
    pub fn pointer_down(&mut self, pos: Point) -> bool {
        self.pointer_down_from(pos, self.rest)
    }

    /// Start a drag on a card currently drawn at `origin`, e.g. part way through
    /// a snap-back. Returns `false` if the interpreter is not idle.
    pub fn pointer_down_from(&mut self, pos: Point, origin: Point) -> bool {
        if self.phase != GesturePhase::Idle {
            return false;
        }
        self.phase = GesturePhase::Dragging;
        self.drag = Some(GestureState {
            origin,
            touch_start: pos,
            translation: Vec2::ZERO,
        });
        true
    }

    /// Follow the pointer. Returns the pose to show, or `None` when not dragging.
    pub fn pointer_move(&mut self, config: &SwipeConfig, pos: Point) -> Option<CardPose> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        let drag = self.drag.as_mut()?;
        drag.translation = pos - drag.touch_start;
        let drag = *drag;
        Some(self.drag_pose(config, &drag))
    }

    /// Finish the drag at `pos` and decide between snapping back and exiting.
    pub fn pointer_up(&mut self, config: &SwipeConfig, pos: Point) -> Option<Release> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        let mut drag = self.drag.take()?;
        drag.translation = pos - drag.touch_start;
        match geometry::commit_direction(drag.translation.x, self.bounds.width()) {
            Some(direction) => {
                self.phase = GesturePhase::Exiting(direction);
                Some(Release::Exit {
                    direction,
                    target: self.exit_pose(config, &drag, direction),
                })
            }
            None => {
                self.phase = GesturePhase::Idle;
                Some(Release::SnapBack {
                    target: self.rest_pose(),
                })
            }
        }
    }

    /// Abort the drag (the toolkit cancelled the pointer stream).
    pub fn pointer_cancel(&mut self) -> Option<Release> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        self.drag = None;
        self.phase = GesturePhase::Idle;
        Some(Release::SnapBack {
            target: self.rest_pose(),
        })
    }

    /// The exit animation completed; hand out the committed outcome once.
    pub fn finish_exit(&mut self) -> Option<SwipeOutcome> {
        match self.phase {
            GesturePhase::Exiting(direction) => {
                self.phase = GesturePhase::Finished;
                Some(SwipeOutcome::committed(direction))
            }
            _ => None,
        }
    }

    /// Drop any in-flight state without producing an outcome.
    pub fn reset(&mut self) {
        self.drag = None;
        self.phase = GesturePhase::Idle;
    }

    fn drag_pose(&self, config: &SwipeConfig, drag: &GestureState) -> CardPose {
        let p = geometry::drag_progress(drag.translation.x, self.bounds.width());
        let (left_indicator, right_indicator) = geometry::indicator_opacities(p);
        CardPose {
            position: drag.origin + drag.translation,
            rotation_degrees: geometry::rotation_for(p, config.rotation_degrees()),
            pivot: geometry::rotation_pivot(self.card_size),
            opacity: geometry::card_opacity(p, config.opacity_end()),
            left_indicator,
            right_indicator,
        }
    }

    fn exit_pose(
        &self,
        config: &SwipeConfig,
        drag: &GestureState,
        direction: SwipeDirection,
    ) -> CardPose {
        let (left_indicator, right_indicator) = geometry::indicator_opacities(direction.sign());
        CardPose {
            position: geometry::exit_position(
                drag.origin,
                drag.translation,
                self.card_size,
                self.bounds,
                direction,
            ),
            rotation_degrees: geometry::exit_rotation(config.rotation_degrees(), direction),
            pivot: geometry::rotation_pivot(self.card_size),
            opacity: config.opacity_end(),
            left_indicator,
            right_indicator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> SwipeInterpreter {
        let bounds = Rect::new(0.0, 0.0, 400.0, 600.0);
        SwipeInterpreter::new(Point::new(0.0, 0.0), bounds.size(), bounds)
    }

    #[test]
    fn down_records_origin_and_start() {
        let mut g = interpreter();
        assert!(g.pointer_down(Point::new(120.0, 80.0)));
        assert_eq!(g.phase(), GesturePhase::Dragging);
        let state = g.gesture().copied().unwrap();
        assert_eq!(state.origin, Point::ZERO);
        assert_eq!(state.touch_start, Point::new(120.0, 80.0));
        assert_eq!(state.translation, Vec2::ZERO);
        // A second down while dragging is rejected.
        assert!(!g.pointer_down(Point::new(0.0, 0.0)));
    }

    #[test]
    fn drag_from_moved_card_follows_from_there() {
        let config = SwipeConfig::default();
        let mut g = interpreter();
        assert!(g.pointer_down_from(Point::new(200.0, 300.0), Point::new(35.0, 4.0)));
        let pose = g.pointer_move(&config, Point::new(210.0, 300.0)).unwrap();
        assert_eq!(pose.position, Point::new(45.0, 4.0));
        // Snap-back still targets the resting position.
        let release = g.pointer_up(&config, Point::new(210.0, 300.0)).unwrap();
        assert_eq!(release, Release::SnapBack { target: g.rest_pose() });
    }

    #[test]
    fn move_translates_rotates_and_fades() {
        let config = SwipeConfig::default();
        let mut g = interpreter();
        g.pointer_down(Point::new(200.0, 300.0));
        let pose = g.pointer_move(&config, Point::new(300.0, 320.0)).unwrap();
        assert_eq!(pose.position, Point::new(100.0, 20.0));
        assert!((pose.rotation_degrees - 7.5).abs() < 1e-9);
        assert!(pose.pivot.y > 600.0);
        assert!(pose.opacity < 1.0 && pose.opacity > config.opacity_end());
        assert_eq!(pose.left_indicator, 0.0);
        assert!((pose.right_indicator - 0.5).abs() < 1e-9);

        let pose = g.pointer_move(&config, Point::new(200.0, 300.0)).unwrap();
        assert_eq!(pose.rotation_degrees, 0.0);
        assert_eq!(pose.opacity, 1.0);
        assert_eq!((pose.left_indicator, pose.right_indicator), (0.0, 0.0));
    }

    #[test]
    fn move_without_down_is_ignored() {
        let config = SwipeConfig::default();
        let mut g = interpreter();
        assert!(g.pointer_move(&config, Point::new(10.0, 10.0)).is_none());
        assert!(g.pointer_up(&config, Point::new(10.0, 10.0)).is_none());
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn short_release_snaps_back_to_origin() {
        let config = SwipeConfig::default();
        let mut g = interpreter();
        g.pointer_down(Point::new(200.0, 300.0));
        g.pointer_move(&config, Point::new(240.0, 330.0));
        let release = g.pointer_up(&config, Point::new(240.0, 330.0)).unwrap();
        match release {
            Release::SnapBack { target } => {
                assert_eq!(target.position, Point::ZERO);
                assert_eq!(target, g.rest_pose());
            }
            other => panic!("expected snap back, got {other:?}"),
        }
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert!(g.gesture().is_none());
        assert_eq!(g.finish_exit(), None);
    }

    #[test]
    fn long_release_exits_and_commits_once() {
        let config = SwipeConfig::default();
        let mut g = interpreter();
        g.pointer_down(Point::new(200.0, 300.0));
        let release = g.pointer_up(&config, Point::new(50.0, 310.0)).unwrap();
        let Release::Exit { direction, target } = release else {
            panic!("expected exit, got {release:?}");
        };
        assert_eq!(direction, SwipeDirection::Left);
        assert!(target.position.x + 400.0 <= 0.0);
        assert_eq!(target.position.y, 10.0);
        assert_eq!(target.rotation_degrees, -30.0);
        assert_eq!(target.left_indicator, 1.0);
        assert_eq!(g.phase(), GesturePhase::Exiting(SwipeDirection::Left));

        // Input is ignored while exiting.
        assert!(!g.pointer_down(Point::new(0.0, 0.0)));
        assert!(g.pointer_move(&config, Point::new(0.0, 0.0)).is_none());

        assert_eq!(g.finish_exit(), Some(SwipeOutcome::CommittedLeft));
        assert_eq!(g.phase(), GesturePhase::Finished);
        assert_eq!(g.finish_exit(), None);
    }

    #[test]
    fn cancel_and_reset_discard_the_drag() {
        let config = SwipeConfig::default();
        let mut g = interpreter();
        g.pointer_down(Point::new(0.0, 0.0));
        g.pointer_move(&config, Point::new(300.0, 0.0));
        assert!(matches!(g.pointer_cancel(), Some(Release::SnapBack { .. })));
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert_eq!(g.pointer_cancel(), None);

        g.pointer_down(Point::new(0.0, 0.0));
        g.pointer_up(&config, Point::new(300.0, 0.0));
        g.reset();
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert_eq!(g.finish_exit(), None);
    }

    #[test]
    fn relocate_only_when_idle() {
        let mut g = interpreter();
        let wide = Rect::new(0.0, 0.0, 800.0, 600.0);
        g.relocate(Point::new(5.0, 5.0), wide.size(), wide);
        assert_eq!(g.rest_pose().position, Point::new(5.0, 5.0));

        g.pointer_down(Point::ZERO);
        g.relocate(Point::ZERO, wide.size(), wide);
        assert_eq!(g.rest_pose().position, Point::new(5.0, 5.0));
    }
}
