// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the deck: card and animation handles, swipe directions and
//! outcomes, card poses, and the events surfaced to the host application.

use kurbo::{Point, Vec2};

/// Identifier for a materialized card view.
///
/// Minted by the [deck](crate::deck::DeckController) each time it pulls an item
/// out of the [`CardSource`](crate::source::CardSource). Identifiers are never
/// reused, so a handle kept across a window rebuild simply stops matching
/// anything instead of aliasing a different card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CardId(pub(crate) u64);

impl CardId {
    /// Raw numeric value, for hosts that key their own tables by integer.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identifier for an animation the deck asked the host to run.
///
/// The host reports completion with
/// [`DeckController::animation_finished`](crate::deck::DeckController::animation_finished).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AnimationId(pub(crate) u64);

impl AnimationId {
    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Horizontal direction of a committed swipe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SwipeDirection {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

impl SwipeDirection {
    /// Direction for a signed horizontal distance; `None` for zero or NaN.
    pub fn from_dx(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    /// `-1.0` for left, `1.0` for right.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Terminal result of a single gesture.
///
/// Only the committed variants reach the deck from an interactive drag; a
/// cancelled drag snaps back without surfacing an outcome.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SwipeOutcome {
    /// The card left the deck towards the left edge.
    CommittedLeft,
    /// The card left the deck towards the right edge.
    CommittedRight,
    /// No commit; nothing structural changes.
    Cancelled,
}

impl SwipeOutcome {
    /// Committed outcome for `direction`.
    pub const fn committed(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Left => Self::CommittedLeft,
            SwipeDirection::Right => Self::CommittedRight,
        }
    }

    /// The committed direction, or `None` for [`SwipeOutcome::Cancelled`].
    pub const fn direction(self) -> Option<SwipeDirection> {
        match self {
            Self::CommittedLeft => Some(SwipeDirection::Left),
            Self::CommittedRight => Some(SwipeDirection::Right),
            Self::Cancelled => None,
        }
    }
}

/// Reference to a sub-element of a card view whose opacity follows the drag.
///
/// The deck never interprets the value; the host maps it to a child of the
/// card view when it is handed a [`CardPlacement`](crate::host::CardPlacement).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorRef(pub u32);

/// Visual state of one card, in host content coordinates.
///
/// `rotation_degrees` is applied about `pivot`, which is expressed in the
/// card's local coordinates (origin at its top-left corner).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardPose {
    /// Top-left corner of the card.
    pub position: Point,
    /// Clockwise rotation in degrees.
    pub rotation_degrees: f64,
    /// Rotation pivot in card-local coordinates.
    pub pivot: Point,
    /// Opacity of the card as a whole, in `[0, 1]`.
    pub opacity: f64,
    /// Opacity of the left indicator element, in `[0, 1]`.
    pub left_indicator: f64,
    /// Opacity of the right indicator element, in `[0, 1]`.
    pub right_indicator: f64,
}

impl CardPose {
    /// An upright, opaque card at `position` with both indicators hidden.
    pub const fn at_rest(position: Point, pivot: Point) -> Self {
        Self {
            position,
            rotation_degrees: 0.0,
            pivot,
            opacity: 1.0,
            left_indicator: 0.0,
            right_indicator: 0.0,
        }
    }

    /// Offset of this pose from `origin`.
    pub fn translation_from(&self, origin: Point) -> Vec2 {
        self.position - origin
    }
}

/// Notifications surfaced to the host application.
///
/// Returned, in firing order, from the deck operations that produce them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeckEvent {
    /// A card was committed to the left.
    CardSwipedLeft,
    /// A card was committed to the right.
    CardSwipedRight,
    /// The source became empty as a direct result of a commit.
    CardsDepleted,
    /// A drag started on the top card.
    CardActionDown,
    /// A drag ended, whether it committed or snapped back.
    CardActionUp,
}

impl DeckEvent {
    /// Swipe notification for a committed direction.
    pub const fn swiped(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Left => Self::CardSwipedLeft,
            SwipeDirection::Right => Self::CardSwipedRight,
        }
    }
}
