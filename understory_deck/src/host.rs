// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities consumed by the deck.
//!
//! The deck performs no measurement, layout, or drawing. It tells the host's
//! view tree which cards exist, where they rest, and how they should move, and
//! the host reports back when an animation has run to completion.

use core::time::Duration;

use kurbo::{Point, Rect, Size};

use crate::types::{AnimationId, CardId, CardPose, IndicatorRef};

/// How a freshly materialized card enters the host view tree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardPlacement {
    /// Stacking index within the deck; `0` is the bottom card.
    pub z_index: usize,
    /// Elevation hint (for shadows) matching `z_index`.
    pub elevation: f64,
    /// Pose to show immediately; the deck animates from here to the resting pose.
    pub pose: CardPose,
    /// Size the card should be measured to.
    pub size: Size,
    /// Back the card with an off-screen layer. Purely a rendering hint.
    pub hardware_layer: bool,
    /// Sub-element driven by `pose.left_indicator`.
    pub left_indicator: Option<IndicatorRef>,
    /// Sub-element driven by `pose.right_indicator`.
    pub right_indicator: Option<IndicatorRef>,
}

/// A request to animate one card towards a target pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Animation {
    /// Identifier to report back on completion.
    pub id: AnimationId,
    /// Card to animate.
    pub card: CardId,
    /// Pose at the end of the animation.
    pub target: CardPose,
    /// Duration of the animation.
    pub duration: Duration,
}

/// View-tree and animation capability of the host toolkit.
///
/// All calls happen on the host's UI thread, from inside a deck operation.
/// Completion of an [`Animation`] must be reported later, through
/// [`DeckController::animation_finished`](crate::deck::DeckController::animation_finished),
/// never from inside [`DeckHost::animate`] itself.
pub trait DeckHost<C> {
    /// Area available to cards: the deck's bounds minus its padding.
    fn content_bounds(&self) -> Rect;

    /// Add a card view at the given stacking position.
    fn attach_card(&mut self, id: CardId, card: &C, placement: &CardPlacement);

    /// Remove a card view. Animations still running on it are dropped without
    /// completion.
    fn detach_card(&mut self, id: CardId);

    /// Where the card is drawn right now, if the host tracks it.
    ///
    /// A drag that interrupts an animation starts from this position instead
    /// of the card's resting position. The default reports nothing.
    fn card_position(&self, id: CardId) -> Option<Point> {
        let _ = id;
        None
    }

    /// Jump a card to `pose` without animating.
    fn set_pose(&mut self, id: CardId, pose: &CardPose);

    /// Start an animation.
    fn animate(&mut self, animation: &Animation);

    /// Stop an animation without reporting completion.
    fn cancel_animation(&mut self, id: AnimationId);

    /// Ask for a layout pass.
    fn request_layout(&mut self);
}
