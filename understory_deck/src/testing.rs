// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles: a host that records every call and a source that counts removals.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::host::{Animation, CardPlacement, DeckHost};
use crate::source::{CardSource, Subscription, VecSource};
use crate::types::{AnimationId, CardId, CardPose};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HostOp {
    Attach(CardId, CardPlacement),
    Detach(CardId),
    SetPose(CardId, CardPose),
    Animate(Animation),
    Cancel(AnimationId),
    Layout,
}

#[derive(Debug)]
pub(crate) struct RecordingHost<C> {
    bounds: Rect,
    ops: Vec<HostOp>,
    attached: Vec<(CardId, C)>,
    drawn_at: Vec<(CardId, Point)>,
}

impl<C> RecordingHost<C> {
    pub(crate) fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ops: Vec::new(),
            attached: Vec::new(),
            drawn_at: Vec::new(),
        }
    }

    /// Pretend an animation left `card` drawn at `pos`.
    pub(crate) fn draw_at(&mut self, card: CardId, pos: Point) {
        self.drawn_at.retain(|(c, _)| *c != card);
        self.drawn_at.push((card, pos));
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub(crate) fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub(crate) fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Cards currently in the view tree, in attach order.
    pub(crate) fn attached(&self) -> Vec<CardId> {
        self.attached.iter().map(|(id, _)| *id).collect()
    }

    pub(crate) fn placements(&self) -> Vec<CardPlacement> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HostOp::Attach(_, placement) => Some(*placement),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn poses_for(&self, card: CardId) -> Vec<CardPose> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HostOp::SetPose(id, pose) if *id == card => Some(*pose),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_animation_for(&self, card: CardId) -> Option<Animation> {
        self.ops.iter().rev().find_map(|op| match op {
            HostOp::Animate(anim) if anim.card == card => Some(*anim),
            _ => None,
        })
    }

    pub(crate) fn cancelled(&self) -> Vec<AnimationId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HostOp::Cancel(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl<C: Clone> DeckHost<C> for RecordingHost<C> {
    fn content_bounds(&self) -> Rect {
        self.bounds
    }

    fn attach_card(&mut self, id: CardId, card: &C, placement: &CardPlacement) {
        self.attached.push((id, card.clone()));
        self.ops.push(HostOp::Attach(id, *placement));
    }

    fn detach_card(&mut self, id: CardId) {
        self.attached.retain(|(c, _)| *c != id);
        self.ops.push(HostOp::Detach(id));
    }

    fn card_position(&self, id: CardId) -> Option<Point> {
        self.drawn_at
            .iter()
            .find_map(|&(c, pos)| (c == id).then_some(pos))
    }

    fn set_pose(&mut self, id: CardId, pose: &CardPose) {
        self.ops.push(HostOp::SetPose(id, *pose));
    }

    fn animate(&mut self, animation: &Animation) {
        self.ops.push(HostOp::Animate(*animation));
    }

    fn cancel_animation(&mut self, id: AnimationId) {
        self.ops.push(HostOp::Cancel(id));
    }

    fn request_layout(&mut self) {
        self.ops.push(HostOp::Layout);
    }
}

/// [`VecSource`] wrapper that counts `remove_top` calls.
#[derive(Debug)]
pub(crate) struct CountingSource<T> {
    inner: VecSource<T>,
    removals: usize,
}

impl<T> CountingSource<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Self {
            inner: VecSource::new(items),
            removals: 0,
        }
    }

    pub(crate) fn inner(&self) -> &VecSource<T> {
        &self.inner
    }

    pub(crate) fn inner_mut(&mut self) -> &mut VecSource<T> {
        &mut self.inner
    }

    pub(crate) fn removals(&self) -> usize {
        self.removals
    }
}

impl<T: Clone> CardSource for CountingSource<T> {
    type Card = T;

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn materialize(&mut self, index: usize) -> Option<T> {
        self.inner.materialize(index)
    }

    fn remove_top(&mut self) {
        self.removals += 1;
        self.inner.remove_top();
    }

    fn subscribe(&mut self, subscription: Subscription) {
        self.inner.subscribe(subscription);
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.inner.unsubscribe(subscription);
    }
}
