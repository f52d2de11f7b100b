// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card sources: the ordered, host-owned data behind the deck.
//!
//! ## Subscriptions
//!
//! The deck mints a [`Subscription`] token whenever a source is attached and
//! hands it to [`CardSource::subscribe`]. When the source's data changes, the
//! host forwards the token together with a [`SourceEvent`] to
//! [`DeckController::on_source_event`](crate::deck::DeckController::on_source_event).
//! Tokens from a previously attached source no longer match and are dropped,
//! so a late notification can never disturb the current window.
//!
//! [`VecSource`] implements this protocol with a notification queue the host
//! drains after mutating it:
//!
//! ```
//! use understory_deck::source::{CardSource, SourceEvent, Subscription, VecSource};
//!
//! let mut source = VecSource::new(vec!["a", "b"]);
//! source.subscribe(Subscription::from_raw(7));
//! source.push("c");
//! let pending = source.drain_notifications();
//! assert_eq!(pending.len(), 1);
//! assert_eq!(pending[0].event, SourceEvent::Changed);
//! assert_eq!(source.count(), 3);
//! ```
//!
//! ## Positions
//!
//! Items are addressed by position. [`CardSource::remove_top`] retires the item
//! at the lowest live position, the one the deck showed on top, and leaves the
//! positions of the remaining items untouched. The deck's cursor therefore
//! keeps pointing at the next unseen item after every commit.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Token identifying one attachment of a source to a deck.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    /// Build a token from a raw value.
    ///
    /// Decks mint their own tokens; this exists for hosts and tests that drive
    /// a source directly.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Change notification emitted by a source.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SourceEvent {
    /// Items were added, removed, or changed; existing indices may have moved.
    Changed,
    /// The data set is no longer valid; the deck must drop everything.
    Invalidated,
}

/// A [`SourceEvent`] addressed to one subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Notification {
    /// Subscriber the event is for.
    pub subscription: Subscription,
    /// The event itself.
    pub event: SourceEvent,
}

/// Ordered, mutable collection of cards observed by the deck.
///
/// The host owns the data. The deck only reads it through [`count`](Self::count)
/// and [`materialize`](Self::materialize) and consumes it through
/// [`remove_top`](Self::remove_top).
pub trait CardSource {
    /// Card view handed to the host when an item is materialized.
    type Card;

    /// One past the last position.
    ///
    /// Positions retired through [`remove_top`](Self::remove_top) still count;
    /// the deck reports depletion once its cursor reaches this value.
    fn count(&self) -> usize;

    /// Build the card view for the item at position `index`.
    ///
    /// Returning `None` for a live index below [`count`](Self::count) is treated
    /// as an inconsistency: the deck stops filling its window at that index.
    fn materialize(&mut self, index: usize) -> Option<Self::Card>;

    /// Retire the item at the lowest live position after the deck committed a
    /// swipe on it. Later items keep their positions.
    fn remove_top(&mut self);

    /// Start delivering notifications for `subscription`.
    fn subscribe(&mut self, subscription: Subscription);

    /// Stop delivering notifications for `subscription`.
    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Shared handle: the host keeps one clone, the deck holds another.
impl<S: CardSource> CardSource for Rc<RefCell<S>> {
    type Card = S::Card;

    fn count(&self) -> usize {
        self.borrow().count()
    }

    fn materialize(&mut self, index: usize) -> Option<Self::Card> {
        self.borrow_mut().materialize(index)
    }

    fn remove_top(&mut self) {
        self.borrow_mut().remove_top();
    }

    fn subscribe(&mut self, subscription: Subscription) {
        self.borrow_mut().subscribe(subscription);
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.borrow_mut().unsubscribe(subscription);
    }
}

/// Queue-backed source whose cards are clones of its items.
///
/// `remove_top` pops the front item and bumps the position of the first live
/// item, so positions handed to the deck never shift. Mutations queue
/// [`Notification`]s for every subscriber; the host collects them with
/// [`drain_notifications`](Self::drain_notifications) and forwards them to the deck.
#[derive(Clone, Debug, Default)]
pub struct VecSource<T> {
    items: VecDeque<T>,
    // Position of `items[0]`.
    retired: usize,
    subscribers: Vec<Subscription>,
    pending: Vec<Notification>,
}

impl<T> VecSource<T> {
    /// Create a source over `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
            retired: 0,
            subscribers: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Live items in order, front first.
    pub fn items(&self) -> &VecDeque<T> {
        &self.items
    }

    /// Number of items retired through `remove_top`; the position of the front item.
    pub fn retired(&self) -> usize {
        self.retired
    }

    /// Currently registered subscribers.
    pub fn subscribers(&self) -> &[Subscription] {
        &self.subscribers
    }

    /// Append one item.
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        self.notify(SourceEvent::Changed);
    }

    /// Remove the last item.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop_back()?;
        self.notify(SourceEvent::Changed);
        Some(item)
    }

    /// Append several items with a single notification.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        let before = self.items.len();
        self.items.extend(items);
        if self.items.len() != before {
            self.notify(SourceEvent::Changed);
        }
    }

    /// Drop every item and invalidate. Positions restart at `0`.
    pub fn clear(&mut self) {
        self.items.clear();
        self.retired = 0;
        self.notify(SourceEvent::Invalidated);
    }

    /// Swap in a new data set and invalidate, returning the live items.
    /// Positions restart at `0`.
    pub fn replace(&mut self, items: Vec<T>) -> Vec<T> {
        let old = core::mem::replace(&mut self.items, items.into());
        self.retired = 0;
        self.notify(SourceEvent::Invalidated);
        old.into()
    }

    /// Take the queued notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        core::mem::take(&mut self.pending)
    }

    fn notify(&mut self, event: SourceEvent) {
        self.pending
            .extend(self.subscribers.iter().map(|&subscription| Notification {
                subscription,
                event,
            }));
    }
}

impl<T: Clone> CardSource for VecSource<T> {
    type Card = T;

    fn count(&self) -> usize {
        self.retired + self.items.len()
    }

    fn materialize(&mut self, index: usize) -> Option<T> {
        let offset = index.checked_sub(self.retired)?;
        self.items.get(offset).cloned()
    }

    fn remove_top(&mut self) {
        if self.items.pop_front().is_none() {
            return;
        }
        self.retired += 1;
        self.notify(SourceEvent::Changed);
    }

    fn subscribe(&mut self, subscription: Subscription) {
        if !self.subscribers.contains(&subscription) {
            self.subscribers.push(subscription);
        }
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|&s| s != subscription);
        self.pending.retain(|n| n.subscription != subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn notifications_only_reach_subscribers() {
        let mut s = VecSource::new(vec![1, 2]);
        s.push(3);
        assert!(s.drain_notifications().is_empty());

        let a = Subscription::from_raw(1);
        let b = Subscription::from_raw(2);
        s.subscribe(a);
        s.subscribe(b);
        s.subscribe(a);
        assert_eq!(s.subscribers(), &[a, b]);

        s.clear();
        assert_eq!(
            s.drain_notifications(),
            vec![
                Notification {
                    subscription: a,
                    event: SourceEvent::Invalidated
                },
                Notification {
                    subscription: b,
                    event: SourceEvent::Invalidated
                },
            ]
        );
    }

    #[test]
    fn unsubscribe_drops_queued_notifications() {
        let mut s = VecSource::new(vec!['x']);
        let a = Subscription::from_raw(9);
        s.subscribe(a);
        s.push('y');
        s.unsubscribe(a);
        assert!(s.drain_notifications().is_empty());
        assert!(s.subscribers().is_empty());
    }

    #[test]
    fn remove_top_retires_front_and_keeps_positions() {
        let mut s = VecSource::new(vec!["a", "b", "c"]);
        let sub = Subscription::from_raw(3);
        s.subscribe(sub);
        s.remove_top();
        assert_eq!(s.items(), &["b", "c"]);
        assert_eq!(s.retired(), 1);
        assert_eq!(s.count(), 3);
        assert_eq!(s.materialize(0), None);
        assert_eq!(s.materialize(1), Some("b"));
        assert_eq!(s.materialize(2), Some("c"));
        assert_eq!(s.materialize(5), None);
        assert_eq!(s.drain_notifications().len(), 1);

        s.remove_top();
        s.remove_top();
        assert!(s.items().is_empty());
        assert_eq!(s.count(), 3);
        s.remove_top();
        assert_eq!(s.retired(), 3);
        assert_eq!(s.drain_notifications().len(), 2);

        s.replace(vec!["x"]);
        assert_eq!(s.count(), 1);
        assert_eq!(s.materialize(0), Some("x"));

        let mut empty: VecSource<u8> = VecSource::default();
        empty.subscribe(sub);
        empty.remove_top();
        assert!(empty.drain_notifications().is_empty());
    }

    #[test]
    fn extend_notifies_once() {
        let mut s = VecSource::new(vec![0]);
        s.subscribe(Subscription::from_raw(1));
        s.extend([1, 2, 3]);
        s.extend(core::iter::empty());
        assert_eq!(s.drain_notifications().len(), 1);
        assert_eq!(s.count(), 4);
    }

    #[test]
    fn pop_shrinks_from_the_back() {
        let mut s = VecSource::new(vec![1, 2]);
        s.subscribe(Subscription::from_raw(1));
        assert_eq!(s.pop(), Some(2));
        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), None);
        assert_eq!(s.count(), 0);
        assert_eq!(s.drain_notifications().len(), 2);
    }

    #[test]
    fn shared_handle_forwards_to_inner_source() {
        let inner = Rc::new(RefCell::new(VecSource::new(vec![10, 20])));
        let mut handle = Rc::clone(&inner);
        assert_eq!(handle.count(), 2);
        assert_eq!(handle.materialize(1), Some(20));
        handle.remove_top();
        assert_eq!(inner.borrow().items(), &[20]);
        assert_eq!(handle.materialize(1), Some(20));
        handle.subscribe(Subscription::from_raw(4));
        assert_eq!(inner.borrow().subscribers().len(), 1);
    }
}
