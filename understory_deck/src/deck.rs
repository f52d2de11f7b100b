// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deck controller: the bounded card window and its lifecycle.
//!
//! ## Overview
//!
//! [`DeckController`] pulls at most `max_visible` items out of a
//! [`CardSource`], starting at its cursor, and keeps them as the window:
//! index `0` is the bottom of the stack and the last entry is the top card, the
//! only one with a [`SwipeInterpreter`] attached. The top card is the item at
//! the cursor, so it is always the item [`CardSource::remove_top`] retires when
//! the card is swiped away.
//!
//! The window is always rebuilt wholesale. After a rebuild it holds
//! `min(max_visible, count - cursor)` cards unless the source refused to
//! materialize one of them.
//!
//! ## Driving the deck
//!
//! Every operation receives the host as a [`DeckHost`] and returns the
//! [`DeckEvent`]s it produced, in firing order.
//!
//! - Pointer input for a card goes to [`pointer_down`](DeckController::pointer_down),
//!   [`pointer_move`](DeckController::pointer_move) and
//!   [`pointer_up`](DeckController::pointer_up). Input for any card other than the top
//!   one is ignored.
//! - Animation completion goes to [`animation_finished`](DeckController::animation_finished).
//!   A committed swipe is applied only from the completion of its exit animation.
//! - Source notifications go to [`on_source_event`](DeckController::on_source_event).
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_deck::config::SwipeConfig;
//! use understory_deck::deck::DeckController;
//! use understory_deck::host::{Animation, CardPlacement, DeckHost};
//! use understory_deck::source::VecSource;
//! use understory_deck::types::{AnimationId, CardId, CardPose, DeckEvent};
//!
//! #[derive(Default)]
//! struct Host { animations: Vec<Animation> }
//!
//! impl DeckHost<&'static str> for Host {
//!     fn content_bounds(&self) -> Rect { Rect::new(0.0, 0.0, 400.0, 600.0) }
//!     fn attach_card(&mut self, _: CardId, _: &&'static str, _: &CardPlacement) {}
//!     fn detach_card(&mut self, _: CardId) {}
//!     fn set_pose(&mut self, _: CardId, _: &CardPose) {}
//!     fn animate(&mut self, animation: &Animation) { self.animations.push(*animation); }
//!     fn cancel_animation(&mut self, _: AnimationId) {}
//!     fn request_layout(&mut self) {}
//! }
//!
//! let mut host = Host::default();
//! let mut deck = DeckController::new(SwipeConfig::default());
//! deck.attach(&mut host, VecSource::new(vec!["a", "b"]));
//!
//! let top = deck.top_card().unwrap();
//! deck.pointer_down(&mut host, top, Point::new(200.0, 300.0));
//! deck.pointer_up(&mut host, top, Point::new(350.0, 300.0));
//!
//! let exit = host.animations.last().unwrap().id;
//! let events = deck.animation_finished(&mut host, exit);
//! assert_eq!(events, [DeckEvent::CardActionUp, DeckEvent::CardSwipedRight]);
//! assert_eq!(deck.cursor(), 1);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::config::SwipeConfig;
use crate::gesture::{GesturePhase, Release, SwipeInterpreter};
use crate::geometry;
use crate::host::{Animation, CardPlacement, DeckHost};
use crate::source::{CardSource, SourceEvent, Subscription};
use crate::types::{AnimationId, CardId, CardPose, DeckEvent, SwipeDirection, SwipeOutcome};

/// One materialized card in the window.
#[derive(Clone, Debug)]
pub struct WindowEntry<C> {
    id: CardId,
    index: usize,
    card: C,
    rest: Point,
}

impl<C> WindowEntry<C> {
    /// Identifier the host knows this card by.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Index the card was materialized from.
    pub fn source_index(&self) -> usize {
        self.index
    }

    /// The card view.
    pub fn card(&self) -> &C {
        &self.card
    }

    /// Resting top-left position once the stack animation settles.
    pub fn rest_position(&self) -> Point {
        self.rest
    }
}

/// The interpreter attached to the current top card.
#[derive(Clone, Debug)]
struct ActiveCard {
    card: CardId,
    interpreter: SwipeInterpreter,
    // Snap-back or exit animation still running on the card.
    animation: Option<AnimationId>,
}

fn active_for(active: &mut Option<ActiveCard>, card: CardId) -> Option<&mut ActiveCard> {
    active.as_mut().filter(|a| a.card == card)
}

fn mint_animation(counter: &mut u64) -> AnimationId {
    *counter += 1;
    AnimationId(*counter)
}

/// Swipeable deck over a [`CardSource`].
///
/// ## Usage
///
/// - Construct with [`DeckController::new`] from a resolved [`SwipeConfig`].
/// - [`attach`](Self::attach) a source; the window is filled immediately.
/// - Feed pointer input, animation completions, and source notifications as
///   they arrive, and dispatch the returned [`DeckEvent`]s.
///
/// All state lives on the host's UI thread; nothing here blocks or spawns.
pub struct DeckController<S: CardSource> {
    config: SwipeConfig,
    source: Option<S>,
    subscription: Option<Subscription>,
    window: Vec<WindowEntry<S::Card>>,
    cursor: usize,
    active: Option<ActiveCard>,
    // Slide-into-place animations started by the last rebuild.
    stack_animations: Vec<(CardId, AnimationId)>,
    // Bounds the window was last stacked against.
    stacked_in: Option<Rect>,
    // A source change arrived mid-gesture and still has to be applied.
    refill_pending: bool,
    next_card: u64,
    next_animation: u64,
    next_subscription: u64,
}

impl<S: CardSource> core::fmt::Debug for DeckController<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeckController")
            .field("config", &self.config)
            .field("attached", &self.source.is_some())
            .field("subscription", &self.subscription)
            .field("window", &self.window.len())
            .field("cursor", &self.cursor)
            .field("gesture", &self.gesture_phase())
            .finish_non_exhaustive()
    }
}

impl<S: CardSource> DeckController<S> {
    /// Create an empty deck with no source attached.
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            source: None,
            subscription: None,
            window: Vec::new(),
            cursor: 0,
            active: None,
            stack_animations: Vec::new(),
            stacked_in: None,
            refill_pending: false,
            next_card: 0,
            next_animation: 0,
            next_subscription: 0,
        }
    }

    /// The configuration the deck was built with.
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Offset of the first item not yet consumed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Materialized cards, bottom first.
    pub fn window(&self) -> &[WindowEntry<S::Card>] {
        &self.window
    }

    /// The interactive card, if any.
    pub fn top_card(&self) -> Option<CardId> {
        self.window.last().map(WindowEntry::id)
    }

    /// The attached source.
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mutable access to the attached source.
    ///
    /// Mutations are only picked up through the source's notifications.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Subscription token of the attached source.
    pub fn subscription(&self) -> Option<Subscription> {
        self.subscription
    }

    /// Interpreter attached to `card`, if it is the top card.
    pub fn interpreter_for(&self, card: CardId) -> Option<&SwipeInterpreter> {
        self.active
            .as_ref()
            .filter(|a| a.card == card)
            .map(|a| &a.interpreter)
    }

    /// Phase of the top card's gesture.
    pub fn gesture_phase(&self) -> Option<GesturePhase> {
        self.active.as_ref().map(|a| a.interpreter.phase())
    }

    /// Whether any animation requested by the deck is still outstanding.
    pub fn is_animating(&self) -> bool {
        !self.stack_animations.is_empty()
            || self.active.as_ref().is_some_and(|a| a.animation.is_some())
    }

    /// Attach `source`, replacing (and returning) the previous one.
    ///
    /// The cursor restarts at `0` and the window is rebuilt. A gesture in
    /// flight is discarded without an outcome.
    pub fn attach<H>(&mut self, host: &mut H, mut source: S) -> Option<S>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let previous = self.release_source();
        self.next_subscription += 1;
        let subscription = Subscription::from_raw(self.next_subscription);
        source.subscribe(subscription);
        self.source = Some(source);
        self.subscription = Some(subscription);
        self.cursor = 0;
        tracing::debug!(?subscription, "source attached");
        self.rebuild_window(host);
        previous
    }

    /// Detach the current source, leaving an empty deck.
    pub fn detach<H>(&mut self, host: &mut H) -> Option<S>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        self.clear_window(host);
        self.cursor = 0;
        host.request_layout();
        self.release_source()
    }

    /// Route a source notification. Notifications for stale subscriptions are dropped.
    pub fn on_source_event<H>(
        &mut self,
        host: &mut H,
        subscription: Subscription,
        event: SourceEvent,
    ) where
        H: DeckHost<S::Card> + ?Sized,
    {
        if self.subscription != Some(subscription) {
            tracing::debug!(?subscription, ?event, "stale source notification ignored");
            return;
        }
        match event {
            SourceEvent::Changed => self.on_source_changed(host),
            SourceEvent::Invalidated => self.on_source_invalidated(host),
        }
    }

    /// The source changed: rebuild if the window no longer holds
    /// `min(max_visible, count - cursor)` cards.
    ///
    /// A full window over a source that only grew is left alone. While a
    /// gesture is running the rebuild is postponed until it resolves.
    pub fn on_source_changed<H>(&mut self, host: &mut H)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let shown = self.window.len();
        let expected = self.available().min(self.config.max_visible());
        if shown == expected {
            tracing::trace!(shown, "source change leaves window untouched");
            return;
        }
        if self.gesture_in_flight() {
            self.refill_pending = true;
            return;
        }
        self.rebuild_window(host);
    }

    /// The source was invalidated: drop every card and restart at the beginning.
    pub fn on_source_invalidated<H>(&mut self, host: &mut H)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        self.clear_window(host);
        self.cursor = 0;
        host.request_layout();
        tracing::debug!("source invalidated, window cleared");
    }

    /// Rebuild the window from the cursor.
    ///
    /// Detaches every current card, materializes up to `max_visible` fresh
    /// ones, stacks them with the item at the cursor on top, and attaches an
    /// interpreter to the top card. Never reports depletion on its own.
    pub fn rebuild_window<H>(&mut self, host: &mut H)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        self.clear_window(host);
        self.refill_pending = false;
        let bounds = host.content_bounds();
        self.stacked_in = Some(bounds);

        if let Some(source) = self.source.as_mut() {
            let wanted = source
                .count()
                .saturating_sub(self.cursor)
                .min(self.config.max_visible());
            for offset in 0..wanted {
                let index = self.cursor + offset;
                let Some(card) = source.materialize(index) else {
                    tracing::warn!(index, "source could not materialize card, window truncated");
                    break;
                };
                self.next_card += 1;
                self.window.push(WindowEntry {
                    id: CardId(self.next_card),
                    index,
                    card,
                    rest: bounds.origin(),
                });
            }
        }
        // Materialized front first; the window is stored bottom first.
        self.window.reverse();

        let len = self.window.len();
        let size = bounds.size();
        let pivot = geometry::rotation_pivot(size);
        for (z, entry) in self.window.iter_mut().enumerate() {
            entry.rest = Point::new(
                bounds.x0,
                bounds.y0 + geometry::stack_offset(z, len, self.config.card_spacing()),
            );
            let placement = CardPlacement {
                z_index: z,
                elevation: geometry::stack_elevation(z),
                // New cards start level with the top of the deck and slide into place.
                pose: CardPose::at_rest(bounds.origin(), pivot),
                size,
                hardware_layer: self.config.hardware_layers(),
                left_indicator: self.config.left_indicator(),
                right_indicator: self.config.right_indicator(),
            };
            host.attach_card(entry.id, &entry.card, &placement);

            let id = mint_animation(&mut self.next_animation);
            host.animate(&Animation {
                id,
                card: entry.id,
                target: CardPose::at_rest(entry.rest, pivot),
                duration: self.config.animation_duration(),
            });
            self.stack_animations.push((entry.id, id));
        }

        self.active = self.window.last().map(|top| ActiveCard {
            card: top.id,
            interpreter: SwipeInterpreter::new(top.rest, size, bounds),
            animation: None,
        });
        host.request_layout();
        tracing::debug!(cursor = self.cursor, window = len, "deck window rebuilt");
    }

    /// A host layout pass ran.
    ///
    /// Fills an empty window when items are available, and re-stacks the
    /// current cards if the content bounds moved since they were placed.
    pub fn on_layout<H>(&mut self, host: &mut H)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        if self.window.is_empty() {
            if self.available() > 0 {
                self.rebuild_window(host);
            }
            return;
        }
        let bounds = host.content_bounds();
        if self.stacked_in == Some(bounds) {
            return;
        }
        self.stacked_in = Some(bounds);
        for (_, id) in self.stack_animations.drain(..) {
            host.cancel_animation(id);
        }

        let len = self.window.len();
        let size = bounds.size();
        let pivot = geometry::rotation_pivot(size);
        let busy = self
            .active
            .as_ref()
            .filter(|a| a.interpreter.phase() != GesturePhase::Idle)
            .map(|a| a.card);
        for (z, entry) in self.window.iter_mut().enumerate() {
            entry.rest = Point::new(
                bounds.x0,
                bounds.y0 + geometry::stack_offset(z, len, self.config.card_spacing()),
            );
            if busy != Some(entry.id) {
                host.set_pose(entry.id, &CardPose::at_rest(entry.rest, pivot));
            }
        }
        if let (Some(active), Some(top)) = (self.active.as_mut(), self.window.last()) {
            active.interpreter.relocate(top.rest, size, bounds);
        }
        tracing::debug!(?bounds, "deck re-stacked for new bounds");
    }

    /// Pointer pressed on `card`.
    ///
    /// The drag starts from where the host currently draws the card, so a card
    /// grabbed mid animation does not jump. Animations still running on the
    /// card are cancelled.
    pub fn pointer_down<H>(&mut self, host: &mut H, card: CardId, pos: Point) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let Some(active) = active_for(&mut self.active, card) else {
            tracing::trace!(?card, "pointer down on a card that is not on top");
            return Vec::new();
        };
        let origin = host
            .card_position(card)
            .unwrap_or(active.interpreter.rest_pose().position);
        if !active.interpreter.pointer_down_from(pos, origin) {
            return Vec::new();
        }
        if let Some(id) = active.animation.take() {
            host.cancel_animation(id);
        }
        if let Some(i) = self.stack_animations.iter().position(|&(c, _)| c == card) {
            let (_, id) = self.stack_animations.swap_remove(i);
            host.cancel_animation(id);
        }
        vec![DeckEvent::CardActionDown]
    }

    /// Pointer moved while pressed on `card`.
    pub fn pointer_move<H>(&mut self, host: &mut H, card: CardId, pos: Point)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let Some(active) = active_for(&mut self.active, card) else {
            return;
        };
        if let Some(pose) = active.interpreter.pointer_move(&self.config, pos) {
            host.set_pose(card, &pose);
        }
    }

    /// Pointer released over `card`.
    ///
    /// Below the commit threshold the card snaps back and
    /// [`DeckEvent::CardActionUp`] is returned right away. Past it the card
    /// starts exiting and the events follow from
    /// [`animation_finished`](Self::animation_finished).
    pub fn pointer_up<H>(&mut self, host: &mut H, card: CardId, pos: Point) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let Some(active) = active_for(&mut self.active, card) else {
            return Vec::new();
        };
        let Some(release) = active.interpreter.pointer_up(&self.config, pos) else {
            return Vec::new();
        };
        self.run_release(host, card, release)
    }

    /// The toolkit cancelled the pointer stream on `card`; snap it back.
    pub fn pointer_cancel<H>(&mut self, host: &mut H, card: CardId) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let Some(active) = active_for(&mut self.active, card) else {
            return Vec::new();
        };
        let Some(release) = active.interpreter.pointer_cancel() else {
            return Vec::new();
        };
        self.run_release(host, card, release)
    }

    /// The host finished running animation `id`.
    pub fn animation_finished<H>(&mut self, host: &mut H, id: AnimationId) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        if let Some(pos) = self.stack_animations.iter().position(|&(_, a)| a == id) {
            self.stack_animations.swap_remove(pos);
            return Vec::new();
        }
        let Some(active) = self
            .active
            .as_mut()
            .filter(|a| a.animation == Some(id))
        else {
            tracing::debug!(?id, "completion for an unknown animation ignored");
            return Vec::new();
        };
        active.animation = None;
        match active.interpreter.finish_exit() {
            Some(outcome) => {
                let mut events = vec![DeckEvent::CardActionUp];
                events.extend(self.apply_outcome(host, outcome));
                events
            }
            None => Vec::new(),
        }
    }

    /// Swipe the top card to the left without a gesture.
    pub fn swipe_top_left<H>(&mut self, host: &mut H) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        self.swipe_top(host, SwipeDirection::Left)
    }

    /// Swipe the top card to the right without a gesture.
    pub fn swipe_top_right<H>(&mut self, host: &mut H) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        self.swipe_top(host, SwipeDirection::Right)
    }

    /// Commit the top card in `direction` immediately.
    ///
    /// A gesture already running on the card is closed with
    /// [`DeckEvent::CardActionUp`] before the swipe is reported.
    pub fn swipe_top<H>(&mut self, host: &mut H, direction: SwipeDirection) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let mut events = Vec::new();
        if self.top_card().is_some() && self.gesture_in_flight() {
            events.push(DeckEvent::CardActionUp);
        }
        events.extend(self.apply_outcome(host, SwipeOutcome::committed(direction)));
        events
    }

    /// Apply a gesture outcome to the window.
    ///
    /// `Cancelled` changes nothing. A commit reports the swipe, removes the top
    /// item from the source, drops the top card, advances the cursor, and
    /// rebuilds; [`DeckEvent::CardsDepleted`] follows when no item is left
    /// past the cursor.
    pub fn apply_outcome<H>(&mut self, host: &mut H, outcome: SwipeOutcome) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let Some(direction) = outcome.direction() else {
            return Vec::new();
        };
        if self.window.is_empty() {
            tracing::debug!(?outcome, "commit without a top card ignored");
            return Vec::new();
        }
        let Some(source) = self.source.as_mut() else {
            tracing::debug!(?outcome, "commit without a source ignored");
            return Vec::new();
        };

        let mut events = vec![DeckEvent::swiped(direction)];
        source.remove_top();

        self.teardown_gesture(host);
        if let Some(top) = self.window.pop() {
            host.detach_card(top.id);
        }
        self.cursor += 1;
        let remaining = self.available();
        tracing::debug!(?direction, cursor = self.cursor, remaining, "card committed");
        self.rebuild_window(host);

        if remaining == 0 {
            events.push(DeckEvent::CardsDepleted);
        }
        events
    }

    fn run_release<H>(&mut self, host: &mut H, card: CardId, release: Release) -> Vec<DeckEvent>
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        let (target, events) = match release {
            Release::SnapBack { target } => (target, vec![DeckEvent::CardActionUp]),
            Release::Exit { target, .. } => (target, Vec::new()),
        };
        let id = mint_animation(&mut self.next_animation);
        host.animate(&Animation {
            id,
            card,
            target,
            duration: self.config.animation_duration(),
        });
        if let Some(active) = active_for(&mut self.active, card) {
            active.animation = Some(id);
        }
        if self.refill_pending && !self.gesture_in_flight() {
            self.rebuild_window(host);
        }
        events
    }

    fn available(&self) -> usize {
        self.source
            .as_ref()
            .map_or(0, |s| s.count().saturating_sub(self.cursor))
    }

    fn gesture_in_flight(&self) -> bool {
        self.active.as_ref().is_some_and(|a| {
            matches!(
                a.interpreter.phase(),
                GesturePhase::Dragging | GesturePhase::Exiting(_)
            )
        })
    }

    fn teardown_gesture<H>(&mut self, host: &mut H)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        if let Some(mut active) = self.active.take() {
            active.interpreter.reset();
            if let Some(id) = active.animation {
                host.cancel_animation(id);
            }
        }
        for (_, id) in self.stack_animations.drain(..) {
            host.cancel_animation(id);
        }
    }

    fn clear_window<H>(&mut self, host: &mut H)
    where
        H: DeckHost<S::Card> + ?Sized,
    {
        self.teardown_gesture(host);
        self.refill_pending = false;
        for entry in self.window.drain(..) {
            host.detach_card(entry.id);
        }
    }

    fn release_source(&mut self) -> Option<S> {
        let mut previous = self.source.take();
        if let (Some(source), Some(subscription)) = (previous.as_mut(), self.subscription.take()) {
            source.unsubscribe(subscription);
        }
        previous
    }
}
