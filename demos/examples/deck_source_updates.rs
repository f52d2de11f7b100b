// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source notifications: the host owns a shared `VecSource`, mutates it, and
//! forwards the queued notifications to the deck.
//!
//! Run:
//! - `cargo run -p understory_demos --example deck_source_updates`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_deck::config::SwipeConfig;
use understory_deck::deck::DeckController;
use understory_deck::host::{Animation, CardPlacement, DeckHost};
use understory_deck::source::VecSource;
use understory_deck::types::{AnimationId, CardId, CardPose};

type Shared = Rc<RefCell<VecSource<String>>>;

struct NullHost;

impl DeckHost<String> for NullHost {
    fn content_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 320.0, 480.0)
    }
    fn attach_card(&mut self, _: CardId, card: &String, placement: &CardPlacement) {
        println!("  attach {card} (z={})", placement.z_index);
    }
    fn detach_card(&mut self, _: CardId) {}
    fn set_pose(&mut self, _: CardId, _: &CardPose) {}
    fn animate(&mut self, _: &Animation) {}
    fn cancel_animation(&mut self, _: AnimationId) {}
    fn request_layout(&mut self) {}
}

fn forward(deck: &mut DeckController<Shared>, host: &mut NullHost, source: &Shared) {
    let pending = source.borrow_mut().drain_notifications();
    for n in pending {
        println!("  forward {:?}", n.event);
        deck.on_source_event(host, n.subscription, n.event);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source: Shared = Rc::new(RefCell::new(VecSource::new(vec!["first".to_string()])));
    let mut host = NullHost;
    let mut deck = DeckController::new(SwipeConfig::default());

    println!("== Attach one card ==");
    deck.attach(&mut host, Rc::clone(&source));
    assert_eq!(deck.window().len(), 1);

    println!("== Append two cards ==");
    source
        .borrow_mut()
        .extend(["second".to_string(), "third".to_string()]);
    forward(&mut deck, &mut host, &source);
    assert_eq!(deck.window().len(), 3);

    println!("== Append while full (no rebuild) ==");
    source.borrow_mut().push("fourth".to_string());
    forward(&mut deck, &mut host, &source);
    assert_eq!(deck.window().len(), 3);

    println!("== Invalidate ==");
    source.borrow_mut().clear();
    forward(&mut deck, &mut host, &source);
    assert!(deck.window().is_empty());
    assert_eq!(deck.cursor(), 0);
}
