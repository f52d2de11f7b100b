// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deck basics: attach a source and swipe programmatically until it runs dry.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example deck_basics`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_deck::config::{DeckAttributes, SwipeConfig};
use understory_deck::deck::DeckController;
use understory_deck::host::{Animation, CardPlacement, DeckHost};
use understory_deck::source::VecSource;
use understory_deck::types::{AnimationId, CardId, CardPose, DeckEvent};

struct ConsoleHost {
    bounds: Rect,
}

impl DeckHost<&'static str> for ConsoleHost {
    fn content_bounds(&self) -> Rect {
        self.bounds
    }

    fn attach_card(&mut self, id: CardId, card: &&'static str, placement: &CardPlacement) {
        println!("  attach {card:>8} as {id:?} at z={}", placement.z_index);
    }

    fn detach_card(&mut self, id: CardId) {
        println!("  detach {id:?}");
    }

    fn set_pose(&mut self, _id: CardId, _pose: &CardPose) {}

    fn animate(&mut self, animation: &Animation) {
        println!(
            "  animate {:?} to y={} over {:?}",
            animation.card, animation.target.position.y, animation.duration
        );
    }

    fn cancel_animation(&mut self, _id: AnimationId) {}

    fn request_layout(&mut self) {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SwipeConfig::resolve(&DeckAttributes {
        max_visible: Some(2),
        card_spacing: Some(12.0),
        ..Default::default()
    });
    let mut host = ConsoleHost {
        bounds: Rect::new(16.0, 16.0, 376.0, 616.0),
    };
    let mut deck = DeckController::new(config);

    println!("== Attach ==");
    deck.attach(&mut host, VecSource::new(vec!["amber", "birch", "cedar"]));

    let mut log = Vec::new();
    let mut right = true;
    while deck.top_card().is_some() {
        println!("== Swipe {} ==", if right { "right" } else { "left" });
        let events = if right {
            deck.swipe_top_right(&mut host)
        } else {
            deck.swipe_top_left(&mut host)
        };
        println!("  events: {events:?}");
        log.extend(events);
        right = !right;
    }

    assert_eq!(
        log,
        vec![
            DeckEvent::CardSwipedRight,
            DeckEvent::CardSwipedLeft,
            DeckEvent::CardSwipedRight,
            DeckEvent::CardsDepleted
        ]
    );
    assert_eq!(deck.cursor(), 3);
    let remaining = deck.source().map_or(0, |s| s.items().len());
    println!("== Remaining in source: {remaining} ==");
    assert_eq!(remaining, 0);
}
