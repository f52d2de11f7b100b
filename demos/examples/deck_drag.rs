// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragging the top card: one short drag that snaps back, one that commits.
//!
//! The host here queues animations and completes them in order, standing in for
//! a toolkit's animation clock.
//!
//! Run:
//! - `cargo run -p understory_demos --example deck_drag`

use std::collections::VecDeque;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_deck::config::SwipeConfig;
use understory_deck::deck::DeckController;
use understory_deck::host::{Animation, CardPlacement, DeckHost};
use understory_deck::source::VecSource;
use understory_deck::types::{AnimationId, CardId, CardPose, DeckEvent};

#[derive(Default)]
struct QueueHost {
    running: VecDeque<Animation>,
}

impl DeckHost<u32> for QueueHost {
    fn content_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 360.0, 640.0)
    }

    fn attach_card(&mut self, _id: CardId, _card: &u32, _placement: &CardPlacement) {}

    fn detach_card(&mut self, id: CardId) {
        self.running.retain(|a| a.card != id);
    }

    fn set_pose(&mut self, id: CardId, pose: &CardPose) {
        println!(
            "  {id:?} at ({:.0}, {:.0}) rot={:.1} opacity={:.2} L={:.2} R={:.2}",
            pose.position.x,
            pose.position.y,
            pose.rotation_degrees,
            pose.opacity,
            pose.left_indicator,
            pose.right_indicator
        );
    }

    fn animate(&mut self, animation: &Animation) {
        self.running.push_back(*animation);
    }

    fn cancel_animation(&mut self, id: AnimationId) {
        self.running.retain(|a| a.id != id);
    }

    fn request_layout(&mut self) {}
}

/// Complete queued animations until the host is idle, collecting deck events.
fn settle(deck: &mut DeckController<VecSource<u32>>, host: &mut QueueHost) -> Vec<DeckEvent> {
    let mut events = Vec::new();
    while let Some(animation) = host.running.pop_front() {
        events.extend(deck.animation_finished(host, animation.id));
    }
    events
}

fn drag(
    deck: &mut DeckController<VecSource<u32>>,
    host: &mut QueueHost,
    to_x: f64,
) -> Vec<DeckEvent> {
    let top = deck.top_card().expect("deck has a top card");
    let start = Point::new(180.0, 320.0);
    let mut events = deck.pointer_down(host, top, start);
    for step in 1..=4 {
        let x = start.x + (to_x - start.x) * f64::from(step) / 4.0;
        deck.pointer_move(host, top, Point::new(x, start.y + f64::from(step) * 2.0));
    }
    events.extend(deck.pointer_up(host, top, Point::new(to_x, start.y + 8.0)));
    events.extend(settle(deck, host));
    events
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = QueueHost::default();
    let mut deck = DeckController::new(SwipeConfig::default());
    deck.attach(&mut host, VecSource::new((1..=5).collect()));
    let _ = settle(&mut deck, &mut host);

    println!("== Short drag (snaps back) ==");
    let events = drag(&mut deck, &mut host, 230.0);
    println!("  events: {events:?}");
    assert_eq!(
        events,
        vec![DeckEvent::CardActionDown, DeckEvent::CardActionUp]
    );
    assert_eq!(deck.cursor(), 0);

    println!("== Long drag (commits right) ==");
    let events = drag(&mut deck, &mut host, 340.0);
    println!("  events: {events:?}");
    assert_eq!(
        events,
        vec![
            DeckEvent::CardActionDown,
            DeckEvent::CardActionUp,
            DeckEvent::CardSwipedRight
        ]
    );
    assert_eq!(deck.cursor(), 1);
    let shown: Vec<usize> = deck.window().iter().map(|e| e.source_index()).collect();
    println!("  window now shows source indices {shown:?}");
}
