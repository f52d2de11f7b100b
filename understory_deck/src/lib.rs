// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_deck --heading-base-level=0

//! Understory Deck: a headless, `no_std` stack of swipeable cards.
//!
//! ## Overview
//!
//! This crate holds the logic of a "swipe left / swipe right" card deck and nothing else.
//! It decides which items of a [`CardSource`](crate::source::CardSource) are materialized,
//! how they are stacked, how a drag on the top card turns into a committed swipe or a
//! snap-back, and when the host application is told about swipes and depletion.
//! Measuring, drawing, and running animations stay with the host toolkit, reached through
//! [`DeckHost`](crate::host::DeckHost).
//!
//! ## Pieces
//!
//! - [`geometry`]: pure threshold and pose math (drag progress, rotation, opacity,
//!   stacking offsets).
//! - [`gesture`]: [`SwipeInterpreter`](crate::gesture::SwipeInterpreter), the drag state machine
//!   attached to the top card.
//! - [`deck`]: [`DeckController`](crate::deck::DeckController), which owns the card window and
//!   the cursor into the source.
//! - [`source`]: the [`CardSource`](crate::source::CardSource) trait, subscription tokens, and a
//!   vector-backed [`VecSource`](crate::source::VecSource).
//! - [`config`]: immutable [`SwipeConfig`](crate::config::SwipeConfig), resolved once from
//!   [`DeckAttributes`](crate::config::DeckAttributes).
//!
//! ## Event flow
//!
//! 1) [`attach`](crate::deck::DeckController::attach) a source; up to `max_visible` cards are
//!    attached to the host and slide into their stacked positions.
//! 2) Forward pointer input for the top card. Each move yields a
//!    [`CardPose`](crate::types::CardPose) the deck pushes to the host with
//!    [`set_pose`](crate::host::DeckHost::set_pose).
//! 3) On release the card either snaps back or starts an exit animation. When the host reports
//!    that the exit finished, the deck removes the item from the source, advances its cursor,
//!    rebuilds the window, and returns the [`DeckEvent`](crate::types::DeckEvent)s to dispatch.
//!
//! Committing depends on drag distance only: a release further than a quarter of the content
//! width from the touch-down point commits in that direction.
//!
//! ## Threading
//!
//! Everything runs on the host's UI thread. Animation completions and pointer events are
//! interleaved callbacks on that one thread, so the deck never sees concurrent mutation.
//! Removal after a swipe is driven by the exit animation's completion, never by a timer.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod deck;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod source;
pub mod types;

#[cfg(test)]
mod testing;
