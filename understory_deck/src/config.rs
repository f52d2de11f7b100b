// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deck configuration.
//!
//! ## Overview
//!
//! A host resolves its styling attributes into a [`DeckAttributes`] bag, then
//! turns that into an immutable [`SwipeConfig`] once, at construction time.
//! Two paths exist:
//!
//! - [`SwipeConfig::resolve`] never fails: each invalid attribute falls back to
//!   its default and is reported through `tracing`.
//! - `SwipeConfig::try_from(attrs)` is strict and returns the first [`ConfigError`].
//!
//! ```
//! use understory_deck::config::{DeckAttributes, SwipeConfig};
//!
//! let attrs = DeckAttributes {
//!     max_visible: Some(0),
//!     card_spacing: Some(8.0),
//!     ..Default::default()
//! };
//! assert!(SwipeConfig::try_from(attrs.clone()).is_err());
//!
//! let config = SwipeConfig::resolve(&attrs);
//! assert_eq!(config.max_visible(), 3);
//! assert_eq!(config.card_spacing(), 8.0);
//! ```

use core::time::Duration;

use crate::types::IndicatorRef;

/// Default number of simultaneously materialized cards.
pub const DEFAULT_MAX_VISIBLE: usize = 3;
/// Default rotation at full drag, in degrees.
pub const DEFAULT_ROTATION_DEGREES: f64 = 15.0;
/// Default vertical spacing between stacked cards.
pub const DEFAULT_CARD_SPACING: f64 = 15.0;
/// Default card opacity at full drag.
pub const DEFAULT_OPACITY_END: f64 = 0.33;
/// Default duration of stack, snap-back, and exit animations.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(160);

bitflags::bitflags! {
    /// Z-layer placement of the whole deck relative to the host's siblings.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderLayer: u8 {
        /// Render the deck above its siblings.
        const ABOVE = 0b0000_0001;
        /// Render the deck below its siblings.
        const BELOW = 0b0000_0010;
    }
}

impl Default for RenderLayer {
    fn default() -> Self {
        Self::ABOVE
    }
}

impl RenderLayer {
    /// Build from the two attribute booleans.
    pub fn from_flags(above: bool, below: bool) -> Self {
        let mut layer = Self::empty();
        layer.set(Self::ABOVE, above);
        layer.set(Self::BELOW, below);
        layer
    }

    /// Effective placement. `BELOW` wins when both are set.
    pub fn placement(self) -> DeckPlacement {
        if self.contains(Self::BELOW) {
            DeckPlacement::Below
        } else if self.contains(Self::ABOVE) {
            DeckPlacement::Above
        } else {
            DeckPlacement::Inherit
        }
    }
}

/// Resolved z-layer placement of the deck.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeckPlacement {
    /// Above every sibling.
    Above,
    /// Below every sibling.
    Below,
    /// Leave the host's ordering alone.
    Inherit,
}

/// Invalid configuration attribute.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `max_visible` must be at least one.
    #[error("max_visible must be at least 1")]
    MaxVisibleZero,
    /// Rotation must be a finite number of degrees.
    #[error("rotation_degrees must be finite, got {0}")]
    InvalidRotation(f64),
    /// Spacing must be finite and non-negative.
    #[error("card_spacing must be finite and non-negative, got {0}")]
    InvalidSpacing(f64),
    /// Opacity must lie in `[0, 1]`.
    #[error("opacity_end must be within [0, 1], got {0}")]
    OpacityOutOfRange(f64),
    /// Animations need a non-zero duration.
    #[error("animation duration must be non-zero")]
    InvalidAnimationDuration,
    /// Left and right indicators must be distinct elements.
    #[error("left and right indicators both reference element {0:?}")]
    SameIndicator(IndicatorRef),
}

/// Raw deck attributes as a host's styling system would supply them.
///
/// Every field is optional; missing values take the defaults listed on
/// [`SwipeConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "snake_case"))]
pub struct DeckAttributes {
    /// Number of cards materialized at once.
    pub max_visible: Option<usize>,
    /// Rotation at full drag, in degrees.
    pub rotation_degrees: Option<f64>,
    /// Vertical spacing between stacked cards.
    pub card_spacing: Option<f64>,
    /// Render the deck above its siblings.
    pub render_above: Option<bool>,
    /// Render the deck below its siblings.
    pub render_below: Option<bool>,
    /// Card opacity at full drag.
    pub opacity_end: Option<f64>,
    /// Element faded in while dragging left.
    pub left_indicator: Option<IndicatorRef>,
    /// Element faded in while dragging right.
    pub right_indicator: Option<IndicatorRef>,
    /// Ask the host to back each card with an off-screen layer.
    pub hardware_layers: Option<bool>,
    /// Duration of deck animations, in milliseconds.
    pub animation_millis: Option<u64>,
}

/// Immutable deck configuration.
///
/// | setting | default |
/// |---|---|
/// | `max_visible` | 3 |
/// | `rotation_degrees` | 15 |
/// | `card_spacing` | 15 |
/// | `render_layer` | [`RenderLayer::ABOVE`] |
/// | `opacity_end` | 0.33 |
/// | indicators | none |
/// | `hardware_layers` | true |
/// | `animation_duration` | 160 ms |
#[derive(Clone, Debug, PartialEq)]
pub struct SwipeConfig {
    max_visible: usize,
    rotation_degrees: f64,
    card_spacing: f64,
    render_layer: RenderLayer,
    opacity_end: f64,
    left_indicator: Option<IndicatorRef>,
    right_indicator: Option<IndicatorRef>,
    hardware_layers: bool,
    animation_duration: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_VISIBLE,
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            card_spacing: DEFAULT_CARD_SPACING,
            render_layer: RenderLayer::default(),
            opacity_end: DEFAULT_OPACITY_END,
            left_indicator: None,
            right_indicator: None,
            hardware_layers: true,
            animation_duration: DEFAULT_ANIMATION_DURATION,
        }
    }
}

impl SwipeConfig {
    /// Resolve attributes leniently: invalid values fall back to their defaults.
    pub fn resolve(attrs: &DeckAttributes) -> Self {
        let mut config = Self::default();
        let apply = |result: Result<(), ConfigError>| {
            if let Err(err) = result {
                tracing::warn!(%err, "invalid deck attribute, using default");
            }
        };
        apply(config.apply_max_visible(attrs.max_visible));
        apply(config.apply_rotation(attrs.rotation_degrees));
        apply(config.apply_spacing(attrs.card_spacing));
        apply(config.apply_opacity_end(attrs.opacity_end));
        apply(config.apply_animation_millis(attrs.animation_millis));
        config.apply_layer(attrs.render_above, attrs.render_below);
        apply(config.apply_indicators(attrs.left_indicator, attrs.right_indicator));
        if let Some(hw) = attrs.hardware_layers {
            config.hardware_layers = hw;
        }
        config
    }

    /// Number of cards materialized at once (at least 1).
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Rotation at full drag, in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Vertical spacing between stacked cards.
    pub fn card_spacing(&self) -> f64 {
        self.card_spacing
    }

    /// Requested z-layer flags.
    pub fn render_layer(&self) -> RenderLayer {
        self.render_layer
    }

    /// Effective deck placement relative to host siblings.
    pub fn deck_placement(&self) -> DeckPlacement {
        self.render_layer.placement()
    }

    /// Card opacity at full drag.
    pub fn opacity_end(&self) -> f64 {
        self.opacity_end
    }

    /// Element faded in while dragging left.
    pub fn left_indicator(&self) -> Option<IndicatorRef> {
        self.left_indicator
    }

    /// Element faded in while dragging right.
    pub fn right_indicator(&self) -> Option<IndicatorRef> {
        self.right_indicator
    }

    /// Rendering hint forwarded to the host for every card.
    pub fn hardware_layers(&self) -> bool {
        self.hardware_layers
    }

    /// Duration of stack, snap-back, and exit animations.
    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }

    fn apply_max_visible(&mut self, value: Option<usize>) -> Result<(), ConfigError> {
        match value {
            Some(0) => Err(ConfigError::MaxVisibleZero),
            Some(n) => {
                self.max_visible = n;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn apply_rotation(&mut self, value: Option<f64>) -> Result<(), ConfigError> {
        match value {
            Some(deg) if !deg.is_finite() => Err(ConfigError::InvalidRotation(deg)),
            Some(deg) => {
                self.rotation_degrees = deg;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn apply_spacing(&mut self, value: Option<f64>) -> Result<(), ConfigError> {
        match value {
            Some(s) if !(s.is_finite() && s >= 0.0) => Err(ConfigError::InvalidSpacing(s)),
            Some(s) => {
                self.card_spacing = s;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn apply_opacity_end(&mut self, value: Option<f64>) -> Result<(), ConfigError> {
        match value {
            Some(o) if !(0.0..=1.0).contains(&o) => Err(ConfigError::OpacityOutOfRange(o)),
            Some(o) => {
                self.opacity_end = o;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn apply_animation_millis(&mut self, value: Option<u64>) -> Result<(), ConfigError> {
        match value {
            Some(0) => Err(ConfigError::InvalidAnimationDuration),
            Some(ms) => {
                self.animation_duration = Duration::from_millis(ms);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn apply_layer(&mut self, above: Option<bool>, below: Option<bool>) {
        let defaults = RenderLayer::default();
        self.render_layer = RenderLayer::from_flags(
            above.unwrap_or(defaults.contains(RenderLayer::ABOVE)),
            below.unwrap_or(defaults.contains(RenderLayer::BELOW)),
        );
    }

    fn apply_indicators(
        &mut self,
        left: Option<IndicatorRef>,
        right: Option<IndicatorRef>,
    ) -> Result<(), ConfigError> {
        if let (Some(l), Some(r)) = (left, right)
            && l == r
        {
            return Err(ConfigError::SameIndicator(l));
        }
        self.left_indicator = left;
        self.right_indicator = right;
        Ok(())
    }
}

impl TryFrom<DeckAttributes> for SwipeConfig {
    type Error = ConfigError;

    fn try_from(attrs: DeckAttributes) -> Result<Self, Self::Error> {
        let mut config = Self::default();
        config.apply_max_visible(attrs.max_visible)?;
        config.apply_rotation(attrs.rotation_degrees)?;
        config.apply_spacing(attrs.card_spacing)?;
        config.apply_opacity_end(attrs.opacity_end)?;
        config.apply_animation_millis(attrs.animation_millis)?;
        config.apply_layer(attrs.render_above, attrs.render_below);
        config.apply_indicators(attrs.left_indicator, attrs.right_indicator)?;
        if let Some(hw) = attrs.hardware_layers {
            config.hardware_layers = hw;
        }
        Ok(config)
    }
}
