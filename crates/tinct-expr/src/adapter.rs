//! The color-math seam.
//!
//! The evaluator never touches color channels directly; everything goes
//! through a [`ColorLibrary`]. [`Standard`] plugs in `tinct-color`.

use std::fmt;

use tinct_color::{Color, ColorError};

use crate::ast::Channel;

/// Color construction, channel access and color math.
///
/// Channel scales: hue 0–360, lightness/saturation/whiteness/blackness
/// 0–100, alpha 0–1. Implementations decide how out-of-range writes are
/// handled (clamp, wrap, or error).
pub trait ColorLibrary {
    type Color: Clone + fmt::Debug;
    type Error: std::error::Error + 'static;

    /// Parse a literal: hex (`#rgb`...), a named color, or a CSS function.
    fn parse(&self, s: &str) -> Result<Self::Color, Self::Error>;

    /// Construct from sRGB channels (0–255) and alpha.
    fn rgb(&self, r: f64, g: f64, b: f64, alpha: f64) -> Result<Self::Color, Self::Error>;

    /// Construct from HSL (hue 0–360, saturation/lightness 0–100) and alpha.
    fn hsl(&self, h: f64, s: f64, l: f64, alpha: f64) -> Result<Self::Color, Self::Error>;

    /// Construct from HWB (hue 0–360, whiteness/blackness 0–100) and alpha.
    fn hwb(&self, h: f64, w: f64, b: f64, alpha: f64) -> Result<Self::Color, Self::Error>;

    fn channel(&self, color: &Self::Color, channel: Channel) -> f64;

    fn with_channel(&self, color: &Self::Color, channel: Channel, value: f64) -> Result<Self::Color, Self::Error>;

    /// Mix `other` into `color`; `weight` is the share of `other` (0–1).
    fn mix(&self, color: &Self::Color, other: &Self::Color, weight: f64) -> Result<Self::Color, Self::Error>;

    /// WCAG contrast ratio, ≥ 1.
    fn contrast(&self, a: &Self::Color, b: &Self::Color) -> f64;

    /// WCAG relative luminance, 0–1.
    fn luminosity(&self, color: &Self::Color) -> f64;

    fn is_dark(&self, color: &Self::Color) -> bool;

    fn is_light(&self, color: &Self::Color) -> bool {
        !self.is_dark(color)
    }

    /// `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    fn to_css(&self, color: &Self::Color) -> String;
}

// ---------------------------------------------------------------------------
// Standard
// ---------------------------------------------------------------------------

/// [`ColorLibrary`] backed by [`tinct_color::Color`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standard;

impl ColorLibrary for Standard {
    type Color = Color;
    type Error = ColorError;

    fn parse(&self, s: &str) -> Result<Color, ColorError> {
        Color::parse(s)
    }

    fn rgb(&self, r: f64, g: f64, b: f64, alpha: f64) -> Result<Color, ColorError> {
        Color::rgba(r, g, b, alpha)
    }

    fn hsl(&self, h: f64, s: f64, l: f64, alpha: f64) -> Result<Color, ColorError> {
        Color::hsla(h, s, l, alpha)
    }

    fn hwb(&self, h: f64, w: f64, b: f64, alpha: f64) -> Result<Color, ColorError> {
        Color::hwba(h, w, b, alpha)
    }

    fn channel(&self, color: &Color, channel: Channel) -> f64 {
        match channel {
            Channel::Alpha => color.alpha(),
            Channel::Hue => color.hue(),
            Channel::Blackness => color.blackness(),
            Channel::Lightness => color.lightness(),
            Channel::Saturation => color.saturationl(),
            Channel::Whiteness => color.whiteness(),
        }
    }

    fn with_channel(&self, color: &Color, channel: Channel, value: f64) -> Result<Color, ColorError> {
        match channel {
            Channel::Alpha => color.with_alpha(value),
            Channel::Hue => color.with_hue(value),
            Channel::Blackness => color.with_blackness(value),
            Channel::Lightness => color.with_lightness(value),
            Channel::Saturation => color.with_saturationl(value),
            Channel::Whiteness => color.with_whiteness(value),
        }
    }

    fn mix(&self, color: &Color, other: &Color, weight: f64) -> Result<Color, ColorError> {
        color.mix(other, weight)
    }

    fn contrast(&self, a: &Color, b: &Color) -> f64 {
        a.contrast(b)
    }

    fn luminosity(&self, color: &Color) -> f64 {
        color.luminosity()
    }

    fn is_dark(&self, color: &Color) -> bool {
        color.is_dark()
    }

    fn is_light(&self, color: &Color) -> bool {
        color.is_light()
    }

    fn to_css(&self, color: &Color) -> String {
        color.to_string()
    }
}
