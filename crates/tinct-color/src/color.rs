// SPDX-License-Identifier: MIT
//
// tinct color system — sRGB storage with HSL and HWB views.
//
// Single-character variable names (r, g, b, h, s, l, w) are the standard
// mathematical convention in color science.
#![allow(clippy::many_single_char_names)]
//
// The expression language reads and writes six channels:
//
//   hue         0–360   (HSL/HWB, wraps)
//   saturation  0–100   (HSL)
//   lightness   0–100   (HSL)
//   whiteness   0–100   (HWB)
//   blackness   0–100   (HWB)
//   alpha       0–1
//
// Reads convert sRGB → HSL/HWB. Writes convert the other way, clamping
// into range. Conversions follow CSS Color 4 (§7 HSL, §8 HWB).

use std::fmt;
use std::str::FromStr;

use crate::css;
use crate::error::ColorError;

// ─── Color ───────────────────────────────────────────────────────────────────

/// An sRGB color with alpha transparency.
///
/// Channels are kept as unrounded `f64` in the 0–255 range so that a
/// chain of adjustments does not accumulate 8-bit rounding error. Rounding
/// happens only when formatting ([`Display`](fmt::Display), [`to_hex`](Self::to_hex)).
///
/// # Examples
///
/// ```
/// use tinct_color::Color;
///
/// let red: Color = "#ff0000".parse().unwrap();
/// assert!((red.hue() - 0.0).abs() < 1e-9);
///
/// let pink = red.mix(&Color::WHITE, 0.5).unwrap();
/// assert_eq!(pink.to_string(), "rgb(255, 128, 128)");
///
/// let faded = red.with_alpha(0.5).unwrap();
/// assert_eq!(faded.to_string(), "rgba(255, 0, 0, 0.5)");
/// ```
#[derive(Clone, Copy)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    alpha: f64,
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Pure black.
    pub const BLACK: Self = Self::rgb_unchecked(0.0, 0.0, 0.0, 1.0);

    /// Pure white.
    pub const WHITE: Self = Self::rgb_unchecked(255.0, 255.0, 255.0, 1.0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgb_unchecked(0.0, 0.0, 0.0, 0.0);

    const fn rgb_unchecked(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    /// Create an opaque color from sRGB channels (0–255, clamped).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if any channel is NaN or infinite.
    pub fn rgb(r: f64, g: f64, b: f64) -> Result<Self, ColorError> {
        Self::rgba(r, g, b, 1.0)
    }

    /// Create a color from sRGB channels (0–255) and alpha (0–1), clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if any value is NaN or infinite.
    pub fn rgba(r: f64, g: f64, b: f64, alpha: f64) -> Result<Self, ColorError> {
        Ok(Self {
            r: finite(r, "red")?.clamp(0.0, 255.0),
            g: finite(g, "green")?.clamp(0.0, 255.0),
            b: finite(b, "blue")?.clamp(0.0, 255.0),
            alpha: finite(alpha, "alpha")?.clamp(0.0, 1.0),
        })
    }

    /// Create an opaque color from 8-bit sRGB values.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb_unchecked(f64::from(r), f64::from(g), f64::from(b), 1.0)
    }

    /// Create a color from 8-bit sRGB values with 8-bit alpha.
    #[must_use]
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgb_unchecked(
            f64::from(r),
            f64::from(g),
            f64::from(b),
            f64::from(a) / 255.0,
        )
    }

    /// Create a color from HSL: hue in degrees, saturation and lightness
    /// on 0–100, alpha on 0–1.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if any value is NaN or infinite.
    pub fn hsla(h: f64, s: f64, l: f64, alpha: f64) -> Result<Self, ColorError> {
        let h = normalize_hue(finite(h, "hue")?);
        let s = finite(s, "saturation")?.clamp(0.0, 100.0);
        let l = finite(l, "lightness")?.clamp(0.0, 100.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::rgba(r, g, b, alpha)
    }

    /// Create an opaque color from HSL.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if any value is NaN or infinite.
    pub fn hsl(h: f64, s: f64, l: f64) -> Result<Self, ColorError> {
        Self::hsla(h, s, l, 1.0)
    }

    /// Create a color from HWB: hue in degrees, whiteness and blackness on
    /// 0–100, alpha on 0–1.
    ///
    /// When whiteness + blackness exceeds 100 the result is the gray
    /// `whiteness / (whiteness + blackness)`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if any value is NaN or infinite.
    pub fn hwba(h: f64, w: f64, b: f64, alpha: f64) -> Result<Self, ColorError> {
        let h = normalize_hue(finite(h, "hue")?);
        let w = finite(w, "whiteness")?.clamp(0.0, 100.0);
        let b = finite(b, "blackness")?.clamp(0.0, 100.0);
        let (r, g, bl) = hwb_to_rgb(h, w, b);
        Self::rgba(r, g, bl, alpha)
    }

    /// Create an opaque color from HWB.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if any value is NaN or infinite.
    pub fn hwb(h: f64, w: f64, b: f64) -> Result<Self, ColorError> {
        Self::hwba(h, w, b, 1.0)
    }

    /// Parse a CSS color literal. See [`css::parse`] for accepted forms.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorError`] describing why the literal was rejected.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        css::parse(s)
    }

    // ─── Channel reads ───────────────────────────────────────────────────

    /// Red channel, 0–255 (unrounded).
    #[inline]
    #[must_use]
    pub const fn red(self) -> f64 {
        self.r
    }

    /// Green channel, 0–255 (unrounded).
    #[inline]
    #[must_use]
    pub const fn green(self) -> f64 {
        self.g
    }

    /// Blue channel, 0–255 (unrounded).
    #[inline]
    #[must_use]
    pub const fn blue(self) -> f64 {
        self.b
    }

    /// Alpha, 0–1.
    #[inline]
    #[must_use]
    pub const fn alpha(self) -> f64 {
        self.alpha
    }

    /// HSL/HWB hue in degrees, 0–360. Achromatic colors report 0.
    #[must_use]
    pub fn hue(self) -> f64 {
        rgb_to_hsl(self.r, self.g, self.b).0
    }

    /// HSL saturation, 0–100.
    #[must_use]
    pub fn saturationl(self) -> f64 {
        rgb_to_hsl(self.r, self.g, self.b).1
    }

    /// HSL lightness, 0–100.
    #[must_use]
    pub fn lightness(self) -> f64 {
        rgb_to_hsl(self.r, self.g, self.b).2
    }

    /// HWB whiteness, 0–100.
    #[must_use]
    pub fn whiteness(self) -> f64 {
        self.r.min(self.g).min(self.b) / 255.0 * 100.0
    }

    /// HWB blackness, 0–100.
    #[must_use]
    pub fn blackness(self) -> f64 {
        (1.0 - self.r.max(self.g).max(self.b) / 255.0) * 100.0
    }

    // ─── Channel writes ──────────────────────────────────────────────────
    //
    // Each setter converts into the channel's model, replaces one value,
    // and converts back. Out-of-range values are clamped (hue wraps).

    /// Return a copy with the given alpha (clamped to 0–1).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] for NaN or infinity.
    pub fn with_alpha(self, alpha: f64) -> Result<Self, ColorError> {
        Ok(Self {
            alpha: finite(alpha, "alpha")?.clamp(0.0, 1.0),
            ..self
        })
    }

    /// Return a copy with the given hue (wrapped into 0–360).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] for NaN or infinity.
    pub fn with_hue(self, h: f64) -> Result<Self, ColorError> {
        let (_, s, l) = rgb_to_hsl(self.r, self.g, self.b);
        Self::hsla(h, s, l, self.alpha)
    }

    /// Return a copy with the given HSL saturation (clamped to 0–100).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] for NaN or infinity.
    pub fn with_saturationl(self, s: f64) -> Result<Self, ColorError> {
        let (h, _, l) = rgb_to_hsl(self.r, self.g, self.b);
        Self::hsla(h, s, l, self.alpha)
    }

    /// Return a copy with the given HSL lightness (clamped to 0–100).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] for NaN or infinity.
    pub fn with_lightness(self, l: f64) -> Result<Self, ColorError> {
        let (h, s, _) = rgb_to_hsl(self.r, self.g, self.b);
        Self::hsla(h, s, l, self.alpha)
    }

    /// Return a copy with the given HWB whiteness (clamped to 0–100).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] for NaN or infinity.
    pub fn with_whiteness(self, w: f64) -> Result<Self, ColorError> {
        Self::hwba(self.hue(), w, self.blackness(), self.alpha)
    }

    /// Return a copy with the given HWB blackness (clamped to 0–100).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] for NaN or infinity.
    pub fn with_blackness(self, b: f64) -> Result<Self, ColorError> {
        Self::hwba(self.hue(), self.whiteness(), b, self.alpha)
    }

    // ─── Mixing ──────────────────────────────────────────────────────────

    /// Mix `other` into this color.
    ///
    /// `weight` is the share of `other`: 0.0 returns `self`, 1.0 returns
    /// `other`. Uses the Sass weighting, which lets the more opaque color
    /// dominate when the alphas differ. The result's alpha is the plain
    /// weighted average.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NonFinite`] if `weight` is NaN or infinite.
    pub fn mix(self, other: &Self, weight: f64) -> Result<Self, ColorError> {
        let p = finite(weight, "mix weight")?;
        let w = 2.0f64.mul_add(p, -1.0);
        let a = other.alpha - self.alpha;

        let w_other = if w.mul_add(a, 1.0).abs() < f64::EPSILON {
            w
        } else {
            (w + a) / w.mul_add(a, 1.0)
        };
        let w_other = (w_other + 1.0) / 2.0;
        let w_self = 1.0 - w_other;

        Self::rgba(
            other.r.mul_add(w_other, self.r * w_self),
            other.g.mul_add(w_other, self.g * w_self),
            other.b.mul_add(w_other, self.b * w_self),
            other.alpha.mul_add(p, self.alpha * (1.0 - p)),
        )
    }

    // ─── Luminance & contrast ────────────────────────────────────────────

    /// WCAG 2.1 relative luminance, 0.0 (black) to 1.0 (white).
    ///
    ///   L = 0.2126 * `R_lin` + 0.7152 * `G_lin` + 0.0722 * `B_lin`
    ///
    /// Alpha is ignored.
    #[must_use]
    pub fn luminosity(self) -> f64 {
        let r = srgb_to_linear(self.r / 255.0);
        let g = srgb_to_linear(self.g / 255.0);
        let b = srgb_to_linear(self.b / 255.0);
        0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
    }

    /// WCAG 2.1 contrast ratio against `other`, in [1.0, 21.0].
    ///
    /// Symmetric: the lighter color always goes in the numerator.
    #[must_use]
    pub fn contrast(self, other: &Self) -> f64 {
        let la = self.luminosity();
        let lb = other.luminosity();
        let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// YIQ brightness classification: dark when the weighted sRGB sum is
    /// below the midpoint (128).
    #[must_use]
    pub fn is_dark(self) -> bool {
        let yiq = 722.0f64.mul_add(self.b, 2126.0f64.mul_add(self.r, 7152.0 * self.g)) / 10000.0;
        yiq < 128.0
    }

    /// Inverse of [`is_dark`](Self::is_dark).
    #[must_use]
    pub fn is_light(self) -> bool {
        !self.is_dark()
    }

    // ─── Formatting ──────────────────────────────────────────────────────

    /// Rounded 8-bit channels.
    #[must_use]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        (to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Hex string: `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        if self.alpha >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            let a = to_u8(self.alpha * 255.0);
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color::rgba({:.3}, {:.3}, {:.3}, {:.3})",
            self.r, self.g, self.b, self.alpha
        )
    }
}

/// CSS form: `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb8();
        if self.alpha >= 1.0 {
            write!(f, "rgb({r}, {g}, {b})")
        } else {
            let a = (self.alpha * 1000.0).round() / 1000.0;
            write!(f, "rgba({r}, {g}, {b}, {a})")
        }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        // Channels are f64 in 0–255; 1e-6 is far below one 8-bit step.
        const EPS: f64 = 1e-6;
        (self.r - other.r).abs() < EPS
            && (self.g - other.g).abs() < EPS
            && (self.b - other.b).abs() < EPS
            && (self.alpha - other.alpha).abs() < EPS
    }
}

impl Default for Color {
    /// Default is fully opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        css::parse(s)
    }
}

// ─── Color Space Conversion Functions ────────────────────────────────────────

/// Reject NaN and infinity, naming the offending channel.
#[inline]
fn finite(v: f64, channel: &'static str) -> Result<f64, ColorError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ColorError::NonFinite { channel })
    }
}

/// Normalize a hue angle to the range [0, 360).
#[inline]
fn normalize_hue(h: f64) -> f64 {
    let h = h % 360.0;
    if h < 0.0 { h + 360.0 } else { h }
}

/// sRGB (0–255) → HSL (degrees, 0–100, 0–100).
#[allow(clippy::float_cmp)]
fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= 0.0 {
        0.0
    } else if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let h = normalize_hue(h * 60.0);

    let l = (min + max) / 2.0;
    let s = if delta <= 0.0 {
        0.0
    } else if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    (h, s * 100.0, l * 100.0)
}

/// HSL (degrees, 0–100, 0–100) → sRGB (0–255).
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let s = s / 100.0;
    let l = l / 100.0;
    if s <= 0.0 {
        let v = l * 255.0;
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l.mul_add(-s, l + s) };
    let p = 2.0f64.mul_add(l, -q);
    let t = h / 360.0;

    (
        hue_to_channel(p, q, t + 1.0 / 3.0) * 255.0,
        hue_to_channel(p, q, t) * 255.0,
        hue_to_channel(p, q, t - 1.0 / 3.0) * 255.0,
    )
}

/// One sRGB channel (0–1) of an HSL color at hue fraction `t`.
#[inline]
fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if 6.0 * t < 1.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if 2.0 * t < 1.0 {
        q
    } else if 3.0 * t < 2.0 {
        ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p)
    } else {
        p
    }
}

/// HWB (degrees, 0–100, 0–100) → sRGB (0–255).
fn hwb_to_rgb(h: f64, w: f64, b: f64) -> (f64, f64, f64) {
    let w = w / 100.0;
    let b = b / 100.0;
    if w + b >= 1.0 {
        let gray = w / (w + b) * 255.0;
        return (gray, gray, gray);
    }

    // Start from the fully saturated hue, then scale toward white/black.
    let (r, g, bl) = hsl_to_rgb(h, 100.0, 50.0);
    let scale = 1.0 - w - b;
    let channel = |c: f64| (c / 255.0).mul_add(scale, w) * 255.0;
    (channel(r), channel(g), channel(bl))
}

/// Linearize one sRGB channel (0–1) for luminance math.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Round a 0–255 channel to the nearest byte.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.round().clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
