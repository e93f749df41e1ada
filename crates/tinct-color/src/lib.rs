// SPDX-License-Identifier: MIT
//
// tinct-color — the color model behind tinct's expression engine.
//
// Colors are stored as sRGB channels (0–255, unrounded f64) plus alpha
// (0–1). Every other model the expression language talks about (HSL
// hue/saturation/lightness, HWB whiteness/blackness) is derived on
// demand and written back through sRGB, following CSS Color 4.
//
// Also here: CSS literal parsing (hex, named colors, rgb()/hsl()
// functions), WCAG 2.1 relative luminance and contrast ratio, and the
// Sass-style alpha-aware mix used by blend/shade/tint.

pub mod color;
pub mod css;
pub mod error;
pub mod named;

pub use color::Color;
pub use error::ColorError;
