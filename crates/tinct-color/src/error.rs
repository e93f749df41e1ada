// SPDX-License-Identifier: MIT
//
// Color errors — everything that can go wrong building or parsing a color.

use thiserror::Error;

/// Error produced by the color model.
///
/// Setters clamp out-of-range values instead of failing, so the only
/// runtime failure after construction is a non-finite input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Hex literal with the wrong number of digits or a non-hex digit.
    #[error("invalid hex color `#{0}`")]
    InvalidHex(String),

    /// A name that is neither a CSS named color nor a known literal form.
    #[error("unknown color `{0}`")]
    Unknown(String),

    /// A malformed `rgb()`/`rgba()`/`hsl()`/`hsla()` function string.
    #[error("invalid color function `{0}`")]
    InvalidFunction(String),

    /// NaN or infinity passed for a channel.
    #[error("{channel} must be a finite number")]
    NonFinite { channel: &'static str },
}
