// SPDX-License-Identifier: MIT
//
// CSS color literal parsing.
//
// Accepted forms:
//
//   #rgb  #rgba  #rrggbb  #rrggbbaa
//   rgb(r, g, b)  rgba(r, g, b, a)     r/g/b as 0–255 or percentages
//   hsl(h, s%, l%)  hsla(h, s%, l%, a) s/l on 0–100, `%` optional
//   CSS named colors, `transparent`
//
// Function arguments may be separated by commas, whitespace, or a `/`
// before alpha. Alpha accepts 0–1 or a percentage.

use crate::color::Color;
use crate::error::ColorError;
use crate::named;

/// Parse a CSS color literal.
///
/// # Errors
///
/// - [`ColorError::InvalidHex`] for a `#` literal with a bad digit or length
/// - [`ColorError::InvalidFunction`] for a malformed `rgb()`/`hsl()` string
/// - [`ColorError::Unknown`] for anything else that is not a named color
pub fn parse(s: &str) -> Result<Color, ColorError> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(hex.to_string()));
    }

    let lower = s.to_ascii_lowercase();
    if let Some((name, args)) = split_function(&lower) {
        return parse_function(name, args).ok_or_else(|| ColorError::InvalidFunction(s.to_string()));
    }

    named::named(s).ok_or_else(|| ColorError::Unknown(s.to_string()))
}

/// Parse hex digits (without the `#`).
fn parse_hex(s: &str) -> Option<Color> {
    let bytes = s.as_bytes();

    match bytes.len() {
        // #RGB
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(Color::rgb8(r * 17, g * 17, b * 17))
        }
        // #RGBA
        4 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            let a = parse_hex_digit(bytes[3])?;
            Some(Color::rgba8(r * 17, g * 17, b * 17, a * 17))
        }
        // #RRGGBB
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(Color::rgb8(r, g, b))
        }
        // #RRGGBBAA
        8 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            let a = parse_hex_byte(&bytes[6..8])?;
            Some(Color::rgba8(r, g, b, a))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Split `name(args)` for the four supported function names.
fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let name = s[..open].trim_end();
    if !matches!(name, "rgb" | "rgba" | "hsl" | "hsla") {
        return None;
    }
    let args = s[open + 1..].strip_suffix(')')?;
    Some((name, args))
}

/// A numeric function argument with its percent flag.
#[derive(Debug, Clone, Copy)]
struct Arg {
    value: f64,
    percent: bool,
}

fn parse_args(args: &str) -> Option<Vec<Arg>> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (digits, percent) = part
                .strip_suffix('%')
                .map_or((part, false), |digits| (digits, true));
            let value: f64 = digits.parse().ok()?;
            value.is_finite().then_some(Arg { value, percent })
        })
        .collect()
}

fn parse_function(name: &str, args: &str) -> Option<Color> {
    let args = parse_args(args)?;
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let alpha = args.get(3).map_or(1.0, |a| if a.percent { a.value / 100.0 } else { a.value });

    if name.starts_with("rgb") {
        let channel = |a: Arg| if a.percent { a.value * 255.0 / 100.0 } else { a.value };
        Color::rgba(channel(args[0]), channel(args[1]), channel(args[2]), alpha).ok()
    } else {
        Color::hsla(args[0].value, args[1].value, args[2].value, alpha).ok()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Hex ──────────────────────────────────────────────────────────────

    #[test]
    fn hex_six_digits() {
        assert_eq!(parse("#3366ff").unwrap().to_rgb8(), (51, 102, 255));
    }

    #[test]
    fn hex_three_digits() {
        assert_eq!(parse("#f0a").unwrap().to_rgb8(), (255, 0, 170));
    }

    #[test]
    fn hex_with_alpha() {
        let c = parse("#00000080").unwrap();
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-12);
        let d = parse("#0008").unwrap();
        assert!((d.alpha() - 136.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn hex_uppercase() {
        assert_eq!(parse("#FFaa00").unwrap().to_rgb8(), (255, 170, 0));
    }

    #[test]
    fn hex_bad_length() {
        assert_eq!(parse("#12345"), Err(ColorError::InvalidHex("12345".into())));
    }

    #[test]
    fn hex_bad_digit() {
        assert_eq!(parse("#gg0000"), Err(ColorError::InvalidHex("gg0000".into())));
    }

    // ── Functions ────────────────────────────────────────────────────────

    #[test]
    fn rgb_function() {
        assert_eq!(parse("rgb(255, 0, 0)").unwrap().to_rgb8(), (255, 0, 0));
        assert_eq!(parse("rgb(255 0 0)").unwrap().to_rgb8(), (255, 0, 0));
    }

    #[test]
    fn rgba_function_alpha() {
        let c = parse("rgba(0, 0, 0, .5)").unwrap();
        assert!((c.alpha() - 0.5).abs() < 1e-12);
        let d = parse("rgb(0 0 0 / 25%)").unwrap();
        assert!((d.alpha() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn rgb_percentages() {
        assert_eq!(parse("rgb(100%, 50%, 0%)").unwrap().to_rgb8(), (255, 128, 0));
    }

    #[test]
    fn hsl_function() {
        assert_eq!(parse("hsl(120, 100%, 50%)").unwrap().to_rgb8(), (0, 255, 0));
        assert_eq!(parse("HSLA(240, 100, 50, 1)").unwrap().to_rgb8(), (0, 0, 255));
    }

    #[test]
    fn function_wrong_arity() {
        assert!(matches!(parse("rgb(1, 2)"), Err(ColorError::InvalidFunction(_))));
    }

    #[test]
    fn function_garbage_argument() {
        assert!(matches!(parse("rgb(1, x, 2)"), Err(ColorError::InvalidFunction(_))));
    }

    // ── Names ────────────────────────────────────────────────────────────

    #[test]
    fn named_colors() {
        assert_eq!(parse("white").unwrap().to_rgb8(), (255, 255, 255));
        assert_eq!(parse("  Navy ").unwrap().to_rgb8(), (0, 0, 128));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(parse("primary"), Err(ColorError::Unknown("primary".into())));
    }

    #[test]
    fn empty_is_unknown() {
        assert_eq!(parse(""), Err(ColorError::Unknown(String::new())));
    }
}
