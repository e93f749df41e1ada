//! Readable-contrast solver behind `contrast(n%)`.
//!
//! Pick the endpoint (white for dark colors, black for light ones) in the
//! source's own hue, then bisect whiteness/blackness between the source and
//! that endpoint for the least extreme color still clearing the target
//! ratio. `n%` then blends from that color toward the endpoint.

use log::{trace, warn};
use serde::Deserialize;

use crate::adapter::ColorLibrary;
use crate::ast::Channel;

/// Hard bound on bisection steps.
const MAX_ITERATIONS: usize = 64;

/// Tuning for the contrast search.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContrastOptions {
    /// Minimum WCAG ratio a candidate must exceed (AA body text: 4.5).
    pub min_ratio: f64,
    /// Search granularity on the 0–100 whiteness/blackness scale.
    pub step: f64,
}

impl Default for ContrastOptions {
    fn default() -> Self {
        Self { min_ratio: 4.5, step: 1.0 }
    }
}

/// Solve for a readable counterpart of `source` and blend it `percentage`
/// (0–100) of the way toward the black/white endpoint.
///
/// When `source` cannot reach `min_ratio` against its endpoint, the
/// endpoint itself is the starting point.
///
/// # Errors
///
/// Propagates the library's error from any construction, channel write or
/// mix.
pub fn contrast<L: ColorLibrary>(
    lib: &L,
    source: &L::Color,
    percentage: f64,
    options: &ContrastOptions,
) -> Result<L::Color, L::Error> {
    let hue = lib.channel(source, Channel::Hue);
    let alpha = lib.channel(source, Channel::Alpha);

    let endpoint = if lib.luminosity(source) < 0.5 { (100.0, 0.0) } else { (0.0, 100.0) };
    let max = lib.hwb(hue, endpoint.0, endpoint.1, alpha)?;
    let mut min = max.clone();

    if lib.contrast(source, &max) > options.min_ratio {
        let step = options.step;
        let mut lo = (lib.channel(source, Channel::Whiteness), lib.channel(source, Channel::Blackness));
        let mut hi = endpoint;
        let mut iterations = 0;

        while (hi.0 - lo.0).abs() > step || (hi.1 - lo.1).abs() > step {
            if iterations == MAX_ITERATIONS {
                warn!("contrast search stopped after {MAX_ITERATIONS} iterations (step {step})");
                break;
            }
            iterations += 1;

            let mid = (round_to((lo.0 + hi.0) / 2.0, step), round_to((lo.1 + hi.1) / 2.0, step));
            let candidate = lib.hwb(hue, mid.0, mid.1, alpha)?;
            let ratio = lib.contrast(source, &candidate);
            trace!("contrast: w={} b={} ratio={ratio:.3}", mid.0, mid.1);

            if ratio > options.min_ratio {
                hi = mid;
                min = candidate;
            } else {
                lo = mid;
            }
        }
    }

    let min_alpha = lib.channel(&min, Channel::Alpha);
    let opaque = lib.with_channel(&min, Channel::Alpha, 1.0)?;
    let mixed = lib.mix(&opaque, &max, percentage / 100.0)?;
    lib.with_channel(&mixed, Channel::Alpha, min_alpha)
}

/// Round to the nearest multiple of `step`. Non-positive steps disable
/// rounding.
fn round_to(value: f64, step: f64) -> f64 {
    if step > 0.0 && step.is_finite() {
        (value / step).round() * step
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Standard;
    use tinct_color::Color;

    fn solve(hex: &str, pct: f64) -> (Color, Color) {
        let lib = Standard;
        let source = lib.parse(hex).unwrap();
        let out = contrast(&lib, &source, pct, &ContrastOptions::default()).unwrap();
        (source, out)
    }

    // -- Search ---------------------------------------------------------------

    #[test]
    fn zero_percent_clears_threshold_on_dark_source() {
        let (source, out) = solve("#3366ff", 0.0);
        assert!(source.contrast(&out) > 4.5);
        // Lighter than the source, but not pure white.
        assert!(out.luminosity() > source.luminosity());
        assert_ne!(out, Color::WHITE);
    }

    #[test]
    fn zero_percent_clears_threshold_on_light_source() {
        let (source, out) = solve("#ffffff", 0.0);
        assert!(source.contrast(&out) > 4.5);
        assert_ne!(out, Color::BLACK);
    }

    #[test]
    fn full_percent_is_endpoint() {
        let (_, out) = solve("#3366ff", 100.0);
        assert_eq!(out, Color::WHITE);

        let (_, out) = solve("#eeeeee", 100.0);
        assert_eq!(out, Color::BLACK);
    }

    #[test]
    fn no_search_when_endpoint_is_not_enough() {
        // #777 against white is just under 4.5.
        let (source, out) = solve("#777777", 0.0);
        assert!(source.contrast(&Color::WHITE) <= 4.5);
        assert_eq!(out, Color::WHITE);
    }

    #[test]
    fn keeps_source_hue() {
        let (source, out) = solve("#3366ff", 0.0);
        assert!((out.hue() - source.hue()).abs() < 1.0);
    }

    #[test]
    fn keeps_source_alpha() {
        let lib = Standard;
        let source = lib.rgb(0.0, 0.0, 80.0, 0.4).unwrap();
        let out = contrast(&lib, &source, 50.0, &ContrastOptions::default()).unwrap();
        assert!((out.alpha() - 0.4).abs() < 1e-9);
    }

    // -- Options --------------------------------------------------------------

    #[test]
    fn stricter_ratio_moves_closer_to_endpoint() {
        let lib = Standard;
        let source = lib.parse("#202020").unwrap();
        let aa = contrast(&lib, &source, 0.0, &ContrastOptions::default()).unwrap();
        let aaa = contrast(&lib, &source, 0.0, &ContrastOptions { min_ratio: 7.0, step: 1.0 }).unwrap();
        assert!(source.contrast(&aaa) > 7.0);
        assert!(aaa.luminosity() > aa.luminosity());
    }

    #[test]
    fn degenerate_step_still_terminates() {
        let lib = Standard;
        let source = lib.parse("#000").unwrap();
        let opts = ContrastOptions { min_ratio: 4.5, step: 0.0 };
        let out = contrast(&lib, &source, 0.0, &opts).unwrap();
        assert!(source.contrast(&out) > 4.5);
    }

    #[test]
    fn round_to_step() {
        assert!((round_to(12.4, 1.0) - 12.0).abs() < f64::EPSILON);
        assert!((round_to(12.6, 5.0) - 15.0).abs() < f64::EPSILON);
        assert!((round_to(12.6, 0.0) - 12.6).abs() < f64::EPSILON);
    }
}
