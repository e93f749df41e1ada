//! Evaluation of parsed expressions.
//!
//! An [`Evaluator`] pairs a [`ThemeContext`] (for tokens) with a
//! [`ColorLibrary`] (for the math) and folds an expression's operations
//! over its source color, left to right.

use log::{debug, trace};

use crate::adapter::ColorLibrary;
use crate::ast::{Channel, ColorExpression, Number, Operation, Predicate, Source};
use crate::context::ThemeContext;
use crate::contrast::{self, ContrastOptions};
use crate::error::EvalError;

/// Palette category consulted for bare identifiers.
pub const COLORS: &str = "colors";

/// Evaluation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalOptions {
    pub contrast: ContrastOptions,
}

/// Evaluates [`ColorExpression`]s against one theme and one color library.
///
/// Holds no per-evaluation state; share it freely.
#[derive(Debug, Clone)]
pub struct Evaluator<C, L> {
    ctx: C,
    lib: L,
    options: EvalOptions,
}

type Result<T, E> = std::result::Result<T, EvalError<E>>;

impl<C: ThemeContext, L: ColorLibrary> Evaluator<C, L> {
    pub fn new(ctx: C, lib: L) -> Self {
        Self { ctx, lib, options: EvalOptions::default() }
    }

    #[must_use]
    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn library(&self) -> &L {
        &self.lib
    }

    pub const fn context(&self) -> &C {
        &self.ctx
    }

    /// Evaluate an expression that names its own source.
    ///
    /// # Errors
    ///
    /// [`EvalError::MissingSource`] for a relative expression, otherwise
    /// whatever the color library rejects.
    pub fn evaluate(&self, expr: &ColorExpression) -> Result<L::Color, L::Error> {
        let Some(source) = &expr.source else {
            return Err(EvalError::MissingSource);
        };
        let start = self.resolve_source(source, None)?;
        self.fold(&expr.operations, start)
    }

    /// Evaluate with `base` as the incoming color.
    ///
    /// A relative expression transforms `base`; an expression with its own
    /// source ignores it except where nested relative parts refer back to
    /// the current color.
    ///
    /// # Errors
    ///
    /// Whatever the color library rejects.
    pub fn evaluate_from(&self, expr: &ColorExpression, base: L::Color) -> Result<L::Color, L::Error> {
        self.run(expr, base)
    }

    fn run(&self, expr: &ColorExpression, incoming: L::Color) -> Result<L::Color, L::Error> {
        let start = match &expr.source {
            Some(source) => self.resolve_source(source, Some(&incoming))?,
            None => incoming,
        };
        self.fold(&expr.operations, start)
    }

    fn fold(&self, operations: &[Operation], start: L::Color) -> Result<L::Color, L::Error> {
        operations.iter().try_fold(start, |color, op| {
            let next = self.apply(op, color)?;
            trace!("{op} -> {}", self.lib.to_css(&next));
            Ok(next)
        })
    }

    // -- Sources ------------------------------------------------------------

    fn resolve_source(&self, source: &Source, incoming: Option<&L::Color>) -> Result<L::Color, L::Error> {
        let lib = &self.lib;
        match source {
            Source::Hex(digits) => lib.parse(&format!("#{digits}")).map_err(EvalError::Color),
            Source::Token(name) => {
                let color = if let Some(value) = self.ctx.resolve(COLORS, name) {
                    lib.parse(&value)
                } else {
                    debug!("token `{name}` not in theme, trying it as a color name");
                    lib.parse(name)
                };
                color.map_err(EvalError::Color)
            }
            Source::Rgb { r, g, b, a } => lib
                .rgb(rgb_channel(*r), rgb_channel(*g), rgb_channel(*b), alpha_value(*a))
                .map_err(EvalError::Color),
            Source::Hsl { h, s, l, a } => lib
                .hsl(h.value, s.value, l.value, alpha_value(*a))
                .map_err(EvalError::Color),
            Source::Nested(expr) => match incoming {
                Some(color) => self.run(expr, color.clone()),
                None => self.evaluate(expr),
            },
        }
    }

    // -- Operations ---------------------------------------------------------

    fn apply(&self, op: &Operation, color: L::Color) -> Result<L::Color, L::Error> {
        let lib = &self.lib;
        match op {
            Operation::Adjust { channel, modifier, value } => {
                let amount = if *channel == Channel::Alpha && value.is_percentage {
                    value.value / 100.0
                } else {
                    value.value
                };
                let current = lib.channel(&color, *channel);
                lib.with_channel(&color, *channel, modifier.apply(current, amount))
                    .map_err(EvalError::Color)
            }
            Operation::Shade(amount) => {
                let black = lib.rgb(0.0, 0.0, 0.0, 1.0).map_err(EvalError::Color)?;
                self.blend(&color, &black, *amount)
            }
            Operation::Tint(amount) => {
                let white = lib.rgb(255.0, 255.0, 255.0, 1.0).map_err(EvalError::Color)?;
                self.blend(&color, &white, *amount)
            }
            Operation::Blend { color: target, amount } => {
                let target = self.resolve_source(target, Some(&color))?;
                self.blend(&color, &target, *amount)
            }
            Operation::Blenda { color: target, amount } => {
                let target = self.resolve_source(target, Some(&color))?;
                lib.mix(&color, &target, amount.value / 100.0).map_err(EvalError::Color)
            }
            Operation::Contrast(amount) => {
                let percentage = amount.map_or(100.0, |n| n.value);
                contrast::contrast(lib, &color, percentage, &self.options.contrast).map_err(EvalError::Color)
            }
            Operation::If { predicate, then, otherwise } => {
                if self.test(*predicate, &color) {
                    self.run(then, color)
                } else if let Some(otherwise) = otherwise {
                    self.run(otherwise, color)
                } else {
                    Ok(color)
                }
            }
            Operation::IfDark(leaf) => {
                if lib.is_dark(&color) {
                    self.run(leaf, color)
                } else {
                    Ok(color)
                }
            }
            Operation::IfLight(leaf) => {
                if lib.is_light(&color) {
                    self.run(leaf, color)
                } else {
                    Ok(color)
                }
            }
        }
    }

    /// Mix toward `target` at full opacity, then put the original alpha back.
    fn blend(&self, color: &L::Color, target: &L::Color, amount: Number) -> Result<L::Color, L::Error> {
        let lib = &self.lib;
        let alpha = lib.channel(color, Channel::Alpha);
        let opaque = lib.with_channel(color, Channel::Alpha, 1.0).map_err(EvalError::Color)?;
        let mixed = lib.mix(&opaque, target, amount.value / 100.0).map_err(EvalError::Color)?;
        lib.with_channel(&mixed, Channel::Alpha, alpha).map_err(EvalError::Color)
    }

    fn test(&self, predicate: Predicate, color: &L::Color) -> bool {
        match predicate {
            Predicate::IsDark => self.lib.is_dark(color),
            Predicate::IsLight => self.lib.is_light(color),
        }
    }
}

/// `rgb()` channel: percentages map 0–100% onto 0–255.
fn rgb_channel(n: Number) -> f64 {
    if n.is_percentage { n.value * 255.0 / 100.0 } else { n.value }
}

/// Alpha argument: absent is opaque, percentages map onto 0–1.
fn alpha_value(n: Option<Number>) -> f64 {
    match n {
        None => 1.0,
        Some(n) if n.is_percentage => n.value / 100.0,
        Some(n) => n.value,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use tinct_color::{Color, ColorError};

    use super::*;
    use crate::adapter::Standard;
    use crate::context::EmptyContext;
    use crate::parser::parse;

    fn palette() -> HashMap<String, String> {
        HashMap::from([
            ("primary".to_string(), "#3366ff".to_string()),
            ("shades".to_string(), "#808080".to_string()),
            ("surface".to_string(), "rgba(0, 0, 0, 0.5)".to_string()),
        ])
    }

    fn eval(input: &str) -> Color {
        let evaluator = Evaluator::new(palette(), Standard);
        evaluator.evaluate(&parse(input).unwrap()).unwrap()
    }

    fn eval_err(input: &str) -> EvalError<ColorError> {
        let evaluator = Evaluator::new(palette(), Standard);
        evaluator.evaluate(&parse(input).unwrap()).unwrap_err()
    }

    // -- Sources --------------------------------------------------------------

    #[test]
    fn hex_literal() {
        assert_eq!(eval("#ff0000").to_string(), "rgb(255, 0, 0)");
    }

    #[test]
    fn rgba_literal() {
        assert_eq!(eval("rgba(255,0,0,.5)").to_string(), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn rgb_percent_channels() {
        assert_eq!(eval("rgb(100%, 0%, 50%)").to_rgb8(), (255, 0, 128));
    }

    #[test]
    fn alpha_argument_as_percentage() {
        assert!((eval("rgba(0, 0, 0, 25%)").alpha() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn hsl_literal() {
        assert_eq!(eval("hsl(120, 100%, 50%)").to_rgb8(), (0, 255, 0));
    }

    #[test]
    fn token_resolves_through_theme() {
        assert_eq!(eval("color(primary)").to_hex(), "#3366ff");
        assert_eq!(eval("primary").to_hex(), "#3366ff");
    }

    #[test]
    fn theme_value_may_be_css_function() {
        assert!((eval("surface").alpha() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unresolved_token_falls_back_to_named_color() {
        assert_eq!(eval("rebeccapurple").to_hex(), "#663399");
    }

    #[test]
    fn unknown_token_is_library_error() {
        let err = eval_err("nosuchcolor");
        assert!(matches!(err, EvalError::Color(ColorError::Unknown(name)) if name == "nosuchcolor"));
    }

    #[test]
    fn malformed_hex_is_library_error() {
        let err = eval_err("#12345 shade(10%)");
        assert!(matches!(err, EvalError::Color(ColorError::InvalidHex(_))));
    }

    // -- Operations -----------------------------------------------------------

    #[test]
    fn alpha_percentage() {
        assert_eq!(eval("rgb(0,0,0) alpha(50%)").to_string(), "rgba(0, 0, 0, 0.5)");
    }

    #[test]
    fn alpha_plain_number() {
        assert!((eval("#000 alpha(0.25)").alpha() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn relative_hue() {
        assert_eq!(eval("hsl(0, 100%, 50%) hue(+120)").to_rgb8(), (0, 255, 0));
        assert_eq!(eval("hsl(0, 100%, 50%) h(-120)").to_rgb8(), (0, 0, 255));
    }

    #[test]
    fn lightness_percent_flag_is_cosmetic() {
        assert_eq!(eval("#000 lightness(50)"), eval("#000 lightness(50%)"));
    }

    #[test]
    fn whiteness_and_blackness() {
        let c = eval("#ff0000 whiteness(20) blackness(+10)");
        assert!((c.whiteness() - 20.0).abs() < 1e-6);
        assert!((c.blackness() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn operations_apply_left_to_right() {
        // Clamping at 0 makes the order observable.
        let a = eval("rgba(255, 255, 255, 0.1) alpha(-20%) alpha(+10%)");
        let b = eval("rgba(255, 255, 255, 0.1) alpha(+10%) alpha(-20%)");
        assert!((a.alpha() - 0.1).abs() < 1e-9);
        assert!(b.alpha().abs() < 1e-9);
    }

    #[test]
    fn shade_and_tint_are_blends() {
        assert_eq!(eval("primary shade(10%)"), eval("primary blend(#000000, 10%)"));
        assert_eq!(eval("primary tint(25%)"), eval("primary blend(#ffffff, 25%)"));
    }

    #[test]
    fn shade_full_is_black() {
        assert_eq!(eval("primary shade(100%)").to_rgb8(), (0, 0, 0));
    }

    #[test]
    fn blend_keeps_alpha_blenda_mixes_it() {
        let blend = eval("rgba(255, 0, 0, 0.5) blend(#0000ff, 50%)");
        let blenda = eval("rgba(255, 0, 0, 0.5) blenda(#0000ff, 50%)");
        assert!((blend.alpha() - 0.5).abs() < 1e-9);
        assert!((blenda.alpha() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn blend_target_can_be_relative() {
        // color(shade(50%)) is taken relative to the current color.
        let c = eval("#ffffff blend(color(shade(50%)), 100%)");
        assert_eq!(c, eval("#ffffff shade(50%)"));
    }

    #[test]
    fn contrast_default_is_endpoint() {
        assert_eq!(eval("primary contrast()"), Color::WHITE);
        assert_eq!(eval("#eeeeee contrast()"), Color::BLACK);
    }

    #[test]
    fn contrast_zero_is_readable() {
        let source = eval("primary");
        let out = eval("primary contrast(0%)");
        assert!(source.contrast(&out) > 4.5);
    }

    #[test]
    fn contrast_options_are_used() {
        let options = EvalOptions { contrast: ContrastOptions { min_ratio: 7.0, step: 1.0 } };
        let evaluator = Evaluator::new(palette(), Standard).with_options(options);
        let expr = parse("#202020 contrast(0%)").unwrap();
        let out = evaluator.evaluate(&expr).unwrap();
        assert!(eval("#202020").contrast(&out) > 7.0);
    }

    // -- Conditionals ---------------------------------------------------------

    #[test]
    fn if_picks_branch() {
        assert_eq!(eval("#000 if(isDark #fff #f00)"), Color::WHITE);
        assert_eq!(eval("#fff if(isDark #fff #f00)").to_rgb8(), (255, 0, 0));
        assert_eq!(eval("#fff if(isLight #000)"), Color::BLACK);
    }

    #[test]
    fn if_without_else_passes_through() {
        assert_eq!(eval("#fff if(isDark #f00)"), Color::WHITE);
    }

    #[test]
    fn if_leaf_is_relative_to_current() {
        assert_eq!(eval("#000 if(isDark tint(100%) shade(10%))"), Color::WHITE);
        assert_eq!(
            eval("shades if(isDark color(shades tint(10%)) color(shades shade(10%)))"),
            eval("shades shade(10%)")
        );
    }

    #[test]
    fn if_dark_if_light_shorthands() {
        assert_eq!(eval("#fff ifDark(tint(10%))"), Color::WHITE);
        assert_eq!(eval("#000 ifDark(tint(100%))"), Color::WHITE);
        assert_eq!(eval("#fff ifLight(shade(100%))"), Color::BLACK);
    }

    // -- Relative expressions -------------------------------------------------

    #[test]
    fn relative_top_level_needs_base() {
        assert!(matches!(eval_err("shade(10%)"), EvalError::MissingSource));
        assert!(matches!(eval_err("color(tint(10%))"), EvalError::MissingSource));
    }

    #[test]
    fn evaluate_from_supplies_base() {
        let evaluator = Evaluator::new(EmptyContext, Standard);
        let expr = parse("if(isDark tint(100%) shade(100%))").unwrap();
        assert_eq!(evaluator.evaluate_from(&expr, Color::BLACK).unwrap(), Color::WHITE);
        assert_eq!(evaluator.evaluate_from(&expr, Color::WHITE).unwrap(), Color::BLACK);
    }

    #[test]
    fn evaluate_from_prefers_own_source() {
        let evaluator = Evaluator::new(EmptyContext, Standard);
        let expr = parse("#ff0000").unwrap();
        assert_eq!(evaluator.evaluate_from(&expr, Color::BLACK).unwrap().to_rgb8(), (255, 0, 0));
    }

    // -- Properties -----------------------------------------------------------

    #[test]
    fn evaluation_is_deterministic() {
        let evaluator = Evaluator::new(palette(), Standard);
        let expr = parse("primary contrast(30%) blend(shades, 20%) alpha(-10%)").unwrap();
        let first = evaluator.evaluate(&expr).unwrap();
        let second = evaluator.evaluate(&expr).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ColorExpression>();
        assert_send_sync::<Evaluator<HashMap<String, String>, Standard>>();
    }
}
