//! # tinct-expr — Color Expression Language
//!
//! Parses small color programs like `color(primary shade(10%))` or
//! `if(isDark tint(10%) shade(10%))` and evaluates them against a theme
//! palette.
//!
//! # Architecture
//!
//! ```text
//! "primary blend(#000, 20%) contrast()"
//!     │
//!     ▼
//! parser.rs:   recursive descent, rightmost-failure diagnostics
//!     │
//!     ▼
//! ast.rs:      ColorExpression { source, operations }
//!     │
//!     ▼
//! eval.rs:     fold operations left to right
//!     │          ├─ context.rs:  ThemeContext resolves `primary`
//!     │          ├─ adapter.rs:  ColorLibrary does the math
//!     │          └─ contrast.rs: WCAG search for contrast(n%)
//!     ▼
//! Color
//! ```
//!
//! Parsed expressions are immutable and can be evaluated any number of
//! times, against any context, from any thread.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! let theme = HashMap::from([("primary".to_string(), "#3366ff".to_string())]);
//! let css = tinct_expr::render("color(primary shade(100%))", &theme).unwrap();
//! assert_eq!(css, "rgb(0, 0, 0)");
//! ```

pub mod adapter;
pub mod ast;
pub mod context;
pub mod contrast;
pub mod error;
pub mod eval;
pub mod parser;

use tinct_color::{Color, ColorError};

pub use adapter::{ColorLibrary, Standard};
pub use ast::{Channel, ColorExpression, Modifier, Number, Operation, Predicate, Source};
pub use context::{EmptyContext, ThemeContext};
pub use contrast::ContrastOptions;
pub use error::{Error, EvalError, Expectation, ParseError, Position, Span};
pub use eval::{EvalOptions, Evaluator};
pub use parser::parse;

/// Parse and evaluate `input` with the standard color library.
///
/// # Errors
///
/// [`Error::Parse`] for bad syntax, [`Error::Eval`] when evaluation fails.
pub fn eval_str<C: ThemeContext>(input: &str, ctx: C) -> Result<Color, Error<ColorError>> {
    let expr = parse(input)?;
    Ok(Evaluator::new(ctx, Standard).evaluate(&expr)?)
}

/// Parse, evaluate and format as `rgb(...)` / `rgba(...)`.
///
/// # Errors
///
/// Same as [`eval_str`].
pub fn render<C: ThemeContext>(input: &str, ctx: C) -> Result<String, Error<ColorError>> {
    eval_str(input, ctx).map(|color| Standard.to_css(&color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_named_color() {
        assert_eq!(render("red", EmptyContext).unwrap(), "rgb(255, 0, 0)");
    }

    #[test]
    fn eval_str_reports_parse_errors() {
        let err = eval_str("rgba(1,2)", EmptyContext).unwrap_err();
        let Error::Parse(parse) = err else {
            panic!("expected a parse error");
        };
        assert_eq!(parse.location().start.offset, 8);
    }

    #[test]
    fn eval_str_reports_eval_errors() {
        let err = eval_str("shade(10%)", EmptyContext).unwrap_err();
        assert!(matches!(err, Error::Eval(EvalError::MissingSource)));
        assert_eq!(
            err.to_string(),
            "expression has no source color and no base color was given"
        );
    }
}
