//! Parse and evaluation errors.
//!
//! Parsing fails with a [`ParseError`] built once at the rightmost position
//! the parser reached. Evaluation fails with an [`EvalError`] that carries
//! the color library's own error untouched.

use std::fmt;

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A point in the input.
///
/// `offset` is a 0-indexed byte offset; `line` and `column` are 1-indexed,
/// with columns counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute line and column for a byte offset into `input`.
    ///
    /// Offsets past the end clamp to the end of input.
    #[must_use]
    pub fn locate(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = input[line_start..offset].chars().count() + 1;
        Self { offset, line, column }
    }
}

/// The input range an error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

// ---------------------------------------------------------------------------
// Expectations
// ---------------------------------------------------------------------------

/// Something the parser would have accepted at the failure position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expectation {
    /// Exact text, e.g. `"shade("`.
    Literal(&'static str),
    /// A character class, e.g. `[0-9]`.
    Class(&'static str),
    /// Any character.
    Any,
    /// End of input.
    End,
    /// A named construct.
    Other(&'static str),
}

impl Expectation {
    /// Human-readable form used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(text) => format!("\"{}\"", escape(text)),
            Self::Class(class) => (*class).to_string(),
            Self::Any => "any character".to_string(),
            Self::End => "end of input".to_string(),
            Self::Other(description) => (*description).to_string(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Escape control characters and quotes for display inside `"..."`.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// A syntax error at the deepest position the parser could reach.
///
/// `expected` lists every alternative that failed at that position, sorted
/// and de-duplicated, so the message names all the ways the input could
/// have continued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    expected: Vec<Expectation>,
    found: Option<String>,
    location: Span,
}

impl ParseError {
    /// Build the error for a failure at byte `offset` of `input`.
    pub(crate) fn new(input: &str, offset: usize, mut expected: Vec<Expectation>) -> Self {
        expected.sort_by_cached_key(Expectation::describe);
        expected.dedup();

        let found = input[offset.min(input.len())..].chars().next();
        let start = Position::locate(input, offset);
        let end = Position::locate(input, offset + found.map_or(0, char::len_utf8));
        let message = build_message(&expected, found);

        Self {
            message,
            expected,
            found: found.map(String::from),
            location: Span { start, end },
        }
    }

    /// `Expected A, B, or C but "x" found.`
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Everything that would have been accepted at the failure position.
    #[must_use]
    pub fn expected(&self) -> &[Expectation] {
        &self.expected
    }

    /// The character at the failure position, `None` at end of input.
    #[must_use]
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    /// Where the failure happened.
    #[must_use]
    pub const fn location(&self) -> Span {
        self.location
    }

    /// Multi-line diagnostic with the offending line and a caret:
    ///
    /// ```text
    /// error: Expected "%", "+", "-", ".", or [0-9] but ")" found.
    ///  --> 1:9
    ///   |
    ///   | rgba(1,2)
    ///   |         ^
    /// ```
    #[must_use]
    pub fn render(&self, input: &str) -> String {
        let start = self.location.start;
        let line_text = input.lines().nth(start.line - 1).unwrap_or("");
        let prefix: String = line_text.chars().take(start.column - 1).collect();
        let pad = " ".repeat(UnicodeWidthStr::width(prefix.as_str()));

        format!(
            "error: {}\n --> {}:{}\n  |\n  | {}\n  | {}^",
            self.message, start.line, start.column, line_text, pad
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}, column {})",
            self.message, self.location.start.line, self.location.start.column
        )
    }
}

impl std::error::Error for ParseError {}

fn build_message(expected: &[Expectation], found: Option<char>) -> String {
    let descriptions: Vec<String> = expected.iter().map(Expectation::describe).collect();
    let expected = match descriptions.as_slice() {
        [] => "nothing".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{a} or {b}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    };
    let found = found.map_or_else(
        || "end of input".to_string(),
        |c| format!("\"{}\"", escape(&c.to_string())),
    );
    format!("Expected {expected} but {found} found.")
}

// ---------------------------------------------------------------------------
// Evaluation errors
// ---------------------------------------------------------------------------

/// Failure while evaluating a parsed expression.
///
/// `E` is the color library's error type; it is passed through unchanged.
#[derive(Error, Debug)]
pub enum EvalError<E: std::error::Error + 'static> {
    /// A relative expression (no source color) was evaluated without a base.
    #[error("expression has no source color and no base color was given")]
    MissingSource,

    /// The color library rejected a step.
    #[error(transparent)]
    Color(E),
}

/// Either half of a one-shot parse + evaluate.
#[derive(Error, Debug)]
pub enum Error<E: std::error::Error + 'static> {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError<E>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn locate_first_line() {
        let pos = Position::locate("rgba(1,2)", 8);
        assert_eq!(pos, Position { offset: 8, line: 1, column: 9 });
    }

    #[test]
    fn locate_after_newline() {
        let pos = Position::locate("#fff\n  shade(", 7);
        assert_eq!(pos, Position { offset: 7, line: 2, column: 3 });
    }

    #[test]
    fn locate_counts_chars_not_bytes() {
        // "é" is two bytes but one column.
        let pos = Position::locate("é x", 3);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn locate_clamps_past_end() {
        let pos = Position::locate("abc", 99);
        assert_eq!(pos.offset, 3);
        assert_eq!(pos.column, 4);
    }

    #[test]
    fn message_lists_sorted_unique_expectations() {
        let err = ParseError::new(
            "x",
            0,
            vec![
                Expectation::Literal("b"),
                Expectation::Class("[0-9]"),
                Expectation::Literal("a"),
                Expectation::Literal("b"),
            ],
        );
        assert_eq!(err.message(), "Expected \"a\", \"b\", or [0-9] but \"x\" found.");
        assert_eq!(err.expected().len(), 3);
        assert_eq!(err.found(), Some("x"));
    }

    #[test]
    fn message_two_expectations() {
        let err = ParseError::new("", 0, vec![Expectation::End, Expectation::Literal(")")]);
        assert_eq!(err.message(), "Expected \")\" or end of input but end of input found.");
        assert_eq!(err.found(), None);
        assert_eq!(err.location().start, err.location().end);
    }

    #[test]
    fn span_covers_found_char() {
        let err = ParseError::new("ab", 1, vec![Expectation::Any]);
        assert_eq!(err.location().start.offset, 1);
        assert_eq!(err.location().end.offset, 2);
    }

    #[test]
    fn render_points_caret() {
        let err = ParseError::new("rgba(1,2)", 8, vec![Expectation::Class("[0-9]")]);
        let rendered = err.render("rgba(1,2)");
        let last = rendered.lines().last().unwrap();
        assert_eq!(last, "  |         ^");
    }

    #[test]
    fn render_aligns_wide_chars() {
        // Full-width characters take two terminal columns.
        let input = "色 x";
        let err = ParseError::new(input, "色 ".len(), vec![Expectation::End]);
        let last = err.render(input).lines().last().unwrap().to_string();
        assert_eq!(last, "  |    ^");
    }
}
