//! Recursive-descent parser for color expressions.
//!
//! # Grammar
//!
//! ```text
//! Start      := _ Expression _ EOF
//! Expression := Source? (_ Operation)*        at least one of either
//! Source     := "color(" _ Expression _ ")" | "#" [0-9a-fA-F]+
//!             | ("rgba(" | "rgb(" | "hsla(" | "hsl(") Channels ")"
//!             | Identifier
//! Channels   := _ Number _ Number _ Number (_ Number)? _
//! Operation  := ("alpha(" | "a(" | "hue(" | "h(" | ...) _ Modifier? Number _ ")"
//!             | ("shade(" | "tint(") _ Number _ ")"
//!             | ("blend(" | "blenda(") _ Source _ Number _ ")"
//!             | "contrast(" _ Number? _ ")"
//!             | "if(" _ Predicate _ Leaf (_ Leaf)? _ ")"
//!             | ("ifDark(" | "ifLight(") _ Leaf _ ")"
//! Leaf       := Source | Operation
//! Number     := ("+" | "-")? ([0-9]+ ("." [0-9]+)? | "." [0-9]+) "%"?
//! Identifier := [A-Za-z_-]+ !"("
//! _          := [ \t\r\n,]*
//! ```
//!
//! Whitespace and commas are interchangeable and never significant.
//!
//! # Error reporting
//!
//! Every rule backtracks on failure. Each failed terminal is recorded
//! against the position where it was tried; only the furthest position
//! survives. When the parse fails, the error names every expectation
//! recorded at that furthest position, which is usually the exact spot
//! where the input went wrong regardless of which alternative was tried
//! first.

use std::str::FromStr;

use crate::ast::{Channel, ColorExpression, Modifier, Number, Operation, Predicate, Source};
use crate::error::{Expectation, ParseError};

/// Nesting limit for `color(...)`, `blend(...)` and `if(...)` leaves.
const MAX_DEPTH: usize = 64;

/// Channel operations, long and short spellings.
const ADJUSTMENTS: [(&str, Channel); 12] = [
    ("alpha(", Channel::Alpha),
    ("a(", Channel::Alpha),
    ("hue(", Channel::Hue),
    ("h(", Channel::Hue),
    ("blackness(", Channel::Blackness),
    ("b(", Channel::Blackness),
    ("lightness(", Channel::Lightness),
    ("l(", Channel::Lightness),
    ("saturation(", Channel::Saturation),
    ("s(", Channel::Saturation),
    ("whiteness(", Channel::Whiteness),
    ("w(", Channel::Whiteness),
];

/// Parse a color expression.
///
/// # Errors
///
/// Returns a [`ParseError`] located at the furthest position the parser
/// reached, listing everything it would have accepted there.
///
/// # Examples
///
/// ```
/// use tinct_expr::parse;
///
/// let expr = parse("color(primary shade(10%))").unwrap();
/// assert_eq!(expr.to_string(), "color(primary shade(10%))");
///
/// let err = parse("rgba(1,2)").unwrap_err();
/// assert_eq!(err.location().start.column, 9);
/// ```
pub fn parse(input: &str) -> Result<ColorExpression, ParseError> {
    let mut parser = Parser::new(input);
    if let Some(expr) = parser.start() {
        return Ok(expr);
    }
    let err = ParseError::new(input, parser.max_fail_pos, parser.expected);
    log::debug!("failed to parse `{input}`: {err}");
    Err(err)
}

impl FromStr for ColorExpression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,

    /// Furthest position any terminal failed at.
    max_fail_pos: usize,
    /// Expectations recorded at `max_fail_pos`.
    expected: Vec<Expectation>,
    /// While > 0, failures are not recorded (lookahead).
    silent: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            max_fail_pos: 0,
            expected: Vec::new(),
            silent: 0,
        }
    }

    // -- Failure bookkeeping ------------------------------------------------

    fn fail(&mut self, expectation: Expectation) {
        if self.silent > 0 || self.pos < self.max_fail_pos {
            return;
        }
        if self.pos > self.max_fail_pos {
            self.max_fail_pos = self.pos;
            self.expected.clear();
        }
        self.expected.push(expectation);
    }

    // -- Terminals ----------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Match exact text, or record it as expected here.
    fn literal(&mut self, text: &'static str) -> bool {
        if self.rest().starts_with(text) {
            self.pos += text.len();
            true
        } else {
            self.fail(Expectation::Literal(text));
            false
        }
    }

    /// Consume one or more bytes of a class. Records the class at the
    /// position where matching stopped.
    fn one_or_more(&mut self, class: &'static str, accept: impl Fn(u8) -> bool) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        self.fail(Expectation::Class(class));
        self.pos > start
    }

    /// `[ \t\r\n,]*`, never recorded in expectations.
    fn separators(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | b',')) {
            self.pos += 1;
        }
    }

    // -- Rules --------------------------------------------------------------

    fn start(&mut self) -> Option<ColorExpression> {
        self.separators();
        let expr = self.expression()?;
        self.separators();
        if self.pos < self.input.len() {
            self.fail(Expectation::End);
            return None;
        }
        Some(expr)
    }

    fn expression(&mut self) -> Option<ColorExpression> {
        let source = self.source();
        let mut operations = Vec::new();
        loop {
            let save = self.pos;
            if source.is_some() || !operations.is_empty() {
                self.separators();
            }
            match self.operation() {
                Some(op) => operations.push(op),
                None => {
                    self.pos = save;
                    break;
                }
            }
        }

        if source.is_none() && operations.is_empty() {
            return None;
        }
        Some(ColorExpression { source, operations })
    }

    /// Guard recursive rules against unbounded nesting.
    fn descend(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            self.fail(Expectation::Other("shallower nesting"));
            return false;
        }
        self.depth += 1;
        true
    }

    fn source(&mut self) -> Option<Source> {
        let start = self.pos;

        if self.literal("color(") {
            if self.descend() {
                let nested = self.nested_expression();
                self.depth -= 1;
                if let Some(expr) = nested {
                    return Some(Source::Nested(Box::new(expr)));
                }
            }
            self.pos = start;
        }

        if self.literal("#") {
            let digits_start = self.pos;
            if self.one_or_more("[0-9a-fA-F]", |b| b.is_ascii_hexdigit()) {
                return Some(Source::Hex(self.input[digits_start..self.pos].to_string()));
            }
            self.pos = start;
        }

        for (keyword, is_rgb) in [("rgba(", true), ("rgb(", true), ("hsla(", false), ("hsl(", false)] {
            if !self.literal(keyword) {
                continue;
            }
            if let Some((x, y, z, a)) = self.channels() {
                return Some(if is_rgb {
                    Source::Rgb { r: x, g: y, b: z, a }
                } else {
                    Source::Hsl { h: x, s: y, l: z, a }
                });
            }
            self.pos = start;
        }

        self.identifier().map(Source::Token)
    }

    /// The inside of `color(...)`, through the closing paren.
    fn nested_expression(&mut self) -> Option<ColorExpression> {
        self.separators();
        let expr = self.expression()?;
        self.separators();
        self.literal(")").then_some(expr)
    }

    /// `_ Number _ Number _ Number (_ Number)? _ ")"`
    fn channels(&mut self) -> Option<(Number, Number, Number, Option<Number>)> {
        self.separators();
        let x = self.number()?;
        self.separators();
        let y = self.number()?;
        self.separators();
        let z = self.number()?;

        let save = self.pos;
        self.separators();
        let a = self.number();
        if a.is_none() {
            self.pos = save;
        }

        self.separators();
        self.literal(")").then_some((x, y, z, a))
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.pos;
        if !self.one_or_more("[A-Za-z_-]", |b| b.is_ascii_alphabetic() || b == b'_' || b == b'-') {
            return None;
        }

        // `name(` is a call, not a token.
        self.silent += 1;
        let is_call = self.literal("(");
        self.silent -= 1;
        if is_call {
            self.pos = start;
            return None;
        }

        Some(self.input[start..self.pos].to_string())
    }

    fn number(&mut self) -> Option<Number> {
        let start = self.pos;

        if !self.literal("+") {
            self.literal("-");
        }

        let integral = self.one_or_more("[0-9]", |b| b.is_ascii_digit());
        if integral {
            let before_fraction = self.pos;
            if self.literal(".") && !self.one_or_more("[0-9]", |b| b.is_ascii_digit()) {
                self.pos = before_fraction;
            }
        } else if !(self.literal(".") && self.one_or_more("[0-9]", |b| b.is_ascii_digit())) {
            self.pos = start;
            return None;
        }

        let end = self.pos;
        let is_percentage = self.literal("%");
        let value = self.input[start..end].parse().ok();
        if value.is_none() {
            self.pos = start;
        }
        value.map(|value| Number { value, is_percentage })
    }

    fn modifier(&mut self) -> Modifier {
        if self.literal("+") {
            Modifier::Add
        } else if self.literal("-") {
            Modifier::Subtract
        } else {
            Modifier::Set
        }
    }

    fn operation(&mut self) -> Option<Operation> {
        let start = self.pos;

        for (keyword, channel) in ADJUSTMENTS {
            if !self.literal(keyword) {
                continue;
            }
            self.separators();
            let modifier = self.modifier();
            if let Some(value) = self.number() {
                self.separators();
                if self.literal(")") {
                    return Some(Operation::Adjust { channel, modifier, value });
                }
            }
            self.pos = start;
        }

        for keyword in ["shade(", "tint("] {
            if !self.literal(keyword) {
                continue;
            }
            if let Some(amount) = self.single_number() {
                return Some(if keyword == "shade(" {
                    Operation::Shade(amount)
                } else {
                    Operation::Tint(amount)
                });
            }
            self.pos = start;
        }

        for keyword in ["blend(", "blenda("] {
            if !self.literal(keyword) {
                continue;
            }
            if let Some((color, amount)) = self.blend_args() {
                return Some(if keyword == "blend(" {
                    Operation::Blend { color, amount }
                } else {
                    Operation::Blenda { color, amount }
                });
            }
            self.pos = start;
        }

        if self.literal("contrast(") {
            self.separators();
            let amount = self.number();
            self.separators();
            if self.literal(")") {
                return Some(Operation::Contrast(amount));
            }
            self.pos = start;
        }

        if self.literal("if(") {
            if let Some(op) = self.conditional() {
                return Some(op);
            }
            self.pos = start;
        }

        for keyword in ["ifDark(", "ifLight("] {
            if !self.literal(keyword) {
                continue;
            }
            self.separators();
            if let Some(leaf) = self.leaf() {
                self.separators();
                if self.literal(")") {
                    let leaf = Box::new(leaf);
                    return Some(if keyword == "ifDark(" {
                        Operation::IfDark(leaf)
                    } else {
                        Operation::IfLight(leaf)
                    });
                }
            }
            self.pos = start;
        }

        None
    }

    /// `_ Number _ ")"`
    fn single_number(&mut self) -> Option<Number> {
        self.separators();
        let amount = self.number()?;
        self.separators();
        self.literal(")").then_some(amount)
    }

    /// `_ Source _ Number _ ")"`
    fn blend_args(&mut self) -> Option<(Source, Number)> {
        if !self.descend() {
            return None;
        }
        self.separators();
        let color = self.source();
        self.depth -= 1;
        let color = color?;
        self.separators();
        let amount = self.number()?;
        self.separators();
        self.literal(")").then_some((color, amount))
    }

    /// `_ Predicate _ Leaf (_ Leaf)? _ ")"`
    fn conditional(&mut self) -> Option<Operation> {
        self.separators();
        let predicate = if self.literal("isDark") {
            Predicate::IsDark
        } else if self.literal("isLight") {
            Predicate::IsLight
        } else {
            return None;
        };

        self.separators();
        let then = self.leaf()?;

        let save = self.pos;
        self.separators();
        let otherwise = self.leaf();
        if otherwise.is_none() {
            self.pos = save;
        }

        self.separators();
        self.literal(")").then(|| Operation::If {
            predicate,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        })
    }

    /// `Source | Operation`, as a one-element expression.
    fn leaf(&mut self) -> Option<ColorExpression> {
        if !self.descend() {
            return None;
        }
        let leaf = match self.source() {
            Some(source) => Some(ColorExpression::from_source(source)),
            None => self.operation().map(ColorExpression::from_operation),
        };
        self.depth -= 1;
        leaf
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
