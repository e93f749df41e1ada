//! Parsed color expressions.
//!
//! A [`ColorExpression`] is an optional [`Source`] followed by an ordered
//! list of [`Operation`]s. Operations apply strictly left to right, each
//! consuming the color produced by the one before it.
//!
//! Every node prints back as canonical source text through [`fmt::Display`],
//! so `parse(expr.to_string())` reproduces `expr`.

use std::fmt;

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// A numeric literal as written: `10`, `-2.5`, `.5`, `10%`.
///
/// Percentages are not converted at parse time; the operation consuming
/// the number decides what `%` means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    pub value: f64,
    pub is_percentage: bool,
}

impl Number {
    /// A plain number.
    #[must_use]
    pub const fn plain(value: f64) -> Self {
        Self { value, is_percentage: false }
    }

    /// A percentage (`value%`).
    #[must_use]
    pub const fn percent(value: f64) -> Self {
        Self { value, is_percentage: true }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.is_percentage {
            f.write_str("%")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Channel adjustments
// ---------------------------------------------------------------------------

/// A scalar color dimension an operation can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Opacity, 0–1.
    Alpha,
    /// Hue angle, 0–360.
    Hue,
    /// HWB blackness, 0–100.
    Blackness,
    /// HSL lightness, 0–100.
    Lightness,
    /// HSL saturation, 0–100.
    Saturation,
    /// HWB whiteness, 0–100.
    Whiteness,
}

impl Channel {
    /// The long operation name (`alpha`, `hue`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Hue => "hue",
            Self::Blackness => "blackness",
            Self::Lightness => "lightness",
            Self::Saturation => "saturation",
            Self::Whiteness => "whiteness",
        }
    }
}

/// How an adjustment combines with the current channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifier {
    /// No sign: set the channel to the value.
    #[default]
    Set,
    /// `+`: add the value to the current channel.
    Add,
    /// `-`: subtract the value from the current channel.
    Subtract,
}

impl Modifier {
    /// Combine the current channel value with `amount`.
    #[must_use]
    pub fn apply(self, current: f64, amount: f64) -> f64 {
        match self {
            Self::Set => amount,
            Self::Add => current + amount,
            Self::Subtract => current - amount,
        }
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where an expression's starting color comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// `#rrggbb` and friends. Digits only; the `#` is not stored.
    Hex(String),
    /// A bare identifier resolved against the theme palette.
    Token(String),
    /// `rgb(r g b)` / `rgba(r g b a)`.
    Rgb {
        r: Number,
        g: Number,
        b: Number,
        a: Option<Number>,
    },
    /// `hsl(h s l)` / `hsla(h s l a)`.
    Hsl {
        h: Number,
        s: Number,
        l: Number,
        a: Option<Number>,
    },
    /// `color(...)` wrapping a full expression.
    Nested(Box<ColorExpression>),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(digits) => write!(f, "#{digits}"),
            Self::Token(name) => f.write_str(name),
            Self::Rgb { r, g, b, a: None } => write!(f, "rgb({r}, {g}, {b})"),
            Self::Rgb { r, g, b, a: Some(a) } => write!(f, "rgba({r}, {g}, {b}, {a})"),
            Self::Hsl { h, s, l, a: None } => write!(f, "hsl({h}, {s}, {l})"),
            Self::Hsl { h, s, l, a: Some(a) } => write!(f, "hsla({h}, {s}, {l}, {a})"),
            Self::Nested(expr) => write!(f, "color({expr})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Color predicate tested by `if(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    IsDark,
    IsLight,
}

impl Predicate {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IsDark => "isDark",
            Self::IsLight => "isLight",
        }
    }
}

/// One step of a color pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `alpha(...)`, `hue(...)`, `blackness(...)`, `lightness(...)`,
    /// `saturation(...)`, `whiteness(...)` and their one-letter forms.
    Adjust {
        channel: Channel,
        modifier: Modifier,
        value: Number,
    },
    /// `blend(color, n%)`: mix toward `color`, keeping the current alpha.
    Blend { color: Source, amount: Number },
    /// `blenda(color, n%)`: mix toward `color`, alpha included.
    Blenda { color: Source, amount: Number },
    /// `shade(n%)`: blend toward black.
    Shade(Number),
    /// `tint(n%)`: blend toward white.
    Tint(Number),
    /// `contrast(n%?)`: move toward a readable black/white (default 100%).
    Contrast(Option<Number>),
    /// `if(predicate then else?)`.
    If {
        predicate: Predicate,
        then: Box<ColorExpression>,
        otherwise: Option<Box<ColorExpression>>,
    },
    /// `ifDark(leaf)`: `if(isDark leaf)`.
    IfDark(Box<ColorExpression>),
    /// `ifLight(leaf)`: `if(isLight leaf)`.
    IfLight(Box<ColorExpression>),
}

impl Operation {
    /// The operation's keyword, for logs and diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Adjust { channel, .. } => channel.name(),
            Self::Blend { .. } => "blend",
            Self::Blenda { .. } => "blenda",
            Self::Shade(_) => "shade",
            Self::Tint(_) => "tint",
            Self::Contrast(_) => "contrast",
            Self::If { .. } => "if",
            Self::IfDark(_) => "ifDark",
            Self::IfLight(_) => "ifLight",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adjust { channel, modifier, value } => {
                let sign = match modifier {
                    Modifier::Set => "",
                    Modifier::Add => "+",
                    Modifier::Subtract => "-",
                };
                write!(f, "{}({sign}{value})", channel.name())
            }
            Self::Blend { color, amount } => write!(f, "blend({color}, {amount})"),
            Self::Blenda { color, amount } => write!(f, "blenda({color}, {amount})"),
            Self::Shade(amount) => write!(f, "shade({amount})"),
            Self::Tint(amount) => write!(f, "tint({amount})"),
            Self::Contrast(None) => f.write_str("contrast()"),
            Self::Contrast(Some(amount)) => write!(f, "contrast({amount})"),
            Self::If { predicate, then, otherwise } => {
                write!(f, "if({} {}", predicate.name(), Leaf(then))?;
                if let Some(otherwise) = otherwise {
                    write!(f, " {}", Leaf(otherwise))?;
                }
                f.write_str(")")
            }
            Self::IfDark(leaf) => write!(f, "ifDark({})", Leaf(leaf)),
            Self::IfLight(leaf) => write!(f, "ifLight({})", Leaf(leaf)),
        }
    }
}

/// Prints a conditional branch. Single-element branches print bare; longer
/// ones are wrapped in `color(...)` so they re-parse as one leaf.
struct Leaf<'a>(&'a ColorExpression);

impl fmt::Display for Leaf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expr = self.0;
        let parts = usize::from(expr.source.is_some()) + expr.operations.len();
        if parts == 1 {
            write!(f, "{expr}")
        } else {
            write!(f, "color({expr})")
        }
    }
}

// ---------------------------------------------------------------------------
// ColorExpression
// ---------------------------------------------------------------------------

/// A compiled color program: a starting color and the steps applied to it.
///
/// An expression without a source is *relative*: it transforms whatever
/// color it is handed (the current color inside `if(...)` and `color(...)`,
/// or a caller-supplied base at the top level).
///
/// Immutable once parsed; evaluate it as often as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorExpression {
    pub source: Option<Source>,
    pub operations: Vec<Operation>,
}

impl ColorExpression {
    /// An expression with a source and no operations.
    #[must_use]
    pub const fn from_source(source: Source) -> Self {
        Self { source: Some(source), operations: Vec::new() }
    }

    /// A relative expression consisting of a single operation.
    #[must_use]
    pub fn from_operation(operation: Operation) -> Self {
        Self { source: None, operations: vec![operation] }
    }

    /// Whether this expression needs an incoming color to evaluate.
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        self.source.is_none()
    }
}

impl fmt::Display for ColorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if let Some(source) = &self.source {
            write!(f, "{source}")?;
            first = false;
        }
        for op in &self.operations {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
