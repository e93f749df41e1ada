//! Theme palettes — named colors that expressions refer to by token.
//!
//! A theme is a flat map from token name to a color literal the standard
//! library can parse (`#3366ff`, `rebeccapurple`, `rgba(0, 0, 0, .5)`).
//! On disk it is TOML:
//!
//! ```toml
//! name = "ocean"
//! dark = true
//!
//! [colors]
//! primary = "#3aa6ff"
//! background = "#0b1e2d"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinct_color::{Color, ColorError};
use tinct_expr::ThemeContext;
use tinct_expr::eval::COLORS;

/// Errors loading or checking a theme.
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid theme TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("theme color `{name}` is not a valid color: {source}")]
    InvalidColor {
        name: String,
        #[source]
        source: ColorError,
    },

    #[error("unknown builtin theme `{0}`")]
    UnknownBuiltin(String),
}

/// A named palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Whether the palette is meant for a dark background.
    #[serde(default)]
    pub dark: bool,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl Theme {
    /// Build a theme from `(token, literal)` pairs.
    #[must_use]
    pub fn new(name: &str, dark: bool, colors: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            dark,
            colors: colors
                .iter()
                .map(|&(token, value)| (token.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Parse and validate a theme from TOML text.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Parse`] for malformed TOML, [`ThemeError::InvalidColor`]
    /// for a palette entry the color library rejects.
    pub fn from_toml_str(s: &str) -> Result<Self, ThemeError> {
        let theme: Self = toml::from_str(s)?;
        theme.validate()?;
        Ok(theme)
    }

    /// Load and validate a theme file.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Read`] when the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let theme = Self::from_toml_str(&content)?;
        info!("loaded theme `{}` ({} colors) from {}", theme.name, theme.colors.len(), path.display());
        Ok(theme)
    }

    /// Check that every palette entry parses as a color.
    ///
    /// # Errors
    ///
    /// [`ThemeError::InvalidColor`] naming the first bad entry.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (name, value) in &self.colors {
            Color::parse(value).map_err(|source| ThemeError::InvalidColor {
                name: name.clone(),
                source,
            })?;
        }
        debug!("theme `{}` validated", self.name);
        Ok(())
    }

    /// The raw literal for `token`.
    #[must_use]
    pub fn color(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(String::as_str)
    }
}

/// Only the `colors` category exists; anything else resolves to nothing.
impl ThemeContext for Theme {
    fn resolve(&self, category: &str, name: &str) -> Option<String> {
        if category == COLORS {
            self.color(name).map(str::to_string)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OCEAN: &str = r##"
name = "ocean"
dark = true

[colors]
primary = "#3aa6ff"
background = "rgb(11, 30, 45)"
"##;

    // ── Parsing ─────────────────────────────────────────────────

    #[test]
    fn parses_toml() {
        let theme = Theme::from_toml_str(OCEAN).unwrap();
        assert_eq!(theme.name, "ocean");
        assert!(theme.dark);
        assert_eq!(theme.color("primary"), Some("#3aa6ff"));
        assert_eq!(theme.colors.len(), 2);
    }

    #[test]
    fn dark_and_colors_default() {
        let theme = Theme::from_toml_str("name = \"bare\"").unwrap();
        assert!(!theme.dark);
        assert!(theme.colors.is_empty());
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(Theme::from_toml_str("name = "), Err(ThemeError::Parse(_))));
    }

    #[test]
    fn rejects_bad_color() {
        let err = Theme::from_toml_str("name = \"x\"\n[colors]\nprimary = \"#12\"\n").unwrap_err();
        match err {
            ThemeError::InvalidColor { name, source } => {
                assert_eq!(name, "primary");
                assert_eq!(source, ColorError::InvalidHex("12".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn load_missing_file() {
        let err = Theme::load("/nonexistent/tinct/theme.toml").unwrap_err();
        assert!(matches!(err, ThemeError::Read { .. }));
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("tinct-theme-{}.toml", std::process::id()));
        fs::write(&path, OCEAN).unwrap();
        let theme = Theme::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(theme.name, "ocean");
    }

    // ── Context ─────────────────────────────────────────────────

    #[test]
    fn resolves_only_colors_category() {
        let theme = Theme::from_toml_str(OCEAN).unwrap();
        assert_eq!(theme.resolve("colors", "primary").as_deref(), Some("#3aa6ff"));
        assert_eq!(theme.resolve("spacing", "primary"), None);
        assert_eq!(theme.resolve("colors", "missing"), None);
    }

    #[test]
    fn drives_evaluation() {
        let theme = Theme::from_toml_str(OCEAN).unwrap();
        let css = tinct_expr::render("background contrast()", &theme).unwrap();
        assert_eq!(css, "rgb(255, 255, 255)");
    }
}
