//! Command-line configuration.
//!
//! Loaded from TOML, by default at `~/.config/tinct/config.toml`. Every
//! field is optional:
//!
//! ```toml
//! theme = "ocean"              # builtin palette
//! theme_file = "my-theme.toml" # wins over `theme`
//! format = "hex"               # "css" (default) or "hex"
//!
//! [contrast]
//! min_ratio = 7.0
//! step = 0.5
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;
use tinct_color::Color;
use tinct_expr::{ContrastOptions, EvalOptions};

use crate::builtin::builtin_theme;
use crate::theme::{Theme, ThemeError};

/// Application name used for the config directory.
const APP_NAME: &str = "tinct";

/// Default config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("unknown output format `{0}` (expected `css` or `hex`)")]
    UnknownFormat(String),
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `rgb(r, g, b)` / `rgba(r, g, b, a)`.
    #[default]
    Css,
    /// `#rrggbb` / `#rrggbbaa`.
    Hex,
}

impl OutputFormat {
    #[must_use]
    pub fn format(self, color: Color) -> String {
        match self {
            Self::Css => color.to_string(),
            Self::Hex => color.to_hex(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Self::Css),
            "hex" => Ok(Self::Hex),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Css => "css",
            Self::Hex => "hex",
        })
    }
}

/// The `tinct` configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Builtin palette name.
    pub theme: String,
    /// Theme TOML file; takes precedence over `theme`.
    pub theme_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub contrast: ContrastOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            theme_file: None,
            format: OutputFormat::default(),
            contrast: ContrastOptions::default(),
        }
    }
}

/// `$HOME/.config/tinct`, if `HOME` is set.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
}

/// `$HOME/.config/tinct/config.toml`, if `HOME` is set.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

impl Config {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for malformed TOML or mistyped fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the standard location, or defaults when there is no file.
    ///
    /// # Errors
    ///
    /// Only when a config file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The palette this configuration selects.
    ///
    /// # Errors
    ///
    /// [`ThemeError`] if the theme file fails to load or the builtin name
    /// is unknown.
    pub fn resolve_theme(&self) -> Result<Theme, ThemeError> {
        if let Some(path) = &self.theme_file {
            return Theme::load(path);
        }
        builtin_theme(&self.theme).ok_or_else(|| ThemeError::UnknownBuiltin(self.theme.clone()))
    }

    #[must_use]
    pub const fn eval_options(&self) -> EvalOptions {
        EvalOptions { contrast: self.contrast }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Parsing ─────────────────────────────────────────────────

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml_str(
            "theme = \"ocean\"\nformat = \"hex\"\n[contrast]\nmin_ratio = 7.0\nstep = 0.5\n",
        )
        .unwrap();
        assert_eq!(config.theme, "ocean");
        assert_eq!(config.format, OutputFormat::Hex);
        assert_eq!(config.contrast, ContrastOptions { min_ratio: 7.0, step: 0.5 });
    }

    #[test]
    fn partial_contrast_section_keeps_defaults() {
        let config = Config::from_toml_str("[contrast]\nmin_ratio = 3.0\n").unwrap();
        assert_eq!(config.contrast.step, ContrastOptions::default().step);
        assert!((config.contrast.min_ratio - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_format_is_parse_error() {
        assert!(matches!(
            Config::from_toml_str("format = \"svg\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/tinct/config.toml"),
            Err(ConfigError::Read { .. })
        ));
    }

    // ── Theme selection ─────────────────────────────────────────

    #[test]
    fn resolves_builtin() {
        let config = Config { theme: "dark".into(), ..Config::default() };
        assert_eq!(config.resolve_theme().unwrap().name, "dark");
    }

    #[test]
    fn unknown_builtin() {
        let config = Config { theme: "neon".into(), ..Config::default() };
        assert!(matches!(config.resolve_theme(), Err(ThemeError::UnknownBuiltin(name)) if name == "neon"));
    }

    #[test]
    fn theme_file_wins() {
        let path = std::env::temp_dir().join(format!("tinct-config-theme-{}.toml", std::process::id()));
        fs::write(&path, "name = \"mine\"\n[colors]\nprimary = \"red\"\n").unwrap();
        let config = Config { theme: "dark".into(), theme_file: Some(path.clone()), ..Config::default() };
        let theme = config.resolve_theme();
        fs::remove_file(&path).unwrap();
        assert_eq!(theme.unwrap().name, "mine");
    }

    // ── Output format ───────────────────────────────────────────

    #[test]
    fn format_from_str() {
        assert_eq!("HEX".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert!(matches!("svg".parse::<OutputFormat>(), Err(ConfigError::UnknownFormat(_))));
    }

    #[test]
    fn format_color() {
        let c = Color::rgb8(51, 102, 255);
        assert_eq!(OutputFormat::Css.format(c), "rgb(51, 102, 255)");
        assert_eq!(OutputFormat::Hex.format(c), "#3366ff");
    }
}
