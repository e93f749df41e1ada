//! # tinct-theme — Palettes and Configuration
//!
//! Supplies the token palettes color expressions are evaluated against,
//! and the configuration file that selects one.
//!
//! ```text
//! config.toml ──► Config ──► resolve_theme() ──► Theme ──► ThemeContext
//!                               │                  ▲
//!                               ├─ theme_file ─────┤ (TOML)
//!                               └─ theme ──────────┘ (builtin.rs)
//! ```

pub mod builtin;
pub mod config;
pub mod theme;

pub use builtin::{builtin_names, builtin_theme};
pub use config::{Config, ConfigError, OutputFormat};
pub use theme::{Theme, ThemeError};
