// SPDX-License-Identifier: MIT
//
// tinct — evaluate color expressions from the command line.
//
// This is the binary that wires the crates together:
//
//   tinct-theme → config file, builtin palettes, theme TOML
//   tinct-expr  → parser, evaluator, contrast solver
//   tinct-color → the color math behind the standard library
//
// Each expression flows through:
//
//   argv → parse → (caret diagnostic on failure)
//        → Evaluator { theme, Standard } → Color → css / hex on stdout
//
// Usage:
//
//   tinct eval 'color(primary shade(10%))' --theme dark
//   tinct eval 'if(isDark tint(10%) shade(10%))' --base '#202020'
//   tinct parse 'blend(#000, 20%)'
//   tinct themes

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, debug, info};
use tinct_color::Color;
use tinct_expr::{ColorLibrary, Evaluator, Standard, ThemeContext};
use tinct_theme::{Config, OutputFormat, Theme, builtin_names, builtin_theme};

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Evaluate color expressions like `color(primary shade(10%))` against a theme
#[derive(Parser, Debug)]
#[command(name = "tinct", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (default: ~/.config/tinct/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (default: RUST_LOG or warn)
    #[arg(short, long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate expressions and print the resulting colors
    Eval {
        /// One or more expressions
        #[arg(required = true, value_name = "EXPR")]
        exprs: Vec<String>,

        /// Builtin theme name (overrides config)
        #[arg(short, long, value_name = "NAME")]
        theme: Option<String>,

        /// Theme TOML file (overrides --theme and config)
        #[arg(long, value_name = "PATH")]
        theme_file: Option<PathBuf>,

        /// Incoming color for relative expressions like `shade(10%)`
        #[arg(short, long, value_name = "COLOR")]
        base: Option<String>,

        /// Output format: css or hex (overrides config)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },

    /// Parse an expression and print its canonical form and syntax tree
    Parse {
        #[arg(value_name = "EXPR")]
        expr: String,
    },

    /// List builtin themes
    Themes,
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder = Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(parse_level(level));
    }
    builder.format_timestamp(None).init();
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// Settings for one `eval` run after config and flags are merged.
struct EvalRun {
    theme: Theme,
    config: Config,
    base: Option<String>,
}

impl EvalRun {
    /// Evaluate every expression, writing results to `out` and diagnostics
    /// to `err`. Returns whether all of them succeeded.
    fn run(&self, exprs: &[String], out: &mut impl Write, err: &mut impl Write) -> Result<bool> {
        let evaluator = Evaluator::new(&self.theme, Standard).with_options(self.config.eval_options());

        let base = match &self.base {
            Some(src) => match evaluate_one(&evaluator, src, None) {
                Ok(color) => Some(color),
                Err(message) => {
                    writeln!(err, "{message}")?;
                    return Ok(false);
                }
            },
            None => None,
        };

        let mut ok = true;
        for src in exprs {
            match evaluate_one(&evaluator, src, base) {
                Ok(color) => writeln!(out, "{}", self.config.format.format(color))?,
                Err(message) => {
                    writeln!(err, "{message}")?;
                    ok = false;
                }
            }
        }
        Ok(ok)
    }
}

/// Parse and evaluate one expression. Failures come back as printable text.
fn evaluate_one<C: ThemeContext>(
    evaluator: &Evaluator<C, Standard>,
    src: &str,
    base: Option<Color>,
) -> Result<Color, String> {
    let expr = tinct_expr::parse(src).map_err(|e| e.render(src))?;
    debug!("evaluating `{expr}`");
    let result = match base {
        Some(base) => evaluator.evaluate_from(&expr, base),
        None => evaluator.evaluate(&expr),
    };
    result.map_err(|e| format!("error: {e}\n --> {src}"))
}

fn parse_command(src: &str, out: &mut impl Write, err: &mut impl Write) -> Result<bool> {
    match tinct_expr::parse(src) {
        Ok(expr) => {
            writeln!(out, "{expr}")?;
            writeln!(out, "{expr:#?}")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(err, "{}", e.render(src))?;
            Ok(false)
        }
    }
}

fn themes_command(out: &mut impl Write) -> Result<()> {
    for name in builtin_names() {
        let Some(theme) = builtin_theme(name) else {
            continue;
        };
        let background = theme
            .color("background")
            .and_then(|bg| Standard.parse(bg).ok())
            .map_or_else(String::new, Color::to_hex);
        let kind = if theme.dark { "dark" } else { "light" };
        writeln!(out, "{name:<8} {kind:<5} {background}  {} colors", theme.colors.len())?;
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(&path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Config::load_default().context("loading default config"),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<bool> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    match cli.command {
        Command::Eval { exprs, theme, theme_file, base, format } => {
            let mut config = load_config(cli.config)?;
            if let Some(name) = theme {
                config.theme = name;
                config.theme_file = None;
            }
            if theme_file.is_some() {
                config.theme_file = theme_file;
            }
            if let Some(format) = format {
                config.format = format;
            }

            let theme = config.resolve_theme().context("selecting theme")?;
            info!("using theme `{}`", theme.name);
            EvalRun { theme, config, base }.run(&exprs, &mut out, &mut err)
        }
        Command::Parse { expr } => parse_command(&expr, &mut out, &mut err),
        Command::Themes => themes_command(&mut out).map(|()| true),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let ok = run(cli)?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
