//! Named preset palettes — ready to use without a theme file.
//!
//! Every preset defines the same tokens, so an expression written against
//! one palette evaluates against any other.

use crate::theme::Theme;

/// Look up a builtin theme by name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<Theme> {
    Some(match name {
        "default" | "light" => Theme::new(
            "light",
            false,
            &[
                ("background", "#ffffff"),
                ("surface", "#f4f5f7"),
                ("border", "#d0d4da"),
                ("text", "#1d2330"),
                ("muted", "#6b7280"),
                ("primary", "#3366ff"),
                ("secondary", "#7a5af8"),
                ("accent", "#00a3a3"),
                ("success", "#1f9d55"),
                ("warning", "#d97706"),
                ("error", "#dc2626"),
            ],
        ),
        "dark" => Theme::new(
            "dark",
            true,
            &[
                ("background", "#14161b"),
                ("surface", "#1e2128"),
                ("border", "#2f3440"),
                ("text", "#e6e8ee"),
                ("muted", "#8b93a5"),
                ("primary", "#6e8bff"),
                ("secondary", "#a48bfa"),
                ("accent", "#2dd4bf"),
                ("success", "#4ade80"),
                ("warning", "#fbbf24"),
                ("error", "#f87171"),
            ],
        ),
        "ocean" => Theme::new(
            "ocean",
            true,
            &[
                ("background", "#0b1e2d"),
                ("surface", "#12324a"),
                ("border", "#1f4a68"),
                ("text", "#d8ecf8"),
                ("muted", "#7fa3bb"),
                ("primary", "#3aa6ff"),
                ("secondary", "#5eead4"),
                ("accent", "#f9a8d4"),
                ("success", "#34d399"),
                ("warning", "#fcd34d"),
                ("error", "#fb7185"),
            ],
        ),
        "ember" => Theme::new(
            "ember",
            false,
            &[
                ("background", "#fff8f1"),
                ("surface", "#fdebd9"),
                ("border", "#f0c9a6"),
                ("text", "#3b1d0e"),
                ("muted", "#8a5a3c"),
                ("primary", "#e2571e"),
                ("secondary", "#b4361b"),
                ("accent", "#c2410c"),
                ("success", "#3f8f3a"),
                ("warning", "#d9a40b"),
                ("error", "#b91c1c"),
            ],
        ),
        _ => return None,
    })
}

/// List all available builtin theme names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["default", "light", "dark", "ocean", "ember"]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_color::Color;

    #[test]
    fn all_builtins_resolve() {
        for name in builtin_names() {
            let theme = builtin_theme(name);
            assert!(theme.is_some(), "Builtin '{name}' missing");
        }
    }

    #[test]
    fn all_builtins_validate() {
        for name in builtin_names() {
            let theme = builtin_theme(name).unwrap();
            assert!(theme.validate().is_ok(), "Builtin '{name}' has a bad color");
        }
    }

    #[test]
    fn unknown_returns_none() {
        assert!(builtin_theme("nonexistent").is_none());
    }

    #[test]
    fn default_is_light() {
        assert_eq!(builtin_theme("default"), builtin_theme("light"));
    }

    #[test]
    fn builtins_share_tokens() {
        let light = builtin_theme("light").unwrap();
        for name in builtin_names() {
            let theme = builtin_theme(name).unwrap();
            let a: Vec<_> = light.colors.keys().collect();
            let b: Vec<_> = theme.colors.keys().collect();
            assert_eq!(a, b, "token set of '{name}'");
        }
    }

    #[test]
    fn dark_flag_matches_background() {
        for name in builtin_names() {
            let theme = builtin_theme(name).unwrap();
            let bg = Color::parse(theme.color("background").unwrap()).unwrap();
            assert_eq!(bg.is_dark(), theme.dark, "background of '{name}'");
        }
    }

    #[test]
    fn primary_is_light_theme_scenario_color() {
        let light = builtin_theme("light").unwrap();
        let css = tinct_expr::eval_str("color(primary)", &light).unwrap();
        assert_eq!(css.to_hex(), "#3366ff");
    }
}
