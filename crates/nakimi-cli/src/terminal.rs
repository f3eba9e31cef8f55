//! Terminal styling and color utilities.
//!
//! ANSI escape codes and color detection for the text output format.

use std::io::IsTerminal;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for stop ids and headings.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements (addresses, footers).
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for valid orders and generated links.
    pub const GREEN: &str = "\x1b[32m";
    /// Red for rejected orders and link errors.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            red: "",
        }
    }

    /// `colored()` when stdout is a color-capable terminal, `plain()` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() && supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a distance in kilometres with two decimals.
///
/// ```
/// # use nakimi_cli::terminal::format_km;
/// assert_eq!(format_km(3.14159), "3.14 km");
/// assert_eq!(format_km(0.0), "0.00 km");
/// ```
#[must_use]
pub fn format_km(km: f64) -> String {
    format!("{:.2} km", km)
}

/// Format a share as a percentage with one decimal.
#[must_use]
pub fn format_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}
