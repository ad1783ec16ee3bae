//! Color themes for the console UI.
//!
//! A theme carries the chrome colors (border, marker, status bar) plus the
//! core [`Palette`] the dispatcher styles its own lines with. Themes are
//! serializable so they can live in configuration.

use pagemark_core::console::{Color, Palette};
use serde::{Deserialize, Serialize};


/// A complete console color theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Ambient text color for uncolored output lines.
    pub text: Color,
    pub border: Color,
    /// The `$` prompt marker.
    pub marker: Color,
    pub status: Color,
    pub palette: Palette,
}


impl Theme {
    /// Solarized-dark accents — the default.
    pub fn default_dark() -> Self {
        Theme {
            name: "dark".to_string(),
            text: Color::Rgb(0x93, 0xa1, 0xa1),
            border: Color::Rgb(0x58, 0x6e, 0x75),
            marker: Color::Rgb(0x26, 0x8b, 0xd2),
            status: Color::Rgb(0x58, 0x6e, 0x75),
            palette: Palette::default(),
        }
    }

    /// Basic ANSI colors only, for terminals without truecolor.
    pub fn minimal() -> Self {
        Theme {
            name: "minimal".to_string(),
            text: Color::Default,
            border: Color::Default,
            marker: Color::Blue,
            status: Color::Default,
            palette: Palette {
                echo: Color::Default,
                warning: Color::Yellow,
                error: Color::Red,
            },
        }
    }

    /// Look a theme up by its configured name; unknown names fall back to
    /// the default.
    pub fn by_name(name: &str) -> Theme {
        match name {
            "minimal" => Theme::minimal(),
            _ => Theme::default_dark(),
        }
    }
}


impl Default for Theme {
    fn default() -> Self {
        Theme::default_dark()
    }
}


/// Map a core color onto ratatui's color type.
pub fn to_ratatui(color: Color) -> ratatui::style::Color {
    use ratatui::style::Color as R;
    match color {
        Color::Default => R::Reset,
        Color::Red => R::Red,
        Color::Green => R::Green,
        Color::Yellow => R::Yellow,
        Color::Blue => R::Blue,
        Color::Cyan => R::Cyan,
        Color::Magenta => R::Magenta,
        Color::White => R::White,
        Color::Rgb(r, g, b) => R::Rgb(r, g, b),
    }
}


/// Style for one output line: its own color, else the theme's text color.
pub fn line_style(color: Option<Color>, theme: &Theme) -> ratatui::style::Style {
    ratatui::style::Style::default().fg(to_ratatui(color.unwrap_or(theme.text)))
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
