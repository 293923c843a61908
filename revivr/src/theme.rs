//! Color theme system for revivr.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every surface revivr
//! draws. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB; requires truecolor.
//!
//! Editor source colors come from syntect, not from here.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Editor
    /// Line-number gutter.
    pub gutter: Color,

    // Review panel
    pub review_text: Color,
    /// Markdown headings, list markers.
    pub review_heading: Color,
    /// Inline `code` spans.
    pub review_code: Color,
    /// Placeholder shown before the first review.
    pub placeholder: Color,
    /// "Analyzing..." while a request is in flight.
    pub loading: Color,
    /// Review text of a failed cycle.
    pub error_text: Color,

    // Modal notice
    pub notice_border: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            gutter: Color::DarkGray,

            review_text: Color::Reset,
            review_heading: Color::Cyan,
            review_code: Color::Yellow,
            placeholder: Color::DarkGray,
            loading: Color::Yellow,
            error_text: Color::Red,

            notice_border: Color::Yellow,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
        }
    }

    /// Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let sapphire = Color::Rgb(116, 199, 236); // #74c7ec
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: sapphire,
            border_inactive: overlay1,

            gutter: surface1,

            review_text: text,
            review_heading: sapphire,
            review_code: peach,
            placeholder: overlay1,
            loading: yellow,
            error_text: red,

            notice_border: peach,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
        }
    }

    /// Resolves a theme name to a built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
