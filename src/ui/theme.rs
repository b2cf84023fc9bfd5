//! Color themes for the UI.

use crate::app::Theme;
use ratatui::style::Color;

/// Gruvbox color palette.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Main background.
    pub bg0: Color,
    /// Bars and raised surfaces.
    pub bg1: Color,
    /// Borders and separators.
    pub bg2: Color,
    /// Primary text.
    pub fg0: Color,
    /// Labels.
    pub fg1: Color,
    /// Dimmed text.
    pub gray: Color,
    /// Highlights and cursor.
    pub yellow: Color,
    /// Datasets and headings.
    pub aqua: Color,
    /// Attributes.
    pub blue: Color,
    /// Groups and hints.
    pub green: Color,
    /// Marked plot series.
    pub purple: Color,
    /// Secondary plot series.
    pub orange: Color,
    /// Errors.
    pub red: Color,
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::GruvboxDark => Self {
                bg0: Color::Rgb(40, 40, 40),
                bg1: Color::Rgb(60, 56, 54),
                bg2: Color::Rgb(80, 73, 69),
                fg0: Color::Rgb(235, 219, 178),
                fg1: Color::Rgb(213, 196, 161),
                gray: Color::Rgb(146, 131, 116),
                yellow: Color::Rgb(250, 189, 47),
                aqua: Color::Rgb(142, 192, 124),
                blue: Color::Rgb(131, 165, 152),
                green: Color::Rgb(184, 187, 38),
                purple: Color::Rgb(211, 134, 155),
                orange: Color::Rgb(254, 128, 25),
                red: Color::Rgb(251, 73, 52),
            },
            Theme::GruvboxLight => Self {
                bg0: Color::Rgb(251, 241, 199),
                bg1: Color::Rgb(235, 219, 178),
                bg2: Color::Rgb(213, 196, 161),
                fg0: Color::Rgb(60, 56, 54),
                fg1: Color::Rgb(80, 73, 69),
                gray: Color::Rgb(124, 111, 100),
                yellow: Color::Rgb(181, 118, 20),
                aqua: Color::Rgb(66, 123, 88),
                blue: Color::Rgb(7, 102, 120),
                green: Color::Rgb(121, 116, 14),
                purple: Color::Rgb(143, 63, 113),
                orange: Color::Rgb(175, 58, 3),
                red: Color::Rgb(157, 0, 6),
            },
        }
    }
}
