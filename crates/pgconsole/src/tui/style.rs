//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Color palette used throughout the dashboard.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const SORT_COLUMN_BG: Color = Color::DarkGray;
    pub const ERROR_FG: Color = Color::Red;
    pub const CPU_COLOR: Color = Color::Cyan;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Data-region header row: bold.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .add_modifier(Modifier::BOLD)
    }

    /// The active sort column's header cell: bold + reverse-video,
    /// layered on top of [`table_header`].
    pub fn sort_column_header() -> Style {
        Self::table_header()
            .bg(Theme::SORT_COLUMN_BG)
            .add_modifier(Modifier::REVERSED)
    }

    pub fn status_line() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::HEADER_BG)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Theme::ERROR_FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cpu() -> Style {
        Style::default().fg(Theme::CPU_COLOR)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }
}
