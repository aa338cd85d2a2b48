//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::engine::ValidationState;

/// Available palettes. The terminal background picks between light and
/// dark when no preference is saved; the rest are explicit choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    Ocean,
    Forest,
    Sunset,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "ocean" => Some(Theme::Ocean),
            "forest" => Some(Theme::Forest),
            "sunset" => Some(Theme::Sunset),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Sunset => "sunset",
        }
    }

    /// Next palette in the cycle order.
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Ocean,
            Theme::Ocean => Theme::Forest,
            Theme::Forest => Theme::Sunset,
            Theme::Sunset => Theme::Light,
        }
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            Theme::Light => ThemeColors::light(),
            Theme::Dark => ThemeColors::dark(),
            Theme::Ocean => ThemeColors::ocean(),
            Theme::Forest => ThemeColors::forest(),
            Theme::Sunset => ThemeColors::sunset(),
        }
    }
}

/// Resolve the theme to use: an explicit preference wins, otherwise the
/// terminal background luma decides between light and dark.
pub fn resolve_theme(preference: Option<&str>) -> Theme {
    if let Some(name) = preference {
        if let Some(theme) = Theme::from_name(name) {
            return theme;
        }
    }

    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => Theme::Light,
        _ => Theme::Dark,
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Validation states
    pub valid: Color,
    pub invalid: Color,
    pub warning: Color,
    pub neutral: Color,

    // Pass/fail verdicts
    pub pass_color: Color,
    pub fail_color: Color,

    // Weight usage bar
    pub bar_filled: Color,
    pub bar_over: Color,
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            valid: Color::Green,
            invalid: Color::Red,
            warning: Color::Yellow,
            neutral: Color::DarkGray,
            pass_color: Color::Green,
            fail_color: Color::Red,
            bar_filled: Color::Cyan,
            bar_over: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            valid: Color::Indexed(28),
            invalid: Color::Indexed(124),
            warning: Color::Indexed(130),
            neutral: Color::Gray,
            pass_color: Color::Indexed(28),
            fail_color: Color::Indexed(124),
            bar_filled: Color::Indexed(25),
            bar_over: Color::Indexed(124),
            bar_empty: Color::Indexed(252),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Indexed(25),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Indexed(25),
            flash_success: Color::Indexed(28),
            flash_error: Color::Indexed(124),
            popup_border: Color::Indexed(25),
            popup_title: Style::new().fg(Color::Indexed(25)).bold(),
        }
    }

    pub fn ocean() -> Self {
        Self {
            bar_filled: Color::Indexed(38),
            title_color: Color::Indexed(45),
            status_key_color: Color::Indexed(45),
            popup_border: Color::Indexed(38),
            popup_title: Style::new().fg(Color::Indexed(45)).bold(),
            ..Self::dark()
        }
    }

    pub fn forest() -> Self {
        Self {
            bar_filled: Color::Indexed(71),
            title_color: Color::Indexed(114),
            status_key_color: Color::Indexed(114),
            popup_border: Color::Indexed(71),
            popup_title: Style::new().fg(Color::Indexed(114)).bold(),
            ..Self::dark()
        }
    }

    pub fn sunset() -> Self {
        Self {
            bar_filled: Color::Indexed(173),
            title_color: Color::Indexed(215),
            status_key_color: Color::Indexed(215),
            popup_border: Color::Indexed(173),
            popup_title: Style::new().fg(Color::Indexed(215)).bold(),
            ..Self::dark()
        }
    }

    /// Color for a per-entry or total-weight validation state.
    pub fn validation_color(&self, state: ValidationState) -> Color {
        match state {
            ValidationState::Valid => self.valid,
            ValidationState::Invalid => self.invalid,
            ValidationState::Warning => self.warning,
            ValidationState::Neutral => self.neutral,
        }
    }

    /// Traffic-light color for an average measured against the pass
    /// grade: passing is green, within ten points is yellow, further
    /// out is red.
    pub fn grade_color(&self, average: f64, pass_grade: f64) -> Color {
        if average >= pass_grade {
            self.pass_color
        } else if average >= pass_grade - 10.0 {
            self.warning
        } else {
            self.fail_color
        }
    }
}
