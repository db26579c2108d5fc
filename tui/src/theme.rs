//! Color themes for the form.
//!
//! A theme maps each visual role (labels, focused field, edit mode, the
//! add row, status line) to a ratatui [`Style`]. Themes are picked by name
//! from the `theme` setting.

use ratatui::style::{Color, Modifier, Style};


/// Styles for every element of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub border: Style,
    pub label: Style,
    /// Name field of the row in edit mode.
    pub editing: Style,
    /// The field that currently has focus.
    pub focused: Style,
    pub value: Style,
    pub affordance: Style,
    pub placeholder: Style,
    pub status: Style,
    pub error: Style,
}


impl Theme {
    /// Dark terminal theme — the default.
    pub fn default_dark() -> Self {
        Theme {
            name: "dark".to_string(),
            border: Style::default().fg(Color::Blue),
            label: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(Color::LightYellow),
            focused: Style::default().bg(Color::DarkGray),
            value: Style::default().fg(Color::Gray),
            affordance: Style::default().fg(Color::Cyan),
            placeholder: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            status: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::LightRed),
        }
    }

    /// Light terminal theme.
    pub fn default_light() -> Self {
        Theme {
            name: "light".to_string(),
            border: Style::default().fg(Color::Black),
            label: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(Color::Magenta),
            focused: Style::default().bg(Color::Gray),
            value: Style::default().fg(Color::Black),
            affordance: Style::default().fg(Color::Blue),
            placeholder: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            status: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red),
        }
    }

    /// No colors, only modifiers.
    pub fn minimal() -> Self {
        Theme {
            name: "minimal".to_string(),
            border: Style::default(),
            label: Style::default().add_modifier(Modifier::BOLD),
            editing: Style::default().add_modifier(Modifier::UNDERLINED),
            focused: Style::default().add_modifier(Modifier::REVERSED),
            value: Style::default(),
            affordance: Style::default(),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            status: Style::default(),
            error: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    /// Look up a theme by name, falling back to dark for unknown names.
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Theme::default_light(),
            "minimal" | "none" => Theme::minimal(),
            _ => Theme::default_dark(),
        }
    }
}


impl Default for Theme {
    fn default() -> Self {
        Theme::default_dark()
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
