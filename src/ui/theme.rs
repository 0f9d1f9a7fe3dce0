//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── accordion header ───────────────────────────────────────
    pub fn entry_label_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn badge_style() -> Style {
        Style::default().fg(Color::Black).bg(Color::Gray)
    }

    pub fn preview_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn focused_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    // ── accordion body ─────────────────────────────────────────
    pub fn quote_label_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn quote_text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn quote_rule_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn section_label_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn source_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn short_name_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn content_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn error_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::LightRed)
    }
}
