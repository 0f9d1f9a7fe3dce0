//! Popup overlay listing the configured controls.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

// ───────────────────────────────────────── controls popup ────

/// Read-only keybinding overview.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for ControlsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + blank top + blank/hint bottom + 2 border rows
        let height = (Action::ALL.len() as u16) + 5;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Controles ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let label_style = Style::default().fg(Color::White);
        let key_style = Style::default().fg(Color::Yellow);
        let mut lines = vec![Line::raw("")];

        for &action in Action::ALL {
            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("   {:<22}", action.label());
            let keys_width = (inner.width as usize)
                .saturating_sub(label_col.len() + 1)
                .max(1);
            let keys_col = format!("{:>keys_width$}", self.config.display_bindings(action));

            lines.push(Line::from(vec![
                Span::styled(label_col, label_style),
                Span::styled(keys_col, key_style),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Esc / ? : cerrar",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
