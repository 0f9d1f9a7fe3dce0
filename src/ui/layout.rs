//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: the citation card and a bottom status bar.
pub struct AppLayout {
    pub panel_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // card (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            panel_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// Rows and columns available inside the card border.
    pub fn panel_inner(&self) -> Rect {
        Rect {
            x: self.panel_area.x.saturating_add(1),
            y: self.panel_area.y.saturating_add(1),
            width: self.panel_area.width.saturating_sub(2),
            height: self.panel_area.height.saturating_sub(2),
        }
    }
}
