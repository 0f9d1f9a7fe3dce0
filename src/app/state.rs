//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    accordion::AccordionState,
    citation::Citation,
    panel::{self, PanelView},
    source::{self, InputSource, LoadError},
};
use crate::ui::panel_widget::PanelWidgetState;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Panel,
    Controls,
}

/// Top-level application state.
pub struct AppState {
    /// Where the citations were read from (and are re-read from on reload).
    pub input: InputSource,
    /// View tree of the loaded citations.  `None` when there are none.
    pub panel: Option<PanelView>,
    /// Which accordion entry is open.  Owned here, handed to the widget.
    pub accordion: AccordionState,
    /// Widget-level state (focused entry, scroll).
    pub panel_state: PanelWidgetState,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// `true` when `status_message` reports a failure.
    pub status_is_error: bool,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// User-configurable keybindings and display settings.
    pub config: AppConfig,
    /// Last known terminal size, for mouse hit-testing and paging.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(input: InputSource, citations: Vec<Citation>, config: AppConfig) -> Self {
        let panel = panel::render(&citations);
        Self {
            input,
            panel,
            accordion: AccordionState::default(),
            panel_state: PanelWidgetState::default(),
            should_quit: false,
            status_message: None,
            status_is_error: false,
            active_view: ActiveView::default(),
            config,
            terminal_area: Rect::default(),
        }
    }

    /// Number of accordion entries currently shown.
    pub fn entry_count(&self) -> usize {
        self.panel.as_ref().map_or(0, |p| p.entries.len())
    }

    /// Open the entry at `position` (0-based), if it exists.
    pub fn open_entry(&mut self, position: usize) {
        let Some(key) = self
            .panel
            .as_ref()
            .and_then(|p| p.entries.get(position))
            .map(|e| e.key.clone())
        else {
            return;
        };
        self.accordion = AccordionState::with_open(key);
        self.panel_state.focus(position);
    }

    /// Swap in a freshly loaded collection, keeping the open entry and the
    /// cursor where they still make sense.
    pub fn replace_citations(&mut self, citations: Vec<Citation>) {
        self.panel = panel::render(&citations);

        let keys = self
            .panel
            .iter()
            .flat_map(|p| p.entries.iter().map(|e| e.key.as_str()));
        self.accordion.retain(keys);

        let count = self.entry_count();
        if self.panel_state.focused >= count {
            self.panel_state.focused = count.saturating_sub(1);
        }
        self.panel_state.follow_focus = true;
    }

    /// Re-read the input.  On failure the current citations stay on screen.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let citations = source::load(&self.input)?;
        self.replace_citations(citations);
        Ok(())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }
}
