//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::ui::layout::AppLayout;
use crate::ui::panel_widget::{build_rows, PanelRow};

use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // Messages stay up until the next key press.
    state.status_message = None;
    state.status_is_error = false;

    match state.active_view {
        ActiveView::Panel => handle_panel_key(state, key),
        ActiveView::Controls => handle_controls_key(state, key),
    }
}

// ── Panel view (configurable bindings) ──────────────────────────

fn handle_panel_key(state: &mut AppState, key: KeyEvent) {
    // Navigation keys that always work.
    match key.code {
        KeyCode::Home => {
            state.panel_state.focus(0);
            return;
        }
        KeyCode::End => {
            state.panel_state.focus(state.entry_count().saturating_sub(1));
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::ShowControls => state.active_view = ActiveView::Controls,
        Action::MoveUp => state.panel_state.select_prev(),
        Action::MoveDown => {
            let count = state.entry_count();
            state.panel_state.select_next(count);
        }
        Action::Toggle => toggle_focused(state),
        Action::CollapseAll => {
            state.accordion.collapse_all();
            state.panel_state.follow_focus = true;
        }
        Action::ScrollUp => {
            let page = page_height(state) as isize;
            state.panel_state.scroll_by(-page);
        }
        Action::ScrollDown => {
            let page = page_height(state) as isize;
            state.panel_state.scroll_by(page);
        }
        Action::Reload => reload(state),
    }
}

// ── Controls popup (hardcoded keys) ─────────────────────────────

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
    ) {
        state.active_view = ActiveView::Panel;
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Panel {
        return;
    }

    let step = state.config.scroll_step as isize;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(PanelRow { entry, .. }) = header_at(state, mouse.column, mouse.row) {
                state.panel_state.focus(entry);
                toggle_focused(state);
            }
        }
        MouseEventKind::ScrollUp => state.panel_state.scroll_by(-step),
        MouseEventKind::ScrollDown => state.panel_state.scroll_by(step),
        _ => {}
    }
}

// ── helpers ─────────────────────────────────────────────────────

/// Open the focused entry, closing any other; close it if already open.
fn toggle_focused(state: &mut AppState) {
    let Some(key) = state
        .panel
        .as_ref()
        .and_then(|p| p.entries.get(state.panel_state.focused))
        .map(|e| e.key.clone())
    else {
        return;
    };
    let open = state.accordion.toggle(&key);
    state.panel_state.follow_focus = true;
    tracing::debug!("toggle {key}: open={open}");
}

fn reload(state: &mut AppState) {
    if !state.input.is_reloadable() {
        state.set_error("No se puede recargar: la entrada se leyó de stdin");
        return;
    }
    match state.reload() {
        Ok(()) => {
            let count = state.entry_count();
            tracing::debug!("reloaded {} ({count} citations)", state.input.describe());
            state.set_status(format!("Recargadas {count} cita(s)"));
        }
        Err(err) => {
            tracing::warn!("reload failed: {err}");
            state.set_error(format!("Error al recargar: {err}"));
        }
    }
}

/// Rows visible inside the card border.
fn page_height(state: &AppState) -> usize {
    let layout = AppLayout::from_area(state.terminal_area);
    (layout.panel_inner().height as usize).max(1)
}

/// The header row under the pointer, if any.
fn header_at(state: &AppState, col: u16, row: u16) -> Option<PanelRow> {
    let panel = state.panel.as_ref()?;
    let inner = AppLayout::from_area(state.terminal_area).panel_inner();
    if col < inner.x
        || col >= inner.x + inner.width
        || row < inner.y
        || row >= inner.y + inner.height
    {
        return None;
    }

    let rows = build_rows(
        panel,
        &state.accordion,
        inner.width as usize,
        state.config.show_preview,
    );
    let index = (row - inner.y) as usize + state.panel_state.offset;
    rows.into_iter().nth(index).filter(PanelRow::is_header)
}
