//! A terminal card that lists citations and the sources backing them.
//!
//! Feed it the citation payload produced by a retrieval pipeline (a JSON file,
//! or `-` for stdin) to browse it as a collapsible accordion.  Run with
//! `--print` to dump every citation expanded as plain text instead.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::{panel, source::InputSource};
use crate::ui::{
    layout::AppLayout,
    panel_widget::{PanelWidget, DOCUMENT_GLYPH},
    plain, popup,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Browse citations and their sources")]
struct Cli {
    /// Citation payload (JSON); `-` reads stdin.
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Print every citation expanded as plain text and exit.
    #[arg(long)]
    print: bool,

    /// Open citation N (1-based position) at startup.
    #[arg(long, value_name = "N")]
    expand: Option<usize>,

    /// Write the current configuration file (defaults if none exists) and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let user_config = config::AppConfig::load();

    if cli.write_config {
        let path = user_config.save().context("writing config file")?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── load citations ────────────────────────────────────────
    let input = InputSource::from_arg(&cli.input);
    let citations = core::source::load(&input)
        .with_context(|| format!("loading citations from {}", input.describe()))?;

    if cli.print {
        let view = panel::render(&citations);
        let mut out = io::stdout().lock();
        for line in plain::render_lines(view.as_ref()) {
            writeln!(out, "{line}")?;
        }
        return Ok(());
    }

    let mut state = AppState::new(input, citations, user_config);
    if let Some(n) = cli.expand {
        state.open_entry(n.saturating_sub(1));
    }

    // ── terminal ──────────────────────────────────────────────
    enable_raw_mode()?;
    let result = run_tui(&mut state).await;
    // Restore even when setup or the loop failed, then report the first error.
    let restored = restore_terminal();
    result?;
    restored?;

    Ok(())
}

/// Enter the alternate screen and run the event loop.  Expects raw mode to be
/// on; the caller restores the terminal whatever this returns.
async fn run_tui(state: &mut AppState) -> Result<()> {
    execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr()))?;
    let size = terminal.size()?;
    state.terminal_area = Rect::new(0, 0, size.width, size.height);

    run(&mut terminal, state).await
}

/// Undo everything `enable_raw_mode` and `run_tui` may have changed.  Safe to
/// call when only part of the setup happened.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// Draw / handle events until the user quits.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(state, m),
            AppEvent::Resize(w, h) => state.terminal_area = Rect::new(0, 0, w, h),
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut ratatui::Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());

    // No citations: the card is not drawn at all.
    if let Some(ref view) = state.panel {
        let card = Block::default()
            .title(format!(" {DOCUMENT_GLYPH} {} ", view.title))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());

        let widget = PanelWidget::new(view, &state.accordion)
            .show_preview(state.config.show_preview)
            .block(card);
        frame.render_stateful_widget(widget, layout.panel_area, &mut state.panel_state);
    }

    let hint = if state.panel.is_none() {
        "Sin citas".to_string()
    } else {
        state.config.status_bar_hint()
    };
    let (status_text, status_style) = match (&state.status_message, state.active_view) {
        (_, ActiveView::Controls) => ("", Theme::status_bar_style()),
        (Some(msg), _) if state.status_is_error => (msg.as_str(), Theme::error_style()),
        (Some(msg), _) => (msg.as_str(), Theme::status_bar_style()),
        (None, _) => (hint.as_str(), Theme::status_bar_style()),
    };
    frame.render_widget(
        Paragraph::new(status_text).style(status_style),
        layout.status_area,
    );

    if state.active_view == ActiveView::Controls {
        frame.render_widget(
            popup::ControlsPopup {
                config: &state.config,
            },
            frame.area(),
        );
    }
}
