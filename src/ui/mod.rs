//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* view tree and turns it into cells on the
//! terminal (or plain lines for `--print`).  No file I/O happens here.

pub mod layout;
pub mod panel_widget;
pub mod plain;
pub mod popup;
pub mod theme;
