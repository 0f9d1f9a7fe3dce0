//! Core model – citation records, the panel view tree, and accordion state.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod accordion;
pub mod citation;
pub mod panel;
pub mod source;
