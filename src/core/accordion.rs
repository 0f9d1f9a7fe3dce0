//! Single-selection accordion state.
//!
//! The panel itself is stateless; which entry is open lives here, keyed by
//! the entry's stable key, and is handed to whatever draws the panel.  At
//! most one entry is open at a time and the open entry can be closed again.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccordionState {
    open: Option<String>,
}

impl AccordionState {
    /// Start with `key` open.
    pub fn with_open(key: impl Into<String>) -> Self {
        Self {
            open: Some(key.into()),
        }
    }

    pub fn is_open(&self, key: &str) -> bool {
        self.open.as_deref() == Some(key)
    }

    pub fn open_key(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Open `key` (closing whatever was open), or close it if it already is.
    /// Returns whether `key` is open afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.is_open(key) {
            self.open = None;
            false
        } else {
            self.open = Some(key.to_string());
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.open = None;
    }

    /// Drop the selection if its key is no longer among `keys`.
    pub fn retain<'a>(&mut self, mut keys: impl Iterator<Item = &'a str>) {
        let still_there = match self.open_key() {
            Some(open) => keys.any(|k| k == open),
            None => true,
        };
        if !still_there {
            self.open = None;
        }
    }
}
