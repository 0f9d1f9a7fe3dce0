//! Plain-text rendering for `--print`: every entry expanded, no styling.

use crate::core::panel::PanelView;

use super::panel_widget::{DOCUMENT_GLYPH, QUOTE_GLYPH};

/// Render `panel` as lines of text.  `None` (no citations) prints nothing.
pub fn render_lines(panel: Option<&PanelView>) -> Vec<String> {
    let Some(panel) = panel else {
        return Vec::new();
    };

    let mut out = vec![format!("{DOCUMENT_GLYPH} {}", panel.title), String::new()];

    for entry in &panel.entries {
        out.push(format!("{}  [{}]", entry.header.label, entry.header.badge));
        if let Some(preview) = &entry.header.preview {
            out.push(format!("  {preview}"));
        }

        if let Some(quote) = &entry.body.quote {
            out.push(format!("  {QUOTE_GLYPH} {}", quote.label));
            out.extend(quote.text.split('\n').map(|l| format!("  | {l}")));
        }

        out.push(format!("  {}", entry.body.references_label));
        for reference in &entry.body.references {
            out.push(format!("    {}", reference.label));
            if !reference.source.is_empty() {
                out.push(format!("    {}", reference.source));
            }
            out.push(format!("    ({})", reference.short_name));
            out.extend(reference.content.split('\n').map(|l| format!("      {l}")));
        }
        out.push(String::new());
    }

    out
}
