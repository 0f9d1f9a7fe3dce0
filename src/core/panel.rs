//! The citation panel as a plain data tree.
//!
//! [`render`] turns a citation collection into a [`PanelView`]: a card title
//! and one [`EntryView`] per citation, each with an always-visible header and
//! a body that the host only shows while the entry is expanded.  Nothing here
//! knows about terminals; `ui::panel_widget` and `ui::plain` draw the tree.

use super::citation::{Citation, Reference};

/// Preview length in characters before the ellipsis kicks in.
pub const PREVIEW_CHARS: usize = 80;

/// Appended to a preview that was cut short.
pub const ELLIPSIS: &str = "...";

/// Short name shown for a reference with no usable source.
pub const UNKNOWN_SOURCE: &str = "Fuente desconocida";

// ───────────────────────────────────────── view tree ─────────

/// The whole card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub title: String,
    pub entries: Vec<EntryView>,
}

/// One collapsible accordion entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// Stable accordion key (`item-<position>`).
    pub key: String,
    pub header: EntryHeader,
    pub body: EntryBody,
}

/// Always-visible trigger region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// `Cita #<n>`
    pub label: String,
    /// `<n> fuente(s)`
    pub badge: String,
    /// Quoted, possibly truncated preview.  `None` when there is no quoted text.
    pub preview: Option<String>,
}

/// Region revealed while the entry is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBody {
    pub quote: Option<QuoteBlock>,
    /// `Referencias que respaldan este fragmento (<n>):`
    pub references_label: String,
    pub references: Vec<ReferenceBlock>,
}

/// Highlighted quoted-text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBlock {
    /// `Texto citado (posiciones <start>-<end>)`
    pub label: String,
    /// Full, untruncated text.  Line breaks are kept as-is.
    pub text: String,
}

/// Detail block for one supporting reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBlock {
    /// `Fuente #<i>:`
    pub label: String,
    /// Raw source identifier; empty when absent.
    pub source: String,
    pub short_name: String,
    /// Raw excerpt, shown monospaced with whitespace intact.
    pub content: String,
}

// ───────────────────────────────────────── render ────────────

/// Build the panel for `citations`.  An empty collection renders nothing.
pub fn render(citations: &[Citation]) -> Option<PanelView> {
    if citations.is_empty() {
        return None;
    }

    let entries = citations
        .iter()
        .enumerate()
        .map(|(position, citation)| render_entry(position, citation))
        .collect();

    Some(PanelView {
        title: format!("Citas y fuentes ({})", citations.len()),
        entries,
    })
}

fn render_entry(position: usize, citation: &Citation) -> EntryView {
    let quoted = citation.texto_citado.as_str();
    let ref_count = citation.referencias.len();

    let header = EntryHeader {
        label: format!("Cita #{}", citation.display_index(position)),
        badge: source_badge(ref_count),
        preview: (!quoted.is_empty()).then(|| format!("\"{}\"", preview(quoted))),
    };

    let quote = (!quoted.is_empty()).then(|| QuoteBlock {
        label: format!(
            "Texto citado (posiciones {}-{})",
            citation.span_start, citation.span_end
        ),
        text: quoted.to_string(),
    });

    let references = citation
        .referencias
        .iter()
        .enumerate()
        .map(|(i, reference)| render_reference(i, reference))
        .collect();

    EntryView {
        key: entry_key(position),
        header,
        body: EntryBody {
            quote,
            references_label: format!(
                "Referencias que respaldan este fragmento ({ref_count}):"
            ),
            references,
        },
    }
}

fn render_reference(i: usize, reference: &Reference) -> ReferenceBlock {
    ReferenceBlock {
        label: format!("Fuente #{}:", i + 1),
        source: reference.source.clone().unwrap_or_default(),
        short_name: short_name(reference.source.as_deref()).to_string(),
        content: reference.content.clone(),
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Accordion key for the entry at `position`.
pub fn entry_key(position: usize) -> String {
    format!("item-{position}")
}

/// `1 fuente`, otherwise `<n> fuentes`.
pub fn source_badge(count: usize) -> String {
    if count == 1 {
        format!("{count} fuente")
    } else {
        format!("{count} fuentes")
    }
}

/// First [`PREVIEW_CHARS`] characters, plus [`ELLIPSIS`] when the text is
/// longer than that.
///
/// Counts Unicode scalar values, so a grapheme cluster straddling the cut is
/// split.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Last `/` segment of `source`.  Falls back to the whole source when that
/// segment is empty, and to [`UNKNOWN_SOURCE`] when the source is empty or
/// absent.
pub fn short_name(source: Option<&str>) -> &str {
    let source = source.unwrap_or_default();
    let last = source.rsplit('/').next().unwrap_or_default();
    if !last.is_empty() {
        last
    } else if !source.is_empty() {
        source
    } else {
        UNKNOWN_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(source: Option<&str>, content: &str) -> Reference {
        Reference {
            source: source.map(str::to_string),
            content: content.to_string(),
        }
    }

    fn citation(index: Option<u64>, text: &str, refs: Vec<Reference>) -> Citation {
        Citation {
            citation_index: index,
            texto_citado: text.to_string(),
            referencias: refs,
            ..Citation::default()
        }
    }

    #[test]
    fn empty_collection_renders_nothing() {
        assert_eq!(render(&[]), None);
    }

    #[test]
    fn title_counts_citations() {
        let cs = vec![Citation::default(); 3];
        let panel = render(&cs).unwrap();
        assert_eq!(panel.title, "Citas y fuentes (3)");
        assert_eq!(panel.entries.len(), 3);
    }

    #[test]
    fn label_uses_index_or_position() {
        let cs = vec![
            citation(Some(9), "", vec![]),
            citation(None, "", vec![]),
            citation(None, "", vec![]),
        ];
        let panel = render(&cs).unwrap();
        let labels: Vec<_> = panel.entries.iter().map(|e| e.header.label.as_str()).collect();
        assert_eq!(labels, ["Cita #9", "Cita #2", "Cita #3"]);
        let keys: Vec<_> = panel.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["item-0", "item-1", "item-2"]);
    }

    #[test]
    fn badge_wording() {
        assert_eq!(source_badge(0), "0 fuentes");
        assert_eq!(source_badge(1), "1 fuente");
        assert_eq!(source_badge(2), "2 fuentes");
    }

    #[test]
    fn preview_truncates_past_eighty() {
        let exact = "b".repeat(80);
        assert_eq!(preview(&exact), exact);

        let long = "b".repeat(81);
        assert_eq!(preview(&long), format!("{}...", "b".repeat(80)));

        // multi-byte characters count once each
        let accented = "é".repeat(85);
        assert_eq!(preview(&accented), format!("{}...", "é".repeat(80)));
    }

    #[test]
    fn quote_block_only_with_text() {
        let mut with_text = citation(None, "línea uno\nlínea dos", vec![]);
        with_text.span_start = 12;
        with_text.span_end = 40;
        let panel = render(&[with_text, citation(None, "", vec![])]).unwrap();

        let quote = panel.entries[0].body.quote.as_ref().unwrap();
        assert_eq!(quote.label, "Texto citado (posiciones 12-40)");
        assert_eq!(quote.text, "línea uno\nlínea dos");
        assert_eq!(
            panel.entries[0].header.preview.as_deref(),
            Some("\"línea uno\nlínea dos\"")
        );

        assert_eq!(panel.entries[1].body.quote, None);
        assert_eq!(panel.entries[1].header.preview, None);
        assert_eq!(
            panel.entries[1].body.references_label,
            "Referencias que respaldan este fragmento (0):"
        );
    }

    #[test]
    fn missing_offsets_show_zero() {
        let panel = render(&[citation(None, "x", vec![])]).unwrap();
        assert_eq!(
            panel.entries[0].body.quote.as_ref().unwrap().label,
            "Texto citado (posiciones 0-0)"
        );
    }

    #[test]
    fn short_name_rules() {
        assert_eq!(short_name(Some("/docs/a.txt")), "a.txt");
        assert_eq!(short_name(Some("s3://bucket/dir/informe.pdf")), "informe.pdf");
        assert_eq!(short_name(Some("plain-id")), "plain-id");
        assert_eq!(short_name(Some("docs/")), "docs/");
        assert_eq!(short_name(Some("")), UNKNOWN_SOURCE);
        assert_eq!(short_name(None), UNKNOWN_SOURCE);
    }

    #[test]
    fn reference_blocks_keep_order_and_raw_values() {
        let refs = vec![
            reference(Some("/x/uno.md"), "  indented\n\tline"),
            reference(None, ""),
        ];
        let panel = render(&[citation(None, "", refs)]).unwrap();
        let blocks = &panel.entries[0].body.references;

        assert_eq!(blocks[0].label, "Fuente #1:");
        assert_eq!(blocks[0].source, "/x/uno.md");
        assert_eq!(blocks[0].short_name, "uno.md");
        assert_eq!(blocks[0].content, "  indented\n\tline");

        assert_eq!(blocks[1].label, "Fuente #2:");
        assert_eq!(blocks[1].source, "");
        assert_eq!(blocks[1].short_name, UNKNOWN_SOURCE);
    }

    #[test]
    fn worked_example() {
        let cs = vec![citation(
            Some(2),
            &"a".repeat(90),
            vec![reference(Some("/docs/a.txt"), "hi")],
        )];
        let panel = render(&cs).unwrap();
        let entry = &panel.entries[0];
        assert_eq!(entry.header.label, "Cita #2");
        assert_eq!(entry.header.badge, "1 fuente");
        assert_eq!(
            entry.header.preview.as_deref(),
            Some(format!("\"{}...\"", "a".repeat(80)).as_str())
        );
        assert_eq!(entry.body.references[0].short_name, "a.txt");
        assert_eq!(entry.body.references[0].content, "hi");
    }
}
