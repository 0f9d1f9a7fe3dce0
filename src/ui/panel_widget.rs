//! Custom Ratatui widget that draws a [`PanelView`] as an accordion: one
//! header per citation, with the body of the open entry laid out beneath it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::{accordion::AccordionState, panel::PanelView};

use super::theme::Theme;

/// Decorative glyph on the card title.
pub const DOCUMENT_GLYPH: &str = "▤";
/// Decorative glyph on every quoted-text block.
pub const QUOTE_GLYPH: &str = "❝";

const BODY_INDENT: &str = "   ";
const QUOTE_RULE: &str = "│ ";
const CONTENT_RULE: &str = "┆ ";
const TAB_AS_SPACES: &str = "    ";

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the panel widget (focused entry, scroll offset).
#[derive(Debug, Default)]
pub struct PanelWidgetState {
    /// Index of the entry whose header has the cursor.
    pub focused: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
    /// When set, the next render scrolls so the focused header is visible.
    /// Manual scrolling clears it so long bodies can be read past the header.
    pub follow_focus: bool,
}

impl PanelWidgetState {
    pub fn select_next(&mut self, entries: usize) {
        if entries > 0 && self.focused < entries - 1 {
            self.focused += 1;
        }
        self.follow_focus = true;
    }

    pub fn select_prev(&mut self) {
        self.focused = self.focused.saturating_sub(1);
        self.follow_focus = true;
    }

    pub fn focus(&mut self, entry: usize) {
        self.focused = entry;
        self.follow_focus = true;
    }

    /// Scroll by `delta` rows without moving the cursor.
    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self.offset.saturating_add_signed(delta);
        self.follow_focus = false;
    }

    /// Keep the offset in range and, if following, the focused header in view.
    pub fn clamp_scroll(&mut self, focus_row: Option<usize>, total_rows: usize, height: usize) {
        if height == 0 {
            return;
        }
        if self.follow_focus {
            if let Some(row) = focus_row {
                if row < self.offset {
                    self.offset = row;
                } else if row >= self.offset + height {
                    self.offset = row - height + 1;
                }
            }
        }
        self.offset = self.offset.min(total_rows.saturating_sub(height));
    }
}

// ───────────────────────────────────────── row model ─────────

/// What a single rendered row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Header {
        open: bool,
        label: String,
        badge: String,
    },
    Preview(String),
    QuoteLabel(String),
    QuoteText(String),
    SectionLabel(String),
    ReferenceLabel(String),
    Source(String),
    ShortName(String),
    Content(String),
    Spacer,
}

/// One rendered row in the panel, tagged with the entry it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub entry: usize,
    pub kind: RowKind,
}

impl PanelRow {
    pub fn is_header(&self) -> bool {
        matches!(self.kind, RowKind::Header { .. })
    }
}

/// Flatten `panel` into rows for a viewport `width` columns wide.
///
/// Only the entry open in `accordion` contributes body rows.  Every body row
/// is soft-wrapped to the columns left after its indent, so nothing is lost
/// at the card edge; quoted text and reference content also keep their own
/// line breaks.
pub fn build_rows(
    panel: &PanelView,
    accordion: &AccordionState,
    width: usize,
    show_preview: bool,
) -> Vec<PanelRow> {
    let mut rows = Vec::new();

    // Columns left for each row kind once its prefix is drawn.
    let label_cols = width.saturating_sub(BODY_INDENT.len());
    let quote_label_cols = label_cols.saturating_sub(2);
    let quote_cols = label_cols.saturating_sub(2);
    let detail_cols = width.saturating_sub(BODY_INDENT.len() * 2);
    let content_cols = detail_cols.saturating_sub(2);

    for (entry, view) in panel.entries.iter().enumerate() {
        let mut push = |kind| rows.push(PanelRow { entry, kind });
        let open = accordion.is_open(&view.key);

        push(RowKind::Header {
            open,
            label: view.header.label.clone(),
            badge: view.header.badge.clone(),
        });
        if show_preview {
            if let Some(preview) = &view.header.preview {
                push(RowKind::Preview(single_line(preview)));
            }
        }

        if !open {
            continue;
        }

        let mut push_wrapped = |text: &str, cols: usize, kind: fn(String) -> RowKind| {
            for line in wrap_text(text, cols) {
                push(kind(line));
            }
        };

        let body = &view.body;
        if let Some(quote) = &body.quote {
            push_wrapped(&quote.label, quote_label_cols, RowKind::QuoteLabel);
            push_wrapped(&quote.text, quote_cols, RowKind::QuoteText);
            push_wrapped("", 0, |_| RowKind::Spacer);
        }

        push_wrapped(&body.references_label, label_cols, RowKind::SectionLabel);
        for reference in &body.references {
            push_wrapped(&reference.label, label_cols, RowKind::ReferenceLabel);
            if !reference.source.is_empty() {
                push_wrapped(&reference.source, detail_cols, RowKind::Source);
            }
            push_wrapped(&reference.short_name, detail_cols, RowKind::ShortName);
            push_wrapped(&reference.content, content_cols, RowKind::Content);
        }
        push_wrapped("", 0, |_| RowKind::Spacer);
    }

    rows
}

/// Row index of `entry`'s header.
pub fn header_row(rows: &[PanelRow], entry: usize) -> Option<usize> {
    rows.iter()
        .position(|row| row.entry == entry && row.is_header())
}

/// Collapse line breaks for the one-line header preview.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ").replace('\t', " ")
}

/// Terminal columns taken by `c` (two for CJK and most emoji).
fn char_cols(c: char) -> usize {
    let mut utf8 = [0u8; 4];
    Span::raw(&*c.encode_utf8(&mut utf8)).width()
}

/// Split on line breaks (keeping blank lines), expand tabs, then hard-wrap
/// each line so no row takes more than `width` terminal columns.  A character
/// wider than `width` gets a row of its own.  A zero width disables wrapping.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw).replace('\t', TAB_AS_SPACES);
        if width == 0 {
            out.push(line);
            continue;
        }

        let mut current = String::new();
        let mut cols = 0;
        for c in line.chars() {
            let w = char_cols(c);
            if cols + w > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                cols = 0;
            }
            current.push(c);
            cols += w;
        }
        out.push(current);
    }
    out
}

// ───────────────────────────────────────── widget ────────────

/// The panel widget itself — created fresh each frame.
pub struct PanelWidget<'a> {
    panel: &'a PanelView,
    accordion: &'a AccordionState,
    block: Option<Block<'a>>,
    show_preview: bool,
}

impl<'a> PanelWidget<'a> {
    pub fn new(panel: &'a PanelView, accordion: &'a AccordionState) -> Self {
        Self {
            panel,
            accordion,
            block: None,
            show_preview: true,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn show_preview(mut self, show: bool) -> Self {
        self.show_preview = show;
        self
    }

    fn row_line(&self, row: &PanelRow, focused: bool) -> Line<'static> {
        match &row.kind {
            RowKind::Header { open, label, badge } => {
                let icon = if *open { "▼ " } else { "▶ " };
                let label_style = if focused {
                    Theme::focused_style()
                } else {
                    Theme::entry_label_style()
                };
                Line::from(vec![
                    Span::styled(format!("{icon}{label}"), label_style),
                    Span::raw("  "),
                    Span::styled(format!(" {badge} "), Theme::badge_style()),
                ])
            }
            RowKind::Preview(text) => Line::from(vec![
                Span::raw("  "),
                Span::styled(text.clone(), Theme::preview_style()),
            ]),
            RowKind::QuoteLabel(label) => Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(format!("{QUOTE_GLYPH} {label}"), Theme::quote_label_style()),
            ]),
            RowKind::QuoteText(text) => Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(QUOTE_RULE, Theme::quote_rule_style()),
                Span::styled(text.clone(), Theme::quote_text_style()),
            ]),
            RowKind::SectionLabel(label) => Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(label.clone(), Theme::section_label_style()),
            ]),
            RowKind::ReferenceLabel(label) => Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(label.clone(), Theme::entry_label_style()),
            ]),
            RowKind::Source(source) => Line::from(vec![
                Span::raw(BODY_INDENT.repeat(2)),
                Span::styled(source.clone(), Theme::source_style()),
            ]),
            RowKind::ShortName(name) => Line::from(vec![
                Span::raw(BODY_INDENT.repeat(2)),
                Span::styled(name.clone(), Theme::short_name_style()),
            ]),
            RowKind::Content(text) => Line::from(vec![
                Span::raw(BODY_INDENT.repeat(2)),
                Span::styled(CONTENT_RULE, Theme::muted_style()),
                Span::styled(text.clone(), Theme::content_style()),
            ]),
            RowKind::Spacer => Line::raw(""),
        }
    }
}

impl<'a> StatefulWidget for PanelWidget<'a> {
    type State = PanelWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let entries = self.panel.entries.len();
        if entries > 0 && state.focused >= entries {
            state.focused = entries - 1;
        }

        let rows = build_rows(
            self.panel,
            self.accordion,
            inner.width as usize,
            self.show_preview,
        );
        state.clamp_scroll(
            header_row(&rows, state.focused),
            rows.len(),
            inner.height as usize,
        );

        let visible_rows = rows
            .iter()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, row) in visible_rows.enumerate() {
            let y = inner.y + i as u16;
            let focused = row.is_header() && row.entry == state.focused;
            let line = self.row_line(row, focused);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::citation::{Citation, Reference};
    use crate::core::panel;

    fn sample() -> PanelView {
        let citations = vec![
            Citation {
                citation_index: Some(1),
                texto_citado: "primera\nsegunda".into(),
                span_start: 3,
                span_end: 18,
                referencias: vec![
                    Reference {
                        source: Some("/kb/manual.md".into()),
                        content: "uno\n\tdos".into(),
                    },
                    Reference::default(),
                ],
            },
            Citation {
                referencias: vec![Reference::default()],
                ..Citation::default()
            },
        ];
        panel::render(&citations).unwrap()
    }

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn collapsed_shows_only_headers_and_previews() {
        let rows = build_rows(&sample(), &AccordionState::default(), 60, true);
        let kinds: Vec<_> = rows.iter().map(|r| &r.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], RowKind::Header { open: false, .. }));
        assert_eq!(kinds[1], &RowKind::Preview("\"primera segunda\"".into()));
        assert!(matches!(kinds[2], RowKind::Header { .. }));
        assert_eq!(header_row(&rows, 1), Some(2));
    }

    #[test]
    fn previews_can_be_hidden() {
        let rows = build_rows(&sample(), &AccordionState::default(), 60, false);
        assert!(rows.iter().all(PanelRow::is_header));
    }

    #[test]
    fn open_entry_lists_body_in_order() {
        let rows = build_rows(&sample(), &AccordionState::with_open("item-0"), 60, false);
        let body: Vec<_> = rows
            .iter()
            .filter(|r| r.entry == 0 && !r.is_header())
            .map(|r| r.kind.clone())
            .collect();
        assert_eq!(
            body,
            vec![
                RowKind::QuoteLabel("Texto citado (posiciones 3-18)".into()),
                RowKind::QuoteText("primera".into()),
                RowKind::QuoteText("segunda".into()),
                RowKind::Spacer,
                RowKind::SectionLabel("Referencias que respaldan este fragmento (2):".into()),
                RowKind::ReferenceLabel("Fuente #1:".into()),
                RowKind::Source("/kb/manual.md".into()),
                RowKind::ShortName("manual.md".into()),
                RowKind::Content("uno".into()),
                RowKind::Content("    dos".into()),
                RowKind::ReferenceLabel("Fuente #2:".into()),
                RowKind::ShortName("Fuente desconocida".into()),
                RowKind::Content("".into()),
                RowKind::Spacer,
            ]
        );
        // the other entry stays closed
        assert!(rows.iter().filter(|r| r.entry == 1).all(PanelRow::is_header));
    }

    #[test]
    fn long_lines_wrap() {
        assert_eq!(wrap_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_text("a\n\nb", 3), vec!["a", "", "b"]);
        assert_eq!(wrap_text("abcdef", 0), vec!["abcdef"]);
        // double-width characters count as two columns
        assert_eq!(wrap_text("一二三四五", 4), vec!["一二", "三四", "五"]);
        assert_eq!(wrap_text("a一b", 2), vec!["a", "一", "b"]);
        assert_eq!(wrap_text("一", 1), vec!["一"]);
    }

    #[test]
    fn wide_quote_wraps_by_columns() {
        let text = "一二三四五六七八九十甲乙丙丁戊己庚辛壬癸";
        let citations = vec![Citation {
            texto_citado: text.into(),
            ..Citation::default()
        }];
        let panel = panel::render(&citations).unwrap();
        let accordion = AccordionState::with_open("item-0");

        // 25 columns leave 20 for the quote after indent and rule.
        let rows = build_rows(&panel, &accordion, 25, false);
        let quote: Vec<_> = rows
            .iter()
            .filter_map(|r| match &r.kind {
                RowKind::QuoteText(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(quote, vec!["一二三四五六七八九十", "甲乙丙丁戊己庚辛壬癸"]);

        let area = Rect::new(0, 0, 25, 12);
        let mut buf = Buffer::empty(area);
        let mut state = PanelWidgetState::default();
        PanelWidget::new(&panel, &accordion)
            .show_preview(false)
            .render(area, &mut buf, &mut state);
        let drawn: String = buffer_lines(&buf)
            .concat()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '│')
            .collect();
        assert!(drawn.contains(text));
    }

    #[test]
    fn long_source_and_labels_wrap_instead_of_clipping() {
        let source = "s3://taller-rag-kb-bucket/documentos/politicas/2024/manual-de-procedimientos.pdf";
        let citations = vec![Citation {
            referencias: vec![Reference {
                source: Some(source.into()),
                content: "x".into(),
            }],
            ..Citation::default()
        }];
        let panel = panel::render(&citations).unwrap();
        let accordion = AccordionState::with_open("item-0");

        let rows = build_rows(&panel, &accordion, 40, false);
        let pieces: Vec<_> = rows
            .iter()
            .filter_map(|r| match &r.kind {
                RowKind::Source(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert!(pieces.len() > 1);
        assert!(pieces.iter().all(|p| p.chars().count() <= 34));
        assert_eq!(pieces.concat(), source);

        let section: String = rows
            .iter()
            .filter_map(|r| match &r.kind {
                RowKind::SectionLabel(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(section, "Referencias que respaldan este fragmento (1):");

        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let mut state = PanelWidgetState::default();
        PanelWidget::new(&panel, &accordion)
            .show_preview(false)
            .render(area, &mut buf, &mut state);
        let lines = buffer_lines(&buf);
        for piece in &pieces {
            assert!(lines.iter().any(|l| l.trim_start() == *piece));
        }
    }

    #[test]
    fn clamp_follows_focus_until_manual_scroll() {
        let mut state = PanelWidgetState {
            focused: 0,
            offset: 0,
            follow_focus: true,
        };
        state.clamp_scroll(Some(30), 40, 10);
        assert_eq!(state.offset, 21);

        state.scroll_by(-5);
        state.clamp_scroll(Some(30), 40, 10);
        assert_eq!(state.offset, 16);

        state.scroll_by(100);
        state.clamp_scroll(Some(30), 40, 10);
        assert_eq!(state.offset, 30);
    }

    #[test]
    fn renders_headers_and_open_body() {
        let panel = sample();
        let accordion = AccordionState::with_open("item-0");
        let area = Rect::new(0, 0, 50, 20);
        let mut buf = Buffer::empty(area);
        let mut state = PanelWidgetState::default();

        PanelWidget::new(&panel, &accordion).render(area, &mut buf, &mut state);
        let lines = buffer_lines(&buf);

        assert!(lines[0].contains("Cita #1"));
        assert!(lines[0].contains("2 fuentes"));
        assert!(lines.iter().any(|l| l.contains("Texto citado (posiciones 3-18)")));
        assert!(lines.iter().any(|l| l.contains("manual.md")));
        let last_header = lines.iter().position(|l| l.contains("Cita #2")).unwrap();
        assert!(lines[last_header].contains("1 fuente"));
        assert!(!lines[last_header].contains("1 fuentes"));
    }

    #[test]
    fn focus_clamped_to_entries() {
        let panel = sample();
        let accordion = AccordionState::default();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        let mut state = PanelWidgetState {
            focused: 9,
            ..PanelWidgetState::default()
        };
        PanelWidget::new(&panel, &accordion).render(area, &mut buf, &mut state);
        assert_eq!(state.focused, 1);
    }
}
