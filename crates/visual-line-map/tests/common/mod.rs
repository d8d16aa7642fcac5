#![allow(dead_code)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use visual_line_map::{
    DocumentView, FontStyle, MonospaceMetrics, RopeDocument, TextSource, VisibleIndex, WrapConfig,
    WrapMode,
};

pub fn mono_style() -> FontStyle {
    FontStyle::new(Arc::new(MonospaceMetrics::new(1.0)), 12)
}

pub fn view_with(text: &str, mode: WrapMode, width: f32) -> DocumentView<RopeDocument> {
    let mut view = DocumentView::new(
        RopeDocument::from_text(text),
        mono_style(),
        WrapConfig::with_mode(mode),
    );
    view.set_max_width(width);
    view
}

pub fn word_view(text: &str, width: f32) -> DocumentView<RopeDocument> {
    view_with(text, WrapMode::Word, width)
}

pub fn plain_view(text: &str) -> DocumentView<RopeDocument> {
    view_with(text, WrapMode::NoWrap, 0.0)
}

pub fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The incrementally maintained cache must equal a from-scratch rebuild.
pub fn assert_matches_rebuild<D: TextSource + Clone>(view: &DocumentView<D>) {
    let mut fresh = view.clone();
    fresh.rebuild();
    assert_eq!(view.visual_rows(), fresh.visual_rows(), "visual rows differ");
    assert_eq!(view.line_paddings(), fresh.line_paddings(), "paddings differ");
    assert_eq!(view.line_table(), fresh.line_table(), "line table differs");
}

/// Structural properties every materialized cache has.
pub fn assert_well_formed<D: TextSource>(view: &DocumentView<D>) {
    if view.is_identity_mapped() {
        assert!(view.visual_rows().is_empty());
        assert!(view.line_table().is_empty());
        assert!(view.line_paddings().is_empty());
        return;
    }

    let line_count = view.document().line_count();
    assert_eq!(view.line_table().len(), line_count);
    assert_eq!(view.line_paddings().len(), line_count);

    let rows = view.visual_rows();
    assert!(rows.windows(2).all(|pair| pair[0] < pair[1]));

    for (line, entry) in view.line_table().iter().enumerate() {
        match *entry {
            VisibleIndex::Valid(index) => {
                assert_eq!(rows[index].line, line);
                assert_eq!(rows[index].column, 0);
            }
            VisibleIndex::Invalid => {
                assert!(rows.iter().all(|row| row.line != line));
            }
        }
    }
}
