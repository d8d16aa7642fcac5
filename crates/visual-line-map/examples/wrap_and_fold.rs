use std::sync::Arc;

use visual_line_map::{
    DocumentView, FoldRegion, FontStyle, MonospaceMetrics, RopeDocument, TextSource, WrapBoundary,
    WrapConfig, WrapMode,
};

fn print_rows(view: &DocumentView<RopeDocument>) {
    for index in 0..view.visible_row_count() {
        let span = view.line_span_for_visual_row(index);
        let text = view.document().line_text(span.start.line);
        let row: String = text
            .chars()
            .skip(span.start.column)
            .take(span.end.column - span.start.column)
            .collect();
        println!("{:>3} | {:>2} | {row}", index, span.start.line);
    }
    println!();
}

fn main() {
    let source = "fn main() {\n    let words = [\"alpha\", \"beta\", \"gamma\", \"delta\"];\n    for word in words {\n        println!(\"{word}\");\n    }\n}";

    let style = FontStyle::new(Arc::new(MonospaceMetrics::new(8.0)), 14);
    let config = WrapConfig {
        boundary: WrapBoundary::LineBreakingColumn,
        ..WrapConfig::with_mode(WrapMode::Word)
    };
    let mut view = DocumentView::new(RopeDocument::from_text(source), style, config);

    // Wrap at column 24 regardless of the window size.
    let max_width = config
        .boundary
        .max_width(1024.0, 24, view.font_style().space_advance());
    view.set_max_width(max_width);
    print_rows(&view);

    // Collapse the loop body.
    view.declare_fold(FoldRegion::new(2, 4));
    assert!(view.fold(2));
    print_rows(&view);

    // Typing above the fold moves it along.
    view.edit(|doc| doc.insert(0, "// demo\n"));
    assert_eq!(view.collapsed_regions(), &[FoldRegion::new(3, 5)]);
    print_rows(&view);
}
