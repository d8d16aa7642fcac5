//! View cache: the mapping from logical lines to visual rows.
//!
//! [`DocumentView`] keeps three parallel structures:
//!
//! - `rows`: every visible visual row in render order, as `(line, start column)`;
//! - `line_table`: for each logical line, the index of its first row (or `Invalid` when the
//!   line is hidden by a fold);
//! - `paddings`: for each logical line, the indentation continuation rows are aligned to.
//!
//! When wrapping is off and nothing is folded the mapping is the identity and none of these
//! are materialized. Configuration changes rebuild everything; document edits are patched in
//! place by [`DocumentView::apply_edit`], touching only the edited lines' rows plus one pass
//! over the following index entries.

use tracing::{debug, trace, warn};

use crate::config::{WrapBoundary, WrapConfig, WrapMode};
use crate::document::{LineEdit, TextSource};
use crate::folding::{FoldRegion, FoldTracker};
use crate::metrics::FontStyle;
use crate::position::{TextPosition, TextRange, VisibleIndex, VisualRow};
use crate::wrap::LineWrapper;

/// All visual rows of one logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLineInfo {
    /// Index of the line's first row (`Invalid` if hidden).
    pub visible_index: VisibleIndex,
    /// The line's rows, first to last (empty if hidden).
    pub rows: Vec<VisualRow>,
    /// Continuation padding of the line.
    pub padding_start: f32,
}

/// The visual row of a wrapped line that contains a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleLineRange {
    /// Index of the row.
    pub visible_index: VisibleIndex,
    /// Text covered by the row.
    pub range: TextRange,
}

/// Logical-line to visual-row mapping of one document.
///
/// The view owns its document handle `D` (use `Arc<T>` to share it). Every change made to the
/// document must be reported through [`apply_edit`](Self::apply_edit) (or made through
/// [`edit`](Self::edit)) before the next query.
#[derive(Debug, Clone)]
pub struct DocumentView<D> {
    doc: D,
    font_style: FontStyle,
    config: WrapConfig,
    max_width: f32,
    folds: FoldTracker,
    rows: Vec<VisualRow>,
    paddings: Vec<f32>,
    line_table: Vec<VisibleIndex>,
    pending_rebuild: bool,
}

impl<D: TextSource> DocumentView<D> {
    /// Create a view over `doc` and build its cache (deferred while the document is loading).
    ///
    /// The wrap width starts at 0, which keeps every line on a single row until
    /// [`set_max_width`](Self::set_max_width) is called.
    pub fn new(doc: D, font_style: FontStyle, config: WrapConfig) -> Self {
        let mut view = Self {
            doc,
            font_style,
            config,
            max_width: 0.0,
            folds: FoldTracker::new(),
            rows: Vec::new(),
            paddings: Vec::new(),
            line_table: Vec::new(),
            pending_rebuild: false,
        };
        view.rebuild();
        view
    }

    /// The bound document.
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable access to the bound document.
    ///
    /// Edits made through this reference must be followed by [`apply_edit`](Self::apply_edit).
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    /// Bind another document, dropping every fold region and rebuilding. Returns the old one.
    pub fn set_document(&mut self, doc: D) -> D {
        let old = std::mem::replace(&mut self.doc, doc);
        self.folds.clear();
        self.rebuild();
        old
    }

    /// Current font style.
    pub fn font_style(&self) -> &FontStyle {
        &self.font_style
    }

    /// Current wrap configuration.
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    /// Current wrap width.
    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Fold state.
    pub fn folds(&self) -> &FoldTracker {
        &self.folds
    }

    /// Whether soft wrapping is enabled.
    pub fn is_wrap_enabled(&self) -> bool {
        self.config.is_wrap_enabled()
    }

    /// Whether logical lines and visual rows coincide (wrapping off, nothing collapsed).
    pub fn is_identity_mapped(&self) -> bool {
        !self.config.is_wrap_enabled() && !self.folds.has_collapsed()
    }

    /// Whether a rebuild is waiting for the document to finish loading.
    pub fn is_pending_rebuild(&self) -> bool {
        self.pending_rebuild
    }

    // Queries answer one-to-one while a rebuild is pending.
    fn is_one_to_one(&self) -> bool {
        self.is_identity_mapped() || self.pending_rebuild
    }

    /// Set the wrap width. An unchanged width still runs a pending rebuild.
    pub fn set_max_width(&mut self, max_width: f32) {
        if max_width != self.max_width {
            self.max_width = max_width;
            self.rebuild();
        } else if self.pending_rebuild {
            self.rebuild();
        }
    }

    /// Set the font style; rebuilds if it changed.
    pub fn set_font_style(&mut self, font_style: FontStyle) {
        if font_style != self.font_style {
            self.font_style = font_style;
            self.rebuild();
        }
    }

    /// Set the wrap configuration; rebuilds if it changed.
    pub fn set_config(&mut self, config: WrapConfig) {
        if config != self.config {
            self.config = config;
            self.rebuild();
        }
    }

    /// Set the wrap mode; rebuilds if it changed.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.set_config(WrapConfig {
            mode,
            ..self.config
        });
    }

    /// Set the wrap boundary; rebuilds if it changed.
    pub fn set_wrap_boundary(&mut self, boundary: WrapBoundary) {
        self.set_config(WrapConfig {
            boundary,
            ..self.config
        });
    }

    /// Set the tab width (clamped to at least 1); rebuilds if it changed.
    pub fn set_tab_width(&mut self, tab_width: u32) {
        self.set_config(WrapConfig {
            tab_width: tab_width.max(1),
            ..self.config
        });
    }

    /// Set whether continuation rows keep the line's indentation; rebuilds if it changed.
    pub fn set_keep_indentation(&mut self, keep_indentation: bool) {
        self.set_config(WrapConfig {
            keep_indentation,
            ..self.config
        });
    }

    fn clear_cache(&mut self) {
        self.rows.clear();
        self.paddings.clear();
        self.line_table.clear();
    }

    /// Rebuild the whole cache.
    ///
    /// In identity mode the cache is dropped instead. While the document is loading the
    /// rebuild is deferred until [`refresh`](Self::refresh).
    pub fn rebuild(&mut self) {
        if self.is_identity_mapped() {
            self.clear_cache();
            self.pending_rebuild = false;
            return;
        }

        if self.doc.is_loading() {
            debug!("document is loading, deferring visual line cache rebuild");
            self.pending_rebuild = true;
            return;
        }

        self.pending_rebuild = false;
        self.clear_cache();

        let line_count = self.doc.line_count();
        self.rows.reserve(line_count);
        self.paddings.reserve(line_count);
        self.line_table.reserve(line_count);

        let wrapper = LineWrapper::new(&self.font_style, &self.config, self.max_width);
        for line in 0..line_count {
            let text = self.doc.line_text(line);
            if self.folds.is_hidden(line) {
                self.paddings.push(wrapper.padding(&text));
                self.line_table.push(VisibleIndex::Invalid);
            } else {
                let info = wrapper.breaks(&text);
                self.paddings.push(info.padding_start);
                self.line_table.push(VisibleIndex::Valid(self.rows.len()));
                self.rows.extend(
                    info.breaks
                        .into_iter()
                        .map(|column| VisualRow::new(line, column)),
                );
            }
        }

        debug_assert_eq!(self.line_table.len(), line_count);
        debug!(
            line_count,
            rows = self.rows.len(),
            "rebuilt visual line cache"
        );
    }

    /// Run a deferred rebuild if the document finished loading. Returns whether it ran.
    pub fn refresh(&mut self) -> bool {
        if self.pending_rebuild && !self.doc.is_loading() {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Drop every fold region and rebuild.
    pub fn clear(&mut self) {
        self.folds.clear();
        self.rebuild();
    }

    /// Number of visible rows.
    pub fn visible_row_count(&self) -> usize {
        if self.is_one_to_one() {
            self.doc.line_count()
        } else {
            self.rows.len()
        }
    }

    fn clamp_line(&self, line: usize) -> usize {
        debug_assert!(
            line < self.line_table.len(),
            "line {line} out of range ({} lines)",
            self.line_table.len()
        );
        line.min(self.line_table.len().saturating_sub(1))
    }

    fn clamp_row(&self, index: usize) -> usize {
        debug_assert!(
            index < self.rows.len(),
            "visual row {index} out of range ({} rows)",
            self.rows.len()
        );
        index.min(self.rows.len().saturating_sub(1))
    }

    /// Index of the first visual row of `line`.
    ///
    /// While a rebuild is pending this is `Valid(line)`, even for a line inside a collapsed fold.
    pub fn to_first_visual_row(&self, line: usize) -> VisibleIndex {
        if self.is_one_to_one() {
            return VisibleIndex::Valid(line);
        }
        if self.line_table.is_empty() {
            return VisibleIndex::Invalid;
        }
        self.line_table[self.clamp_line(line)]
    }

    /// Index of the last visual row of `line`.
    pub fn to_last_visual_row(&self, line: usize) -> VisibleIndex {
        let first = self.to_first_visual_row(line);
        if self.is_one_to_one() {
            return first;
        }
        let VisibleIndex::Valid(first) = first else {
            return VisibleIndex::Invalid;
        };
        let Some(row) = self.rows.get(first) else {
            return VisibleIndex::Invalid;
        };
        let continuation = self.rows[first + 1..]
            .iter()
            .take_while(|next| next.line == row.line)
            .count();
        VisibleIndex::Valid(first + continuation)
    }

    /// Position where visual row `index` starts.
    pub fn visual_row_to_position(&self, index: usize) -> TextPosition {
        if self.is_one_to_one() {
            return TextPosition::new(index, 0);
        }
        if self.rows.is_empty() {
            return TextPosition::default();
        }
        self.rows[self.clamp_row(index)].position()
    }

    /// Text covered by visual row `index`.
    pub fn line_span_for_visual_row(&self, index: usize) -> TextRange {
        if self.is_one_to_one() {
            return self.doc.line_range(index);
        }
        if self.rows.is_empty() {
            return TextRange::default();
        }
        let index = self.clamp_row(index);
        let start = self.rows[index].position();
        let end_column = match self.rows.get(index + 1) {
            Some(next) if next.line == start.line => next.column,
            _ => self.doc.line_len(start.line),
        };
        TextRange::new(start, TextPosition::new(start.line, end_column))
    }

    /// Y offset of visual row `index`.
    pub fn row_y_offset(&self, index: usize, row_height: f32) -> f32 {
        index as f32 * row_height
    }

    /// Y offset of the first row of `line`, or `None` if the line is hidden.
    pub fn line_y_offset(&self, line: usize, row_height: f32) -> Option<f32> {
        self.to_first_visual_row(line)
            .get()
            .map(|index| self.row_y_offset(index, row_height))
    }

    /// Whether `line` has at least one visible row.
    ///
    /// Always `true` while a rebuild is pending, folds included.
    pub fn is_line_visible(&self, line: usize) -> bool {
        self.to_first_visual_row(line).is_valid()
    }

    /// Whether `line` occupies more than one visual row.
    pub fn is_wrapped_line(&self, line: usize) -> bool {
        if !self.is_wrap_enabled() || self.is_one_to_one() {
            return false;
        }
        let VisibleIndex::Valid(first) = self.to_first_visual_row(line) else {
            return false;
        };
        self.rows
            .get(first + 1)
            .is_some_and(|next| next.line == self.rows[first].line)
    }

    /// Continuation padding of `line`.
    pub fn line_padding(&self, line: usize) -> f32 {
        if self.is_one_to_one() || self.paddings.is_empty() {
            return 0.0;
        }
        self.paddings[self.clamp_line(line)]
    }

    /// All rows of `line`.
    pub fn visible_line_info(&self, line: usize) -> VisibleLineInfo {
        if self.is_one_to_one() {
            return VisibleLineInfo {
                visible_index: VisibleIndex::Valid(line),
                rows: vec![VisualRow::new(line, 0)],
                padding_start: 0.0,
            };
        }
        let rows = match (self.to_first_visual_row(line), self.to_last_visual_row(line)) {
            (VisibleIndex::Valid(first), VisibleIndex::Valid(last)) => {
                self.rows[first..=last].to_vec()
            }
            _ => Vec::new(),
        };
        VisibleLineInfo {
            visible_index: self.to_first_visual_row(line),
            rows,
            padding_start: self.line_padding(line),
        }
    }

    /// The row of `pos.line` containing `pos`, with the text it covers.
    ///
    /// With `allow_visual_line_end` a position on a break column belongs to the row that ends
    /// there; otherwise it belongs to the row that starts there.
    pub fn visible_line_range(
        &self,
        pos: TextPosition,
        allow_visual_line_end: bool,
    ) -> VisibleLineRange {
        let line_range = || self.doc.line_range(pos.line);
        if self.is_one_to_one() {
            return VisibleLineRange {
                visible_index: VisibleIndex::Valid(pos.line),
                range: line_range(),
            };
        }

        let (VisibleIndex::Valid(first), VisibleIndex::Valid(last)) = (
            self.to_first_visual_row(pos.line),
            self.to_last_visual_row(pos.line),
        ) else {
            return VisibleLineRange {
                visible_index: VisibleIndex::Invalid,
                range: line_range(),
            };
        };

        let end_adjust = usize::from(!allow_visual_line_end);
        for index in first..last {
            let from_column = self.rows[index].column;
            let to_column = self.rows[index + 1].column - end_adjust;
            if pos.column >= from_column && pos.column <= to_column {
                return VisibleLineRange {
                    visible_index: VisibleIndex::Valid(index),
                    range: TextRange::new(
                        TextPosition::new(pos.line, from_column),
                        TextPosition::new(pos.line, to_column),
                    ),
                };
            }
        }

        VisibleLineRange {
            visible_index: VisibleIndex::Valid(last),
            range: TextRange::new(
                TextPosition::new(pos.line, self.rows[last].column),
                self.doc.end_of_line(pos),
            ),
        }
    }

    /// Materialized rows (empty in identity mode).
    pub fn visual_rows(&self) -> &[VisualRow] {
        &self.rows
    }

    /// Materialized per-line paddings (empty in identity mode).
    pub fn line_paddings(&self) -> &[f32] {
        &self.paddings
    }

    /// Materialized line → first-row table (empty in identity mode).
    pub fn line_table(&self) -> &[VisibleIndex] {
        &self.line_table
    }

    /// Declare a foldable region (replacing one declared at the same start line).
    pub fn declare_fold(&mut self, region: impl Into<FoldRegion>) {
        self.folds.declare(region);
    }

    /// Forget the region declared at `start_line`, unfolding it first if collapsed.
    pub fn remove_fold(&mut self, start_line: usize) -> Option<FoldRegion> {
        if self.folds.is_collapsed(start_line) {
            self.unfold(start_line);
        }
        self.folds.undeclare(start_line)
    }

    /// Whether a region is declared at `line`.
    pub fn is_fold_start(&self, line: usize) -> bool {
        self.folds.is_fold_start(line)
    }

    /// Whether `line` lies within a collapsed region (start line included).
    pub fn is_folded(&self, line: usize) -> bool {
        self.folds.is_folded(line)
    }

    /// Declared regions ordered by start line.
    pub fn fold_regions(&self) -> impl Iterator<Item = FoldRegion> + '_ {
        self.folds.declared()
    }

    /// Collapsed regions ordered by start line.
    pub fn collapsed_regions(&self) -> &[FoldRegion] {
        self.folds.collapsed()
    }

    /// Collapse the region declared at `start_line`.
    ///
    /// Returns `false` (and changes nothing) when no region is declared there, the region
    /// starts past the end of the document, or it overlaps a region that is already collapsed.
    pub fn fold(&mut self, start_line: usize) -> bool {
        let Some(region) = self.folds.declared_at(start_line) else {
            return false;
        };
        if region.start_line >= self.doc.line_count() || self.folds.intersects_collapsed(&region)
        {
            debug!(
                start_line = region.start_line,
                end_line = region.end_line,
                "refusing to collapse fold region"
            );
            return false;
        }

        let was_identity = self.is_identity_mapped();
        if !was_identity && !self.pending_rebuild {
            self.set_visible(region.start_line + 1, region.end_line, false);
        }
        self.folds.collapse(region);

        // Leaving identity mode: there is no cache to patch yet.
        if was_identity {
            self.rebuild();
        }
        true
    }

    /// Expand the collapsed region starting at `start_line`. Returns `false` if none is.
    pub fn unfold(&mut self, start_line: usize) -> bool {
        let Some(region) = self.folds.expand(start_line) else {
            return false;
        };

        if self.is_identity_mapped() {
            self.clear_cache();
            self.pending_rebuild = false;
        } else if !self.pending_rebuild {
            self.set_visible(region.start_line + 1, region.end_line, true);
        }
        true
    }

    /// Fold or unfold the region at `start_line`. Returns whether anything changed.
    pub fn toggle_fold(&mut self, start_line: usize) -> bool {
        if self.folds.is_collapsed(start_line) {
            self.unfold(start_line)
        } else {
            self.fold(start_line)
        }
    }

    /// Expand every collapsed region.
    pub fn unfold_all(&mut self) {
        if self.folds.expand_all().is_empty() {
            return;
        }
        self.rebuild();
    }

    fn first_row_at_or_after(&self, line: usize) -> usize {
        match self.line_table.get(line) {
            Some(VisibleIndex::Valid(index)) => *index,
            _ => self.rows.partition_point(|row| row.line < line),
        }
    }

    fn set_visible(&mut self, from_line: usize, to_line: usize, visible: bool) {
        let to_line = to_line.min(self.line_table.len().saturating_sub(1));
        if from_line > to_line {
            return;
        }
        if visible {
            self.show_lines(from_line, to_line);
        } else {
            self.hide_lines(from_line, to_line);
        }
    }

    fn hide_lines(&mut self, from_line: usize, to_line: usize) {
        let start = self.first_row_at_or_after(from_line);
        let end = self.first_row_at_or_after(to_line + 1);
        let removed = end - start;

        self.rows.drain(start..end);
        for entry in &mut self.line_table[from_line..=to_line] {
            *entry = VisibleIndex::Invalid;
        }
        for entry in &mut self.line_table[to_line + 1..] {
            if let VisibleIndex::Valid(index) = entry {
                *index -= removed;
            }
        }
    }

    fn show_lines(&mut self, from_line: usize, to_line: usize) {
        let at = self
            .rows
            .partition_point(|row| *row < VisualRow::new(from_line, 0));

        let wrapper = LineWrapper::new(&self.font_style, &self.config, self.max_width);
        let mut inserted = Vec::new();
        for line in from_line..=to_line {
            let text = self.doc.line_text(line);
            if self.folds.is_hidden(line) {
                self.paddings[line] = wrapper.padding(&text);
                self.line_table[line] = VisibleIndex::Invalid;
                continue;
            }
            let info = wrapper.breaks(&text);
            self.paddings[line] = info.padding_start;
            self.line_table[line] = VisibleIndex::Valid(at + inserted.len());
            inserted.extend(
                info.breaks
                    .into_iter()
                    .map(|column| VisualRow::new(line, column)),
            );
        }

        let count = inserted.len();
        self.rows.splice(at..at, inserted);
        for entry in &mut self.line_table[to_line + 1..] {
            if let VisibleIndex::Valid(index) = entry {
                *index += count;
            }
        }
    }

    /// Apply an edit described by a [`LineEdit`].
    pub fn apply_line_edit(&mut self, edit: LineEdit) {
        self.apply_edit(edit.from_line, edit.to_line_before_edit, edit.line_delta);
    }

    /// Run `edit` against the document and patch the cache with the [`LineEdit`] it returns.
    pub fn edit<F>(&mut self, edit: F) -> LineEdit
    where
        F: FnOnce(&mut D) -> LineEdit,
    {
        let line_edit = edit(&mut self.doc);
        self.apply_line_edit(line_edit);
        line_edit
    }

    /// Patch the cache after the document replaced lines `from_line..=to_line_before_edit`
    /// (numbered before the edit) and changed the line count by `line_delta`.
    ///
    /// Fold regions are shifted even in identity mode; collapsed regions the edit leaves empty
    /// or overlapping are expanded (see [`FoldTracker::shift`]) and the cache rebuilt. The
    /// document must already contain the edit; a line count that disagrees with `line_delta`
    /// falls back to a full rebuild.
    pub fn apply_edit(&mut self, from_line: usize, to_line_before_edit: usize, line_delta: isize) {
        debug_assert!(from_line <= to_line_before_edit);
        let to_line_before_edit = to_line_before_edit.max(from_line);

        let expanded = self.folds.shift(from_line, line_delta);
        if !expanded.is_empty() {
            debug!(
                from_line,
                line_delta,
                expanded = expanded.len(),
                "edit squeezed collapsed fold regions together, expanding"
            );
            self.rebuild();
            return;
        }

        if self.is_one_to_one() {
            return;
        }
        if self.doc.is_loading() {
            self.pending_rebuild = true;
            return;
        }

        let line_count = self.doc.line_count();
        let old_line_count = self.line_table.len();
        let to_line_after_edit = to_line_before_edit as isize + line_delta;
        if to_line_before_edit >= old_line_count
            || old_line_count as isize + line_delta != line_count as isize
            || to_line_after_edit < from_line as isize
        {
            warn!(
                from_line,
                to_line_before_edit,
                line_delta,
                old_line_count,
                line_count,
                "edit does not match the document, rebuilding visual line cache"
            );
            self.rebuild();
            return;
        }
        let to_line_after_edit = to_line_after_edit as usize;

        let start = self.first_row_at_or_after(from_line);
        let end = self.first_row_at_or_after(to_line_before_edit + 1);

        if line_delta != 0 {
            for row in &mut self.rows[end..] {
                row.line = (row.line as isize + line_delta) as usize;
            }
        }

        let wrapper = LineWrapper::new(&self.font_style, &self.config, self.max_width);
        let mut new_rows = Vec::new();
        let mut new_paddings = Vec::with_capacity(to_line_after_edit - from_line + 1);
        for line in from_line..=to_line_after_edit {
            let text = self.doc.line_text(line);
            if self.folds.is_hidden(line) {
                new_paddings.push(wrapper.padding(&text));
                continue;
            }
            let info = wrapper.breaks(&text);
            new_paddings.push(info.padding_start);
            new_rows.extend(
                info.breaks
                    .into_iter()
                    .map(|column| VisualRow::new(line, column)),
            );
        }

        trace!(
            from_line,
            to_line_before_edit,
            line_delta,
            removed_rows = end - start,
            inserted_rows = new_rows.len(),
            "patching visual line cache"
        );

        self.rows.splice(start..end, new_rows);
        self.paddings
            .splice(from_line..=to_line_before_edit, new_paddings);
        self.line_table.resize(line_count, VisibleIndex::Invalid);
        self.reindex_from(start, from_line);
    }

    // Rewrites every table entry from `from_line` on; `start_row` is that line's splice point.
    fn reindex_from(&mut self, start_row: usize, from_line: usize) {
        let mut next_line = from_line;
        for (index, row) in self.rows.iter().enumerate().skip(start_row) {
            if row.column != 0 {
                continue;
            }
            for hidden in &mut self.line_table[next_line..row.line] {
                *hidden = VisibleIndex::Invalid;
            }
            self.line_table[row.line] = VisibleIndex::Valid(index);
            next_line = row.line + 1;
        }
        for hidden in &mut self.line_table[next_line..] {
            *hidden = VisibleIndex::Invalid;
        }
    }
}
