//! Text collaborator.
//!
//! [`TextSource`] is the read-only interface the view consumes. [`RopeDocument`] is a
//! rope-backed implementation (O(log N) line access and editing) whose editing methods report
//! each change as a [`LineEdit`] ready to be handed to
//! [`DocumentView::apply_line_edit`](crate::DocumentView::apply_line_edit).

use std::borrow::Cow;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use ropey::Rope;

use crate::position::{TextPosition, TextRange};

/// Read access to a line-oriented document.
pub trait TextSource {
    /// Number of logical lines (at least 1; an empty document has one empty line).
    fn line_count(&self) -> usize;

    /// Text of `line` without its line break.
    fn line_text(&self, line: usize) -> Cow<'_, str>;

    /// Content hash of `line`, for change detection.
    fn line_hash(&self, line: usize) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.line_text(line).hash(&mut hasher);
        hasher.finish()
    }

    /// Whether a bulk load is still populating the document.
    fn is_loading(&self) -> bool {
        false
    }

    /// Length of `line` in characters.
    fn line_len(&self, line: usize) -> usize {
        self.line_text(line).chars().count()
    }

    /// Range spanning the whole of `line`.
    fn line_range(&self, line: usize) -> TextRange {
        TextRange::new(
            TextPosition::new(line, 0),
            TextPosition::new(line, self.line_len(line)),
        )
    }

    /// Position just past the last character of `pos.line`.
    fn end_of_line(&self, pos: TextPosition) -> TextPosition {
        TextPosition::new(pos.line, self.line_len(pos.line))
    }
}

impl<T: TextSource + ?Sized> TextSource for Arc<T> {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        (**self).line_text(line)
    }

    fn line_hash(&self, line: usize) -> u64 {
        (**self).line_hash(line)
    }

    fn is_loading(&self) -> bool {
        (**self).is_loading()
    }

    fn line_len(&self, line: usize) -> usize {
        (**self).line_len(line)
    }
}

impl TextSource for Vec<String> {
    fn line_count(&self) -> usize {
        self.len().max(1)
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        self.get(line)
            .map_or(Cow::Borrowed(""), |text| Cow::Borrowed(text.as_str()))
    }
}

/// Description of one document mutation in logical-line terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEdit {
    /// First affected line (same before and after the edit).
    pub from_line: usize,
    /// Last affected line, numbered before the edit.
    pub to_line_before_edit: usize,
    /// Net change in line count.
    pub line_delta: isize,
}

impl LineEdit {
    /// Last affected line, numbered after the edit.
    pub fn to_line_after_edit(&self) -> usize {
        (self.to_line_before_edit as isize + self.line_delta).max(self.from_line as isize) as usize
    }
}

/// Rope-backed document.
#[derive(Debug, Clone, Default)]
pub struct RopeDocument {
    rope: Rope,
    loading: bool,
}

fn strip_line_break(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

impl RopeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            loading: false,
        }
    }

    /// Mark the start of a bulk load; the view defers construction until
    /// [`finish_loading`](Self::finish_loading).
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Append a chunk of text (typically while loading).
    pub fn append(&mut self, chunk: &str) {
        self.rope.insert(self.rope.len_chars(), chunk);
    }

    /// Mark the end of a bulk load.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Get complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character offset of a line/column position (clamped to the document).
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line) + column.min(self.line_len(line))
    }

    /// Line/column position of a character offset (clamped to the document).
    pub fn char_offset_to_position(&self, char_offset: usize) -> TextPosition {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        TextPosition::new(line, char_offset - self.rope.line_to_char(line))
    }

    /// Insert `text` at `char_offset`.
    pub fn insert(&mut self, char_offset: usize, text: &str) -> LineEdit {
        self.replace(char_offset..char_offset, text)
    }

    /// Remove the characters in `range`.
    pub fn remove(&mut self, range: Range<usize>) -> LineEdit {
        self.replace(range, "")
    }

    /// Replace the characters in `range` with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> LineEdit {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);

        // A "\r\n" pair belongs to one line, so `start` is always on the first changed line.
        let from_line = self.rope.char_to_line(start);
        let to_line_before_edit = self.rope.char_to_line(end);
        let lines_before = self.rope.len_lines();

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }

        LineEdit {
            from_line,
            to_line_before_edit,
            line_delta: self.rope.len_lines() as isize - lines_before as isize,
        }
    }
}

impl TextSource for RopeDocument {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        if line >= self.rope.len_lines() {
            return Cow::Borrowed("");
        }
        let slice = self.rope.line(line);
        match slice.as_str() {
            Some(text) => Cow::Borrowed(strip_line_break(text)),
            None => {
                let mut text = slice.to_string();
                let keep = strip_line_break(&text).len();
                text.truncate(keep);
                Cow::Owned(text)
            }
        }
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }
}
