//! Positions, ranges and visual-row addressing.
//!
//! Columns are counted in `char`s within a logical line (the trailing line break is never
//! part of a line).

use std::cmp::Ordering;

/// A position inside the document: logical line plus column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TextPosition {
    /// Logical line index (0-based).
    pub line: usize,
    /// Column in characters.
    pub column: usize,
}

impl TextPosition {
    /// Create a position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<(usize, usize)> for TextPosition {
    fn from((line, column): (usize, usize)) -> Self {
        Self::new(line, column)
    }
}

/// A range between two positions (`start` may come after `end` until normalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Range start.
    pub start: TextPosition,
    /// Range end.
    pub end: TextPosition,
}

impl TextRange {
    /// Create a range.
    pub const fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// Create a range covering whole lines `start_line..=end_line` (columns are 0).
    pub const fn from_lines(start_line: usize, end_line: usize) -> Self {
        Self::new(
            TextPosition::new(start_line, 0),
            TextPosition::new(end_line, 0),
        )
    }

    /// Swap the endpoints if `start` comes after `end`.
    pub fn normalize(&mut self) {
        if self.start > self.end {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    /// Return a normalized copy.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Whether `line` lies in `start.line..=end.line` (expects a normalized range).
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start.line && line <= self.end.line
    }
}

/// One visual row: the logical line it belongs to and the column where it starts.
///
/// The first row of a logical line always starts at column 0. Rows are ordered by
/// `(line, column)`, which is also their top-to-bottom render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct VisualRow {
    /// Logical line index.
    pub line: usize,
    /// First column covered by this row.
    pub column: usize,
}

impl VisualRow {
    /// Create a visual row reference.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of the first character of this row.
    pub const fn position(self) -> TextPosition {
        TextPosition::new(self.line, self.column)
    }
}

impl From<VisualRow> for TextPosition {
    fn from(row: VisualRow) -> Self {
        row.position()
    }
}

/// Index of a visual row in the sequence of currently visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibleIndex {
    /// The row at this position in render order.
    Valid(usize),
    /// The line has no visible row (it is hidden inside a collapsed fold).
    Invalid,
}

impl VisibleIndex {
    /// The index, if visible.
    pub fn get(self) -> Option<usize> {
        match self {
            VisibleIndex::Valid(index) => Some(index),
            VisibleIndex::Invalid => None,
        }
    }

    /// Whether this refers to a visible row.
    pub fn is_valid(self) -> bool {
        matches!(self, VisibleIndex::Valid(_))
    }
}

impl From<Option<usize>> for VisibleIndex {
    fn from(index: Option<usize>) -> Self {
        index.map_or(VisibleIndex::Invalid, VisibleIndex::Valid)
    }
}

impl PartialOrd for VisibleIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (VisibleIndex::Valid(a), VisibleIndex::Valid(b)) => Some(a.cmp(b)),
            (VisibleIndex::Invalid, VisibleIndex::Invalid) => Some(Ordering::Equal),
            _ => None,
        }
    }
}
