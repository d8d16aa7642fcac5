//! Fold tracking.
//!
//! Callers declare foldable line ranges; the tracker remembers them keyed by their start line
//! and keeps the (small) sorted subset that is currently collapsed. A collapsed region hides
//! the lines strictly after its start line; the start line itself stays visible.

use std::collections::BTreeMap;

use crate::position::TextRange;

/// Inclusive logical-line range that can be collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FoldRegion {
    /// Start line (stays visible while collapsed).
    pub start_line: usize,
    /// End line (inclusive).
    pub end_line: usize,
}

impl FoldRegion {
    /// Create a region; reversed bounds are swapped.
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line: start_line.min(end_line),
            end_line: start_line.max(end_line),
        }
    }

    /// Whether `line` is in `start_line..=end_line`.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Whether `line` is hidden while this region is collapsed.
    pub fn hides_line(&self, line: usize) -> bool {
        line > self.start_line && line <= self.end_line
    }

    /// Whether the two inclusive ranges share at least one line.
    pub fn overlaps(&self, other: &FoldRegion) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }

    /// Number of lines hidden while collapsed.
    pub fn hidden_line_count(&self) -> usize {
        self.end_line - self.start_line
    }

    /// Move the region for an edit at `from_line` changing the line count by `line_delta`.
    ///
    /// Regions at or after the edit move as a whole; a region containing the edit keeps its
    /// start and stretches or shrinks. Neither bound moves above `from_line`.
    fn shift(&mut self, from_line: usize, line_delta: isize) {
        let moved = |line: usize| (line as isize + line_delta).max(from_line as isize) as usize;
        if self.start_line >= from_line {
            self.start_line = moved(self.start_line);
            self.end_line = moved(self.end_line).max(self.start_line);
        } else if self.end_line >= from_line {
            self.end_line = moved(self.end_line);
        }
    }
}

impl From<TextRange> for FoldRegion {
    fn from(range: TextRange) -> Self {
        let range = range.normalized();
        Self::new(range.start.line, range.end.line)
    }
}

/// Declared fold regions and the collapsed subset.
#[derive(Debug, Clone, Default)]
pub struct FoldTracker {
    declared: BTreeMap<usize, FoldRegion>,
    /// Sorted by `(start_line, end_line)`.
    collapsed: Vec<FoldRegion>,
}

impl FoldTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a foldable region, replacing any region declared at the same start line.
    pub fn declare(&mut self, region: impl Into<FoldRegion>) {
        let region = region.into();
        self.declared.insert(region.start_line, region);
    }

    /// Forget the region declared at `start_line`.
    pub fn undeclare(&mut self, start_line: usize) -> Option<FoldRegion> {
        self.declared.remove(&start_line)
    }

    /// Region declared at `start_line`.
    pub fn declared_at(&self, start_line: usize) -> Option<FoldRegion> {
        self.declared.get(&start_line).copied()
    }

    /// Whether a region is declared at `line`.
    pub fn is_fold_start(&self, line: usize) -> bool {
        self.declared.contains_key(&line)
    }

    /// Whether `line` lies within a collapsed region (start line included).
    pub fn is_folded(&self, line: usize) -> bool {
        self.collapsed.iter().any(|region| region.contains_line(line))
    }

    /// Whether `line` is hidden by a collapsed region.
    pub fn is_hidden(&self, line: usize) -> bool {
        self.hidden_by(line).is_some()
    }

    /// The collapsed region hiding `line`, if any.
    pub fn hidden_by(&self, line: usize) -> Option<FoldRegion> {
        self.collapsed
            .iter()
            .find(|region| region.hides_line(line))
            .copied()
    }

    /// Whether any collapsed region shares a line with `region`.
    pub fn intersects_collapsed(&self, region: &FoldRegion) -> bool {
        self.collapsed.iter().any(|folded| folded.overlaps(region))
    }

    /// Whether the collapsed region starting at `start_line` exists.
    pub fn is_collapsed(&self, start_line: usize) -> bool {
        self.collapsed
            .iter()
            .any(|region| region.start_line == start_line)
    }

    /// Insert `region` into the collapsed set, keeping it sorted.
    pub fn collapse(&mut self, region: FoldRegion) {
        let pos = self.collapsed.partition_point(|folded| folded < &region);
        self.collapsed.insert(pos, region);
    }

    /// Remove and return the collapsed region starting at `start_line`.
    pub fn expand(&mut self, start_line: usize) -> Option<FoldRegion> {
        let pos = self
            .collapsed
            .iter()
            .position(|region| region.start_line == start_line)?;
        Some(self.collapsed.remove(pos))
    }

    /// Whether any region is collapsed.
    pub fn has_collapsed(&self) -> bool {
        !self.collapsed.is_empty()
    }

    /// Declared regions ordered by start line.
    pub fn declared(&self) -> impl Iterator<Item = FoldRegion> + '_ {
        self.declared.values().copied()
    }

    /// Collapsed regions ordered by start line.
    pub fn collapsed(&self) -> &[FoldRegion] {
        &self.collapsed
    }

    /// Drop every collapsed region, returning them.
    pub fn expand_all(&mut self) -> Vec<FoldRegion> {
        std::mem::take(&mut self.collapsed)
    }

    /// Drop every region.
    pub fn clear(&mut self) {
        self.declared.clear();
        self.collapsed.clear();
    }

    /// Keep regions attached to their text across an edit at `from_line` that changed the line
    /// count by `line_delta`.
    ///
    /// A deletion can squeeze collapsed regions together. Afterwards the collapsed set again
    /// holds only non-overlapping regions that hide at least one line: a region left empty, or
    /// overlapping an earlier collapsed region, is expanded and returned.
    pub fn shift(&mut self, from_line: usize, line_delta: isize) -> Vec<FoldRegion> {
        if line_delta == 0 {
            return Vec::new();
        }

        let declared = std::mem::take(&mut self.declared);
        for (_, mut region) in declared {
            region.shift(from_line, line_delta);
            self.declared.insert(region.start_line, region);
        }

        for region in &mut self.collapsed {
            region.shift(from_line, line_delta);
        }
        self.collapsed.sort();

        let mut expanded = Vec::new();
        let mut kept: Vec<FoldRegion> = Vec::with_capacity(self.collapsed.len());
        for region in self.collapsed.drain(..) {
            let overlaps_previous = kept.last().is_some_and(|last| last.overlaps(&region));
            if region.hidden_line_count() == 0 || overlaps_previous {
                expanded.push(region);
            } else {
                kept.push(region);
            }
        }
        self.collapsed = kept;
        expanded
    }
}
