#![warn(missing_docs)]
//! Visual Line Map - Soft-Wrap and Folding Layer for Text Views
//!
//! # Overview
//!
//! `visual-line-map` translates between a document's logical lines (separated by line breaks)
//! and the visual rows a text view actually draws. A logical line can span several rows when
//! soft wrapping is enabled, and lines inside a collapsed fold region occupy none.
//! The crate does no rendering itself: the caller supplies font metrics through
//! [`FontMetrics`] and the text through [`TextSource`].
//!
//! # Core Features
//!
//! - **Soft Wrapping**: word or letter wrapping against the viewport or a fixed column
//! - **Indentation Keeping**: continuation rows aligned to the line's leading whitespace
//! - **Code Folding**: declared regions collapse to their first line
//! - **Incremental Updates**: edits patch only the affected rows
//! - **Identity Mode**: no memory spent while nothing is wrapped or folded
//! - **Deferred Builds**: construction waits for a loading document
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DocumentView (queries, folds, edits)       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  FoldTracker (declared + collapsed regions) │  ← Visibility
//! ├─────────────────────────────────────────────┤
//! │  LineWrapper (break columns, padding)       │  ← Text Layout
//! ├─────────────────────────────────────────────┤
//! │  FontMetrics / TextSource                   │  ← Collaborators
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use visual_line_map::{
//!     DocumentView, FoldRegion, FontStyle, MonospaceMetrics, RopeDocument, VisibleIndex,
//!     WrapConfig, WrapMode,
//! };
//!
//! let doc = RopeDocument::from_text("the quick brown fox\nfn main() {}");
//! let style = FontStyle::new(Arc::new(MonospaceMetrics::new(1.0)), 12);
//! let mut view = DocumentView::new(doc, style, WrapConfig::with_mode(WrapMode::Word));
//! view.set_max_width(10.0);
//!
//! // Both lines wrap once.
//! assert_eq!(view.visible_row_count(), 4);
//! assert_eq!(view.to_first_visual_row(1), VisibleIndex::Valid(2));
//!
//! // Collapsing line 0..=1 leaves only line 0's rows.
//! view.declare_fold(FoldRegion::new(0, 1));
//! assert!(view.fold(0));
//! assert_eq!(view.visible_row_count(), 2);
//! assert_eq!(view.to_first_visual_row(1), VisibleIndex::Invalid);
//! ```
//!
//! # Module Description
//!
//! - [`position`] - Positions, ranges, visual rows and visible indices
//! - [`config`] - Wrap configuration and its textual tokens
//! - [`metrics`] - Font metrics trait and reference implementations
//! - [`wrap`] - Per-line break and padding calculation
//! - [`folding`] - Declared and collapsed fold regions
//! - [`document`] - Text source trait and rope-backed document
//! - [`view`] - The visual row cache and its incremental updater
//!
//! # Logging
//!
//! Cache rebuilds and deferrals are reported through `tracing` at `debug` level, incremental
//! patches at `trace` level, and edits that disagree with the document at `warn` level.

pub mod config;
pub mod document;
pub mod folding;
pub mod metrics;
pub mod position;
pub mod view;
pub mod wrap;

pub use config::{ConfigError, DEFAULT_TAB_WIDTH, WrapBoundary, WrapConfig, WrapMode};
pub use document::{LineEdit, RopeDocument, TextSource};
pub use folding::{FoldRegion, FoldTracker};
pub use metrics::{
    CellMetrics, FontMetrics, FontStyle, GlyphStyle, MonospaceMetrics, TextStyle, char_cells,
};
pub use position::{TextPosition, TextRange, VisibleIndex, VisualRow};
pub use view::{DocumentView, VisibleLineInfo, VisibleLineRange};
pub use wrap::{
    LineWrapInfo, LineWrapper, compute_line_breaks, leading_indentation_width, line_padding,
    text_width,
};
