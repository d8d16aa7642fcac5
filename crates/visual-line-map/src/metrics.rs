//! Font metrics collaborator.
//!
//! The engine never shapes text itself; it asks a [`FontMetrics`] implementation for glyph
//! advances and kerning. Two reference implementations are provided:
//!
//! - [`MonospaceMetrics`]: every glyph has the same advance (monospace fast path).
//! - [`CellMetrics`]: terminal-style cell grid where wide characters (CJK, fullwidth) take two
//!   cells and combining marks take none (UAX #11).

use std::fmt;
use std::sync::Arc;

use unicode_width::UnicodeWidthChar;

/// Bold/italic style bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

impl TextStyle {
    /// Regular (neither bold nor italic).
    pub const REGULAR: Self = Self {
        bold: false,
        italic: false,
    };
}

/// Everything a glyph lookup depends on besides the character itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    /// Character size (font units, typically pixels).
    pub character_size: u32,
    /// Bold/italic bits.
    pub style: TextStyle,
    /// Outline thickness in pixels.
    pub outline_thickness: f32,
}

/// Glyph advance and kerning provider.
pub trait FontMetrics: fmt::Debug + Send + Sync {
    /// Horizontal advance of `ch`.
    fn advance(&self, ch: char, glyph: &GlyphStyle) -> f32;

    /// Kerning adjustment between `prev` and `ch` (`prev` is `None` at line start).
    fn kerning(&self, prev: Option<char>, ch: char, glyph: &GlyphStyle) -> f32;

    /// Whether every glyph shares the space advance and kerning is always zero.
    fn is_monospace(&self) -> bool;
}

/// Font plus style used to measure text.
#[derive(Debug, Clone)]
pub struct FontStyle {
    /// Font metrics; `None` means "not loaded yet" and disables wrapping.
    pub font: Option<Arc<dyn FontMetrics>>,
    /// Character size.
    pub character_size: u32,
    /// Bold/italic bits.
    pub style: TextStyle,
    /// Outline thickness.
    pub outline_thickness: f32,
}

impl FontStyle {
    /// Style for `font` at `character_size`, regular face, no outline.
    pub fn new(font: Arc<dyn FontMetrics>, character_size: u32) -> Self {
        Self {
            font: Some(font),
            character_size,
            style: TextStyle::REGULAR,
            outline_thickness: 0.0,
        }
    }

    /// Style without font metrics.
    pub fn without_font() -> Self {
        Self {
            font: None,
            character_size: 0,
            style: TextStyle::REGULAR,
            outline_thickness: 0.0,
        }
    }

    /// Glyph lookup parameters.
    pub fn glyph_style(&self) -> GlyphStyle {
        GlyphStyle {
            character_size: self.character_size,
            style: self.style,
            outline_thickness: self.outline_thickness,
        }
    }

    /// Advance of a space, or 0 when no font is set.
    pub fn space_advance(&self) -> f32 {
        self.font
            .as_ref()
            .map_or(0.0, |font| font.advance(' ', &self.glyph_style()))
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::without_font()
    }
}

impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        let same_font = match (&self.font, &other.font) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_font
            && self.character_size == other.character_size
            && self.style == other.style
            && self.outline_thickness == other.outline_thickness
    }
}

/// Fixed-advance font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    advance: f32,
}

impl MonospaceMetrics {
    /// Every glyph advances by `advance`.
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn advance(&self, _ch: char, _glyph: &GlyphStyle) -> f32 {
        self.advance
    }

    fn kerning(&self, _prev: Option<char>, _ch: char, _glyph: &GlyphStyle) -> f32 {
        0.0
    }

    fn is_monospace(&self) -> bool {
        true
    }
}

/// Terminal cell grid metrics.
///
/// Not reported as monospace: double-width characters advance by two cells, so the space
/// advance cannot stand in for every glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    cell_width: f32,
}

impl CellMetrics {
    /// Cells `cell_width` pixels wide.
    pub fn new(cell_width: f32) -> Self {
        Self { cell_width }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Width of `ch` in cells (UAX #11); control characters count as one cell.
pub fn char_cells(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

impl FontMetrics for CellMetrics {
    fn advance(&self, ch: char, _glyph: &GlyphStyle) -> f32 {
        char_cells(ch) as f32 * self.cell_width
    }

    fn kerning(&self, _prev: Option<char>, _ch: char, _glyph: &GlyphStyle) -> f32 {
        0.0
    }

    fn is_monospace(&self) -> bool {
        false
    }
}
