//! Wrap calculator.
//!
//! Computes, for a single logical line, the columns at which it breaks into visual rows.
//! Widths are accumulated in pixels using the caller's [`FontMetrics`]; the scan is linear in
//! the number of characters and keeps no state between lines.

use crate::config::{WrapConfig, WrapMode};
use crate::metrics::{FontMetrics, FontStyle, GlyphStyle};

/// Break columns and continuation padding of one logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineWrapInfo {
    /// Start column of every visual row, ascending; the first entry is always 0.
    pub breaks: Vec<usize>,
    /// Width of the leading indentation, used to align continuation rows.
    pub padding_start: f32,
}

impl LineWrapInfo {
    /// A single unwrapped row.
    pub fn single_row() -> Self {
        Self {
            breaks: vec![0],
            padding_start: 0.0,
        }
    }

    /// Number of visual rows.
    pub fn row_count(&self) -> usize {
        self.breaks.len()
    }
}

impl Default for LineWrapInfo {
    fn default() -> Self {
        Self::single_row()
    }
}

fn is_indent_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

fn is_break_opportunity(ch: char) -> bool {
    matches!(ch, ' ' | '.' | '-' | ',')
}

/// Per-character advance accumulator shared by wrapping and measuring.
struct Measurer<'a> {
    font: &'a dyn FontMetrics,
    glyph: GlyphStyle,
    space_advance: f32,
    tab_width: u32,
    monospace: bool,
    prev: Option<char>,
}

impl<'a> Measurer<'a> {
    fn new(font: &'a dyn FontMetrics, style: &FontStyle, tab_width: u32) -> Self {
        let glyph = style.glyph_style();
        Self {
            font,
            glyph,
            space_advance: font.advance(' ', &glyph),
            tab_width: tab_width.max(1),
            monospace: font.is_monospace(),
            prev: None,
        }
    }

    fn width(&mut self, ch: char) -> f32 {
        let mut width = match ch {
            '\t' => self.space_advance * self.tab_width as f32,
            '\r' => 0.0,
            _ if self.monospace => self.space_advance,
            _ => self.font.advance(ch, &self.glyph),
        };

        // Monospace fonts never kern; carriage returns are invisible and don't reset the pair.
        if !self.monospace && ch != '\r' {
            width += self.font.kerning(self.prev, ch, &self.glyph);
            self.prev = Some(ch);
        }

        width
    }
}

/// Measured width of `text` (0 when the style has no font).
pub fn text_width(text: &str, style: &FontStyle, tab_width: u32) -> f32 {
    let Some(font) = style.font.as_deref() else {
        return 0.0;
    };
    let mut measurer = Measurer::new(font, style, tab_width);
    text.chars().map(|ch| measurer.width(ch)).sum()
}

/// Measured width of the leading whitespace run of `text`.
///
/// A line consisting only of whitespace has no indentation.
pub fn leading_indentation_width(text: &str, style: &FontStyle, tab_width: u32) -> f32 {
    match text.find(|ch: char| !is_indent_char(ch)) {
        Some(end) => text_width(&text[..end], style, tab_width),
        None => 0.0,
    }
}

fn wraps(text: &str, style: &FontStyle, max_width: f32, mode: WrapMode) -> bool {
    mode != WrapMode::NoWrap && !text.is_empty() && style.font.is_some() && max_width > 0.0
}

/// Continuation padding of a line, exactly as [`compute_line_breaks`] reports it.
///
/// Also used for lines hidden inside a fold, which get no break columns but keep their padding.
pub fn line_padding(
    text: &str,
    style: &FontStyle,
    max_width: f32,
    mode: WrapMode,
    keep_indentation: bool,
    tab_width: u32,
) -> f32 {
    if keep_indentation && wraps(text, style, max_width, mode) {
        leading_indentation_width(text, style, tab_width)
    } else {
        0.0
    }
}

/// Compute the break columns of one logical line.
///
/// Returns a single row when wrapping is disabled, the text is empty, no font is available or
/// `max_width` is not positive. Every row keeps at least one character, so break columns are
/// strictly increasing.
pub fn compute_line_breaks(
    text: &str,
    style: &FontStyle,
    max_width: f32,
    mode: WrapMode,
    keep_indentation: bool,
    tab_width: u32,
) -> LineWrapInfo {
    let mut info = LineWrapInfo::single_row();
    let Some(font) = style.font.as_deref() else {
        return info;
    };
    if !wraps(text, style, max_width, mode) {
        return info;
    }

    info.padding_start = line_padding(text, style, max_width, mode, keep_indentation, tab_width);

    let mut measurer = Measurer::new(font, style, tab_width);
    let mut x = 0.0f32;
    let mut row_start = 0usize;
    // (column, accumulated width after that column)
    let mut opportunity: Option<(usize, f32)> = None;

    for (column, ch) in text.chars().enumerate() {
        let width = measurer.width(ch);
        x += width;

        if x > max_width && column > row_start {
            match opportunity {
                Some((opportunity_column, opportunity_x)) if mode == WrapMode::Word => {
                    row_start = opportunity_column + 1;
                    x = width + info.padding_start + (x - opportunity_x);
                }
                _ => {
                    row_start = column;
                    x = width + info.padding_start;
                }
            }
            info.breaks.push(row_start);
            opportunity = None;
        } else if is_break_opportunity(ch) {
            // Column 0 counts too: a leading space is a valid place to break after.
            opportunity = Some((column, x));
        }
    }

    info
}

/// Wrap parameters of a view bound together for repeated per-line use.
#[derive(Debug, Clone, Copy)]
pub struct LineWrapper<'a> {
    style: &'a FontStyle,
    config: &'a WrapConfig,
    max_width: f32,
}

impl<'a> LineWrapper<'a> {
    /// Bind a style, configuration and width.
    pub fn new(style: &'a FontStyle, config: &'a WrapConfig, max_width: f32) -> Self {
        Self {
            style,
            config,
            max_width,
        }
    }

    /// Break columns and padding of `text`.
    pub fn breaks(&self, text: &str) -> LineWrapInfo {
        compute_line_breaks(
            text,
            self.style,
            self.max_width,
            self.config.mode,
            self.config.keep_indentation,
            self.config.effective_tab_width(),
        )
    }

    /// Padding of `text` without computing breaks.
    pub fn padding(&self, text: &str) -> f32 {
        line_padding(
            text,
            self.style,
            self.max_width,
            self.config.mode,
            self.config.keep_indentation,
            self.config.effective_tab_width(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;
    use std::sync::Arc;

    fn mono() -> FontStyle {
        FontStyle::new(Arc::new(MonospaceMetrics::new(1.0)), 12)
    }

    #[test]
    fn test_no_wrap_is_single_row() {
        let info = compute_line_breaks("hello world", &mono(), 3.0, WrapMode::NoWrap, true, 4);
        assert_eq!(info, LineWrapInfo::single_row());
    }

    #[test]
    fn test_empty_and_fontless_are_single_row() {
        let info = compute_line_breaks("", &mono(), 3.0, WrapMode::Letter, true, 4);
        assert_eq!(info.breaks, vec![0]);

        let info = compute_line_breaks(
            "hello world",
            &FontStyle::without_font(),
            3.0,
            WrapMode::Letter,
            true,
            4,
        );
        assert_eq!(info.breaks, vec![0]);
    }

    #[test]
    fn test_non_positive_width_is_single_row() {
        let info = compute_line_breaks("hello", &mono(), 0.0, WrapMode::Letter, false, 4);
        assert_eq!(info.breaks, vec![0]);
    }

    #[test]
    fn test_letter_wrap_every_four() {
        let info = compute_line_breaks("abcdefghij", &mono(), 4.0, WrapMode::Letter, false, 4);
        assert_eq!(info.breaks, vec![0, 4, 8]);
    }

    #[test]
    fn test_row_keeps_one_char_when_too_narrow() {
        let info = compute_line_breaks("abc", &mono(), 0.5, WrapMode::Letter, false, 4);
        assert_eq!(info.breaks, vec![0, 1, 2]);
    }

    #[test]
    fn test_text_width_and_indentation() {
        let style = mono();
        assert_eq!(text_width("ab\tc", &style, 4), 7.0);
        assert_eq!(text_width("a\rb", &style, 4), 2.0);
        assert_eq!(leading_indentation_width("  \tx y", &style, 2), 4.0);
        assert_eq!(leading_indentation_width("   ", &style, 2), 0.0);
        assert_eq!(text_width("abc", &FontStyle::without_font(), 4), 0.0);
    }
}
