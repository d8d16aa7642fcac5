use std::sync::Arc;

use visual_line_map::{
    CellMetrics, FontMetrics, FontStyle, GlyphStyle, MonospaceMetrics, WrapMode,
    compute_line_breaks, text_width,
};

fn mono() -> FontStyle {
    FontStyle::new(Arc::new(MonospaceMetrics::new(1.0)), 12)
}

fn breaks(text: &str, width: f32, mode: WrapMode) -> Vec<usize> {
    compute_line_breaks(text, &mono(), width, mode, true, 4).breaks
}

/// Kerns the pair "AV" by -1, every glyph 1 wide.
#[derive(Debug)]
struct PairKerning;

impl FontMetrics for PairKerning {
    fn advance(&self, _ch: char, _glyph: &GlyphStyle) -> f32 {
        1.0
    }

    fn kerning(&self, prev: Option<char>, ch: char, _glyph: &GlyphStyle) -> f32 {
        if prev == Some('A') && ch == 'V' {
            -1.0
        } else {
            0.0
        }
    }

    fn is_monospace(&self) -> bool {
        false
    }
}

/// Claims to be monospace but reports a wide advance for everything except space.
#[derive(Debug)]
struct LyingMonospace;

impl FontMetrics for LyingMonospace {
    fn advance(&self, ch: char, _glyph: &GlyphStyle) -> f32 {
        if ch == ' ' { 1.0 } else { 5.0 }
    }

    fn kerning(&self, _prev: Option<char>, _ch: char, _glyph: &GlyphStyle) -> f32 {
        100.0
    }

    fn is_monospace(&self) -> bool {
        true
    }
}

#[test]
fn test_word_wrap_breaks_after_space() {
    assert_eq!(
        breaks("the quick brown fox", 10.0, WrapMode::Word),
        vec![0, 10]
    );
}

#[test]
fn test_word_and_letter_differ() {
    assert_eq!(
        breaks("the quick brown fox", 7.0, WrapMode::Word),
        vec![0, 4, 10, 16]
    );
    assert_eq!(
        breaks("the quick brown fox", 7.0, WrapMode::Letter),
        vec![0, 7, 14]
    );
}

#[test]
fn test_word_wrap_without_opportunity_breaks_hard() {
    assert_eq!(
        breaks("abcdefghijkl", 5.0, WrapMode::Word),
        vec![0, 5, 10]
    );
}

#[test]
fn test_keep_indentation_pads_continuation_rows() {
    let text = "    hello world foo";
    let kept = compute_line_breaks(text, &mono(), 12.0, WrapMode::Word, true, 4);
    assert_eq!(kept.padding_start, 4.0);
    assert_eq!(kept.breaks, vec![0, 10, 16]);

    let flat = compute_line_breaks(text, &mono(), 12.0, WrapMode::Word, false, 4);
    assert_eq!(flat.padding_start, 0.0);
    assert_eq!(flat.breaks, vec![0, 10]);
}

#[test]
fn test_tab_advances_tab_width_spaces() {
    assert_eq!(text_width("\tab", &mono(), 4), 6.0);
    assert_eq!(text_width("\tab", &mono(), 2), 4.0);

    let info = compute_line_breaks("a\tb", &mono(), 4.0, WrapMode::Letter, false, 4);
    assert_eq!(info.breaks, vec![0, 1, 2]);
}

#[test]
fn test_carriage_return_has_no_width() {
    assert_eq!(breaks("abc\r", 3.0, WrapMode::Letter), vec![0]);
    assert_eq!(text_width("\r\r", &mono(), 4), 0.0);
}

#[test]
fn test_kerning_is_applied_between_pairs() {
    let style = FontStyle::new(Arc::new(PairKerning), 12);
    assert_eq!(text_width("AVAV", &style, 4), 2.0);

    let info = compute_line_breaks("AVAVAV", &style, 4.0, WrapMode::Letter, false, 4);
    assert_eq!(info.breaks, vec![0]);

    let info = compute_line_breaks("VAVAVA", &style, 4.0, WrapMode::Letter, false, 4);
    assert_eq!(info.breaks, vec![0]);

    let info = compute_line_breaks("AAAAAA", &style, 4.0, WrapMode::Letter, false, 4);
    assert_eq!(info.breaks, vec![0, 4]);
}

#[test]
fn test_monospace_fast_path_uses_space_advance() {
    let style = FontStyle::new(Arc::new(LyingMonospace), 12);
    assert_eq!(text_width("abcd", &style, 4), 4.0);

    let info = compute_line_breaks("abcd", &style, 4.0, WrapMode::Letter, false, 4);
    assert_eq!(info.breaks, vec![0]);
}

#[test]
fn test_wide_characters_take_two_cells() {
    let style = FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12);
    assert_eq!(text_width("你好", &style, 4), 4.0);

    let info = compute_line_breaks("你好你好", &style, 4.0, WrapMode::Letter, false, 4);
    assert_eq!(info.breaks, vec![0, 2]);
}

#[test]
fn test_breaks_are_strictly_increasing() {
    for width in [0.5, 1.0, 2.0, 3.5, 7.0, 11.0] {
        for mode in [WrapMode::Word, WrapMode::Letter] {
            let info = breaks("a b-c.d,e fghij klmnop\tq", width, mode);
            assert_eq!(info[0], 0);
            assert!(info.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}

#[test]
fn test_leading_space_is_a_break_opportunity() {
    let info = compute_line_breaks(" abcdefgh", &mono(), 4.0, WrapMode::Word, false, 4);
    assert_eq!(info.breaks, vec![0, 1, 5]);
}
