#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn state_with_text(text: &str, size: f64, line_height: f64, pos_y: f64) -> StyleState {
    StyleState {
        text_content: text.to_owned(),
        text_size: size,
        line_height,
        pos_y,
        ..StyleState::default()
    }
}

// =============================================================
// Font
// =============================================================

#[test]
fn font_css_shorthand() {
    let font = Font::from_state(&StyleState::default());
    assert_eq!(font.css(), "700 60px 'Outfit', sans-serif");
}

#[test]
fn font_css_keeps_fractional_size() {
    let state = StyleState { text_size: 42.5, font_weight: "bold".into(), ..StyleState::default() };
    assert_eq!(Font::from_state(&state).css(), "bold 42.5px 'Outfit', sans-serif");
}

// =============================================================
// FixedAdvance
// =============================================================

#[test]
fn fixed_advance_scales_with_size_and_spacing() {
    let mut m = FixedAdvance { ratio: 0.5 };
    let mut font = Font::from_state(&StyleState::default());
    font.size = 10.0;
    assert_eq!(m.measure_text(&font, "abcd"), 20.0);
    font.letter_spacing = 2.0;
    assert_eq!(m.measure_text(&font, "abcd"), 28.0);
    assert_eq!(m.measure_text(&font, ""), 0.0);
}

#[test]
fn fixed_advance_counts_chars_not_bytes() {
    let mut m = FixedAdvance { ratio: 1.0 };
    let mut font = Font::from_state(&StyleState::default());
    font.size = 1.0;
    assert_eq!(m.measure_text(&font, "héllo"), 5.0);
}

// =============================================================
// TextBlock
// =============================================================

#[test]
fn two_line_example_geometry() {
    let state = state_with_text("A\nB", 100.0, 1.0, 256.0);
    let block = TextBlock::new(&state);
    assert_eq!(block.lines(), &["A", "B"]);
    assert_eq!(block.line_height(), 100.0);
    assert_eq!(block.total_height(), 200.0);
    assert_eq!(block.line_center(0).y, 206.0);
    assert_eq!(block.line_center(1).y, 306.0);
}

#[test]
fn single_line_is_centered_on_anchor() {
    let state = state_with_text("Solo", 60.0, 1.2, 300.0);
    let block = TextBlock::new(&state);
    assert!(approx_eq(block.start_y(), 300.0));
    assert_eq!(block.line_center(0).x, 256.0);
}

#[test]
fn block_is_symmetric_around_anchor() {
    for (text, size, lh, y) in [
        ("a\nb\nc", 48.0, 1.2, 256.0),
        ("one\ntwo\nthree\nfour", 30.0, 1.5, 100.0),
        ("x", 12.0, 0.8, 490.0),
        ("\n\n", 77.0, 1.0, 3.0),
    ] {
        let state = state_with_text(text, size, lh, y);
        let block = TextBlock::new(&state);
        let n = block.lines().len();
        let last = block.line_center(n - 1).y;
        let expected = y + block.total_height() / 2.0 - block.line_height() / 2.0;
        assert!(approx_eq(last, expected), "{text:?}: {last} != {expected}");
    }
}

#[test]
fn trailing_newline_adds_empty_line() {
    let state = state_with_text("A\n", 10.0, 1.0, 0.0);
    let block = TextBlock::new(&state);
    assert_eq!(block.lines(), &["A", ""]);
}

#[test]
fn empty_text_is_one_empty_line() {
    let state = state_with_text("", 10.0, 1.0, 0.0);
    let block = TextBlock::new(&state);
    assert_eq!(block.lines(), &[""]);
    assert_eq!(block.total_height(), 10.0);
}

#[test]
fn positioned_pairs_lines_with_centers() {
    let state = state_with_text("A\nB", 100.0, 1.0, 256.0);
    let block = TextBlock::new(&state);
    let placed: Vec<_> = block.positioned().collect();
    assert_eq!(placed, vec![("A", Point::new(256.0, 206.0)), ("B", Point::new(256.0, 306.0))]);
}

#[test]
fn max_width_picks_widest_line() {
    let state = state_with_text("ab\nabcdef\nabc", 10.0, 1.0, 256.0);
    let block = TextBlock::new(&state);
    let font = Font::from_state(&state);
    let mut m = FixedAdvance { ratio: 1.0 };
    assert_eq!(block.max_width(&mut m, &font), 60.0);
}
