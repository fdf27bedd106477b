//! Text-block geometry shared by the renderer and the hit-tester.
//!
//! Both sides must agree exactly on where lines go, so the arithmetic lives
//! here once. The block is centered on the anchor: with `n` lines of height
//! `h`, the block spans `anchor.y ± n·h/2` and line `i` is centered at
//! `anchor.y - n·h/2 + h/2 + i·h`.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::Serialize;

use crate::consts::FIXED_ADVANCE_RATIO;
use crate::state::StyleState;
use crate::viewport::Point;

/// Font configuration for drawing or measuring text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// CSS weight, e.g. `"700"` or `"bold"`.
    pub weight: String,
    /// Size in pixels.
    pub size: f64,
    /// Family name or CSS font stack.
    pub family: String,
    /// Extra advance after each character, in pixels.
    pub letter_spacing: f64,
}

impl Font {
    #[must_use]
    pub fn from_state(state: &StyleState) -> Self {
        Self {
            weight: state.font_weight.clone(),
            size: state.text_size,
            family: state.font_family.clone(),
            letter_spacing: state.letter_spacing,
        }
    }

    /// The CSS `font` shorthand: `"<weight> <size>px <family>"`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size, self.family)
    }
}

/// Measures the advance width of a run of text under a font.
pub trait TextMeasure {
    /// Width of `text` in pixels, letter spacing included.
    fn measure_text(&mut self, font: &Font, text: &str) -> f64;
}

/// Approximate measurer: every character advances `size * ratio + letter_spacing`.
///
/// Used where no real font engine is available (headless dispatch, display
/// lists, tests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { ratio: FIXED_ADVANCE_RATIO }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure_text(&mut self, font: &Font, text: &str) -> f64 {
        let chars = text.chars().count();
        // Character counts in a cover title are far below f64's integer range.
        #[allow(clippy::cast_precision_loss)]
        let chars = chars as f64;
        chars * (font.size * self.ratio + font.letter_spacing)
    }
}

/// The laid-out multi-line text block of a state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock<'a> {
    lines: Vec<&'a str>,
    line_height: f64,
    anchor: Point,
}

impl<'a> TextBlock<'a> {
    /// Split `state.text_content` on `'\n'` and size the block.
    ///
    /// Empty segments are kept, so `"A\n"` is two lines.
    #[must_use]
    pub fn new(state: &'a StyleState) -> Self {
        Self {
            lines: state.text_content.split('\n').collect(),
            line_height: state.text_size * state.line_height,
            anchor: state.anchor(),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Height of one line in pixels (`text_size * line_height`).
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Height of the whole block.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.line_count() * self.line_height
    }

    /// Vertical center of the first line.
    #[must_use]
    pub fn start_y(&self) -> f64 {
        self.anchor.y - self.total_height() / 2.0 + self.line_height / 2.0
    }

    /// Center point of line `index`.
    #[must_use]
    pub fn line_center(&self, index: usize) -> Point {
        #[allow(clippy::cast_precision_loss)]
        let i = index as f64;
        Point::new(self.anchor.x, i.mul_add(self.line_height, self.start_y()))
    }

    /// Lines paired with their center points, top to bottom.
    pub fn positioned(&self) -> impl Iterator<Item = (&'a str, Point)> + '_ {
        self.lines.iter().enumerate().map(|(i, line)| (*line, self.line_center(i)))
    }

    /// Widest line under `font`.
    pub fn max_width<M: TextMeasure + ?Sized>(&self, measure: &mut M, font: &Font) -> f64 {
        self.lines
            .iter()
            .map(|line| measure.measure_text(font, line))
            .fold(0.0, f64::max)
    }

    fn line_count(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = self.lines.len() as f64;
        n
    }
}
