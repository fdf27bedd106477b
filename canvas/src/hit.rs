//! Hit-testing against the text block.
//!
//! The box is the line-box rectangle: widest measured line by
//! `lines * line_height`, centered on the anchor. It ignores shadow extent
//! and per-glyph ascent/descent, so a pointer slightly above a glyph but
//! inside its line box still counts as a hit.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::layout::{Font, TextBlock, TextMeasure};
use crate::state::StyleState;
use crate::viewport::Point;

/// Axis-aligned rectangle with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Rectangle of `width` × `height` centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Whether `pt` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.right && pt.y >= self.top && pt.y <= self.bottom
    }
}

/// Bounding box of the rendered text block, measured with `measure`.
pub fn text_bounds<M: TextMeasure + ?Sized>(state: &StyleState, measure: &mut M) -> Bounds {
    let font = Font::from_state(state);
    let block = TextBlock::new(state);
    let max_width = block.max_width(measure, &font);
    Bounds::centered(state.anchor(), max_width, block.total_height())
}

/// Whether the canvas-space point `pt` is over the text block.
pub fn hit_test<M: TextMeasure + ?Sized>(state: &StyleState, pt: Point, measure: &mut M) -> bool {
    text_bounds(state, measure).contains(pt)
}
