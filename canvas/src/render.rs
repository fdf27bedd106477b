//! Rendering: draws a cover from a [`StyleState`] onto a [`Surface`].
//!
//! `Surface` is the drawing-context seam. The browser implements it over
//! `CanvasRenderingContext2d` ([`crate::web`]), the native rasterizer over an
//! RGBA buffer, and [`crate::paint::Recorder`] records calls as a display
//! list. Fallible contexts report through the associated `Error` type, which
//! `draw` propagates.
//!
//! A drawing context keeps text and shadow settings between calls, so every
//! frame sets both explicitly before drawing any text.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::color::{Rgb, Rgba};
use crate::consts::{
    CANVAS_CENTER, CANVAS_SIZE, GUIDE_TOLERANCE_PX, GUIDE_WIDTH_PX, RADIAL_DIVISOR, SHADOW_ALPHA,
    SHADOW_BLUR_PX, SHADOW_OFFSET_Y_PX,
};
use crate::layout::{Font, TextBlock, TextMeasure};
use crate::state::{BackgroundType, StyleState};
use crate::viewport::Point;

/// How the background rectangle is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Paint {
    Solid(Rgb),
    /// Gradient from `from` at `start` to `to` at `end`.
    Linear { start: Point, end: Point, from: Rgb, to: Rgb },
    /// Gradient from `from` at `center` (radius 0) to `to` at `radius`.
    Radial { center: Point, radius: f64, from: Rgb, to: Rgb },
}

/// Line stroke settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

/// Drop shadow applied to subsequent text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Shadow {
    /// No shadow at all: transparent, unblurred, unshifted.
    pub const NONE: Self = Self { color: Rgba::TRANSPARENT, blur: 0.0, offset_x: 0.0, offset_y: 0.0 };

    /// The cover's text shadow.
    pub const DROP: Self = Self {
        color: Rgba { r: 0, g: 0, b: 0, a: SHADOW_ALPHA },
        blur: SHADOW_BLUR_PX,
        offset_x: 0.0,
        offset_y: SHADOW_OFFSET_Y_PX,
    };

    /// Whether drawing with this shadow produces any shadow pixels.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.color.a > 0.0 && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }
}

/// Text fill settings. Text is always centered horizontally with a middle baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: Font,
    pub color: Rgb,
}

/// A 512×512 drawing target.
pub trait Surface: TextMeasure {
    type Error;

    /// Reset every pixel to transparent.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Fill the whole canvas with `paint`.
    fn fill_background(&mut self, paint: &Paint) -> Result<(), Self::Error>;

    /// Stroke a solid line from `from` to `to`.
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), Self::Error>;

    /// Set font, letter spacing and fill color for subsequent text.
    fn set_text_style(&mut self, style: &TextStyle) -> Result<(), Self::Error>;

    /// Set the shadow for subsequent text.
    fn set_shadow(&mut self, shadow: &Shadow) -> Result<(), Self::Error>;

    /// Draw one line of text centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point) -> Result<(), Self::Error>;
}

/// The background paint for `state`.
///
/// Linear gradients run along `direction` (0° = up) over a line as long as
/// the canvas diagonal through the center, so any angle covers the square.
#[must_use]
pub fn background_paint(state: &StyleState) -> Paint {
    let center = Point::new(CANVAS_CENTER, CANVAS_CENTER);
    match state.background_type {
        BackgroundType::Linear => {
            let angle = (state.direction - 90.0).to_radians();
            let half = CANVAS_SIZE.hypot(CANVAS_SIZE) / 2.0;
            let (dx, dy) = (angle.cos() * half, angle.sin() * half);
            Paint::Linear {
                start: Point::new(center.x - dx, center.y - dy),
                end: Point::new(center.x + dx, center.y + dy),
                from: state.color1,
                to: state.color2,
            }
        }
        BackgroundType::Radial => Paint::Radial {
            center,
            radius: CANVAS_SIZE / RADIAL_DIVISOR,
            from: state.color1,
            to: state.color2,
        },
        BackgroundType::Solid => Paint::Solid(state.color1),
    }
}

/// The snapped-guide lines to show for `state`: a horizontal line when the
/// anchor is on the vertical center, a vertical line when it is on the
/// horizontal center. Empty unless a drag is active.
#[must_use]
pub fn guide_lines(state: &StyleState) -> Vec<(Point, Point)> {
    let mut lines = Vec::new();
    if !state.is_dragging() {
        return lines;
    }
    if (state.pos_y - CANVAS_CENTER).abs() < GUIDE_TOLERANCE_PX {
        lines.push((Point::new(0.0, CANVAS_CENTER), Point::new(CANVAS_SIZE, CANVAS_CENTER)));
    }
    if (state.pos_x - CANVAS_CENTER).abs() < GUIDE_TOLERANCE_PX {
        lines.push((Point::new(CANVAS_CENTER, 0.0), Point::new(CANVAS_CENTER, CANVAS_SIZE)));
    }
    lines
}

/// Stroke used for snapped guides.
pub const GUIDE_STROKE: Stroke = Stroke {
    color: Rgba { r: 100, g: 255, b: 100, a: 0.8 },
    width: GUIDE_WIDTH_PX,
};

/// Repaint the whole canvas for `state`.
///
/// # Errors
///
/// Returns the surface's error if any drawing call fails.
pub fn draw<S: Surface + ?Sized>(surface: &mut S, state: &StyleState) -> Result<(), S::Error> {
    // Layer 1: clear and background.
    surface.clear()?;
    surface.fill_background(&background_paint(state))?;

    // Layer 2: snapped guides while dragging.
    for (from, to) in guide_lines(state) {
        surface.stroke_line(from, to, &GUIDE_STROKE)?;
    }

    // Layer 3: text.
    surface.set_text_style(&TextStyle { font: Font::from_state(state), color: state.text_color })?;
    surface.set_shadow(if state.text_shadow { &Shadow::DROP } else { &Shadow::NONE })?;

    let block = TextBlock::new(state);
    for (line, center) in block.positioned() {
        surface.fill_text(line, center)?;
    }
    Ok(())
}
