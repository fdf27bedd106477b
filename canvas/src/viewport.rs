#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::CANVAS_SIZE;

/// A point in either display (client) space or canvas-logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Where the canvas element sits on the display, in client pixels.
///
/// The canvas is always 512×512 logical pixels; CSS may stretch it to any
/// rendered size, so pointer positions are rescaled before hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for DisplayRect {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, width: CANVAS_SIZE, height: CANVAS_SIZE }
    }
}

impl DisplayRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Horizontal canvas-pixels-per-display-pixel ratio.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        axis_scale(self.width)
    }

    /// Vertical canvas-pixels-per-display-pixel ratio.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        axis_scale(self.height)
    }

    /// Convert a client-space point to canvas-logical coordinates.
    #[must_use]
    pub fn to_canvas(&self, client: Point) -> Point {
        Point {
            x: (client.x - self.left) * self.scale_x(),
            y: (client.y - self.top) * self.scale_y(),
        }
    }
}

/// A collapsed (zero or negative) display size maps 1:1 instead of dividing by zero.
fn axis_scale(display: f64) -> f64 {
    if display > 0.0 { CANVAS_SIZE / display } else { 1.0 }
}
