//! Shared numeric constants for the canvas crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Logical width and height of the square cover canvas, in pixels.
pub const CANVAS_SIZE: f64 = 512.0;

/// Logical canvas size as an integer pixel count.
pub const CANVAS_SIZE_PX: u32 = 512;

/// Center of the canvas on either axis.
pub const CANVAS_CENTER: f64 = CANVAS_SIZE / 2.0;

// ── Background ──────────────────────────────────────────────────

/// Outer radius of the radial gradient is `CANVAS_SIZE / RADIAL_DIVISOR`.
pub const RADIAL_DIVISOR: f64 = 1.5;

// ── Dragging ────────────────────────────────────────────────────

/// A dragged anchor within this many pixels of the center snaps to it.
pub const SNAP_THRESHOLD_PX: f64 = 15.0;

/// The snapped guide line is shown while the anchor is this close to center.
pub const GUIDE_TOLERANCE_PX: f64 = 1.0;

/// Width of the snapped guide line.
pub const GUIDE_WIDTH_PX: f64 = 1.0;

// ── Text ────────────────────────────────────────────────────────

/// Blur radius of the text drop shadow.
pub const SHADOW_BLUR_PX: f64 = 15.0;

/// Vertical offset of the text drop shadow.
pub const SHADOW_OFFSET_Y_PX: f64 = 4.0;

/// Opacity of the black text drop shadow.
pub const SHADOW_ALPHA: f64 = 0.5;

/// Largest font size the native rasterizer draws; larger text is skipped.
pub const MAX_RASTER_TEXT_PX: f64 = 4096.0;

/// Advance ratio (relative to font size) used by the fixed-advance measurer.
pub const FIXED_ADVANCE_RATIO: f64 = 0.6;
