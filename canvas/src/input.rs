//! Input model: host events, the drag state machine, and snap-to-center.
//!
//! The host translates its raw UI events into [`InputEvent`]s and feeds them
//! to [`crate::engine::EngineCore::handle`]. Pointer positions are given in
//! client (display) coordinates; the engine rescales them to the 512×512
//! canvas before hit-testing.
//!
//! `DragState` is the whole gesture machine. It has two states: `Idle`, and
//! `Dragging` which remembers where inside the text block the pointer grabbed
//! so the block does not jump to the pointer on the first move.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{CANVAS_CENTER, SNAP_THRESHOLD_PX};
use crate::state::{Field, FieldValue};
use crate::viewport::Point;

/// Gesture state for dragging the text block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving the text block.
    Dragging {
        /// `pointer - anchor` at the moment of the grab.
        grab_offset: Point,
    },
}

impl DragState {
    /// Start a drag from `pointer`, grabbing a block anchored at `anchor`.
    #[must_use]
    pub fn grab(pointer: Point, anchor: Point) -> Self {
        Self::Dragging { grab_offset: pointer - anchor }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Where the anchor should move for a pointer at `pointer`, after snapping.
    ///
    /// Returns `None` when idle.
    #[must_use]
    pub fn target(&self, pointer: Point) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::Dragging { grab_offset } => Some(snap(pointer - *grab_offset)),
        }
    }
}

/// Snap one axis to the canvas center when within the snap band.
#[must_use]
pub fn snap_axis(v: f64) -> f64 {
    if (v - CANVAS_CENTER).abs() < SNAP_THRESHOLD_PX { CANVAS_CENTER } else { v }
}

/// Snap each axis of `candidate` independently.
#[must_use]
pub fn snap(candidate: Point) -> Point {
    Point::new(snap_axis(candidate.x), snap_axis(candidate.y))
}

/// Pointer affordance shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Hovering over the text block.
    Grab,
    /// Dragging the text block.
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Action buttons next to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Export the canvas as PNG.
    Download,
    /// Pick a random background.
    Randomize,
    /// Restore defaults (after confirmation).
    Reset,
}

/// An input event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A form control changed.
    FieldChanged { field: Field, value: FieldValue },
    /// Primary pointer pressed, in client coordinates.
    PointerDown(Point),
    /// Pointer moved, in client coordinates.
    PointerMove(Point),
    /// Pointer released.
    PointerUp,
    /// Pointer left the canvas.
    PointerLeave,
    /// An action button was clicked.
    ButtonPressed(Button),
    /// The user accepted the reset prompt.
    ResetConfirmed,
}
