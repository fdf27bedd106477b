#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// DragState
// =============================================================

#[test]
fn drag_state_default_is_idle() {
    assert_eq!(DragState::default(), DragState::Idle);
    assert!(!DragState::Idle.is_active());
}

#[test]
fn grab_records_pointer_minus_anchor() {
    let drag = DragState::grab(Point::new(270.0, 250.0), Point::new(256.0, 256.0));
    assert_eq!(drag, DragState::Dragging { grab_offset: Point::new(14.0, -6.0) });
    assert!(drag.is_active());
}

#[test]
fn idle_has_no_target() {
    assert!(DragState::Idle.target(Point::new(10.0, 10.0)).is_none());
}

#[test]
fn target_preserves_grab_offset() {
    let drag = DragState::grab(Point::new(110.0, 120.0), Point::new(100.0, 100.0));
    let target = drag.target(Point::new(60.0, 420.0)).unwrap();
    assert_eq!(target, Point::new(50.0, 400.0));
}

#[test]
fn target_is_snapped() {
    let drag = DragState::grab(Point::new(100.0, 100.0), Point::new(100.0, 100.0));
    let target = drag.target(Point::new(250.0, 400.0)).unwrap();
    assert_eq!(target, Point::new(256.0, 400.0));
}

// =============================================================
// Snapping
// =============================================================

#[test]
fn snap_inside_band_yields_exact_center() {
    for v in [241.01, 245.0, 255.5, 256.0, 260.0, 270.99] {
        assert_eq!(snap_axis(v), 256.0, "value {v} should snap");
    }
}

#[test]
fn snap_at_or_beyond_threshold_is_untouched() {
    for v in [241.0, 271.0, 0.0, 512.0, 100.0, -256.0] {
        assert_eq!(snap_axis(v), v, "value {v} should not snap");
    }
}

#[test]
fn snap_axes_are_independent() {
    assert_eq!(snap(Point::new(250.0, 100.0)), Point::new(256.0, 100.0));
    assert_eq!(snap(Point::new(100.0, 262.0)), Point::new(100.0, 256.0));
    assert_eq!(snap(Point::new(255.0, 257.0)), Point::new(256.0, 256.0));
}

#[test]
fn snap_is_idempotent() {
    for v in [0.0, 200.0, 243.0, 256.0, 268.0, 300.0] {
        assert_eq!(snap_axis(snap_axis(v)), snap_axis(v));
    }
}

// =============================================================
// Cursor / Button / InputEvent
// =============================================================

#[test]
fn cursor_css_values() {
    assert_eq!(Cursor::default().css(), "default");
    assert_eq!(Cursor::Grab.css(), "grab");
    assert_eq!(Cursor::Grabbing.css(), "grabbing");
}

#[test]
fn button_variants_distinct() {
    assert_ne!(Button::Download, Button::Randomize);
    assert_ne!(Button::Randomize, Button::Reset);
}

#[test]
fn input_event_field_changed_carries_value() {
    let event = InputEvent::FieldChanged { field: Field::TextSize, value: FieldValue::Number(72.0) };
    let InputEvent::FieldChanged { field, value } = event else {
        panic!("wrong variant");
    };
    assert_eq!(field, Field::TextSize);
    assert_eq!(value, FieldValue::Number(72.0));
}
