#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(1.5, -2.0);
    assert_eq!(a + b, Point::new(11.5, 18.0));
    assert_eq!(a - b, Point::new(8.5, 22.0));
}

#[test]
fn point_sub_then_add_is_identity() {
    let pointer = Point::new(300.0, 120.0);
    let anchor = Point::new(256.0, 256.0);
    let offset = pointer - anchor;
    assert!(point_approx_eq(anchor + offset, pointer));
}

// --- DisplayRect defaults ---

#[test]
fn default_rect_is_identity_mapping() {
    let rect = DisplayRect::default();
    assert_eq!(rect.scale_x(), 1.0);
    assert_eq!(rect.scale_y(), 1.0);
    let p = Point::new(123.0, 45.0);
    assert!(point_approx_eq(rect.to_canvas(p), p));
}

// --- Scaling ---

#[test]
fn half_size_display_doubles_coordinates() {
    let rect = DisplayRect::new(0.0, 0.0, 256.0, 256.0);
    assert!(point_approx_eq(rect.to_canvas(Point::new(128.0, 64.0)), Point::new(256.0, 128.0)));
}

#[test]
fn offset_display_subtracts_origin_first() {
    let rect = DisplayRect::new(100.0, 50.0, 1024.0, 1024.0);
    let canvas = rect.to_canvas(Point::new(612.0, 562.0));
    assert!(point_approx_eq(canvas, Point::new(256.0, 256.0)));
}

#[test]
fn axes_scale_independently() {
    let rect = DisplayRect::new(0.0, 0.0, 512.0, 256.0);
    assert!(approx_eq(rect.scale_x(), 1.0));
    assert!(approx_eq(rect.scale_y(), 2.0));
    assert!(point_approx_eq(rect.to_canvas(Point::new(10.0, 10.0)), Point::new(10.0, 20.0)));
}

#[test]
fn collapsed_display_does_not_divide_by_zero() {
    let rect = DisplayRect::new(5.0, 5.0, 0.0, -4.0);
    let canvas = rect.to_canvas(Point::new(15.0, 25.0));
    assert!(canvas.x.is_finite());
    assert!(point_approx_eq(canvas, Point::new(10.0, 20.0)));
}
