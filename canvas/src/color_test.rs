#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_six_digit_hex() {
    let c: Rgb = "#ff00cc".parse().unwrap();
    assert_eq!(c, Rgb::new(255, 0, 204));
}

#[test]
fn parse_is_case_insensitive() {
    let c: Rgb = "#FF00CC".parse().unwrap();
    assert_eq!(c, Rgb::new(255, 0, 204));
}

#[test]
fn parse_three_digit_shorthand() {
    let c: Rgb = "#39f".parse().unwrap();
    assert_eq!(c, Rgb::new(0x33, 0x99, 0xFF));
}

#[test]
fn parse_rejects_missing_hash() {
    assert!("ff00cc".parse::<Rgb>().is_err());
}

#[test]
fn parse_rejects_bad_digits_and_lengths() {
    assert!("#gg00cc".parse::<Rgb>().is_err());
    assert!("#ff00c".parse::<Rgb>().is_err());
    assert!("#".parse::<Rgb>().is_err());
    assert!("#+f00cc".parse::<Rgb>().is_err());
}

#[test]
fn display_is_lowercase_hex() {
    assert_eq!(Rgb::new(0x33, 0x33, 0x99).to_string(), "#333399");
    assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
}

// =============================================================
// Serde
// =============================================================

#[test]
fn serde_uses_hex_string() {
    let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
    assert_eq!(json, "\"#010203\"");
    let back: Rgb = serde_json::from_str("\"#abcdef\"").unwrap();
    assert_eq!(back, Rgb::new(0xAB, 0xCD, 0xEF));
}

#[test]
fn serde_rejects_invalid_string() {
    assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
}

// =============================================================
// Math
// =============================================================

#[test]
fn from_u32_ignores_high_byte() {
    assert_eq!(Rgb::from_u32(0xFF12_3456), Rgb::new(0x12, 0x34, 0x56));
}

#[test]
fn lerp_endpoints_and_midpoint() {
    let a = Rgb::BLACK;
    let b = Rgb::new(200, 100, 50);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 50, 25));
}

#[test]
fn lerp_clamps_t() {
    let a = Rgb::BLACK;
    let b = Rgb::WHITE;
    assert_eq!(a.lerp(b, -3.0), a);
    assert_eq!(a.lerp(b, 7.0), b);
}

#[test]
fn random_is_deterministic_per_seed() {
    let mut r1 = SmallRng::seed_from_u64(9);
    let mut r2 = SmallRng::seed_from_u64(9);
    assert_eq!(Rgb::random(&mut r1), Rgb::random(&mut r2));
}

#[test]
fn rgba_css_format() {
    let c = Rgb::new(100, 255, 100).with_alpha(0.8);
    assert_eq!(c.css(), "rgba(100, 255, 100, 0.8)");
    assert_eq!(c.rgb(), Rgb::new(100, 255, 100));
    assert_eq!(Rgba::TRANSPARENT.a, 0.0);
}
