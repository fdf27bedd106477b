#![allow(clippy::float_cmp)]

use std::io::Cursor;

use canvas::persist::{STORAGE_KEY, Storage};
use canvas::state::StyleState;
use tempfile::TempDir;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn host_in(dir: &TempDir, answers: &'static str, seed: u64) -> Host {
    Host::open(FileStorage::new(dir.path()), None, Box::new(Cursor::new(answers)), seed)
}

fn stored(dir: &TempDir) -> Option<StyleState> {
    let storage = FileStorage::new(dir.path());
    storage.get_item(STORAGE_KEY).unwrap().map(|raw| persist::decode(&raw))
}

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn parse_point_accepts_comma_pair() {
    assert_eq!(parse_point("12.5, 40").unwrap(), Point::new(12.5, 40.0));
    assert!(parse_point("12").is_err());
    assert!(parse_point("a,b").is_err());
}

#[test]
fn parse_size_accepts_w_x_h() {
    assert_eq!(parse_size("256x128").unwrap(), (256.0, 128.0));
    assert_eq!(parse_size("300X300").unwrap(), (300.0, 300.0));
    assert!(parse_size("0x10").is_err());
    assert!(parse_size("256").is_err());
}

#[test]
fn drag_command_defaults_to_full_size_display() {
    let cli = Cli::try_parse_from(["playlist-cover", "drag", "--from", "1,2", "--to", "3,4"]).unwrap();
    let Command::Drag { from, to, display } = cli.command else {
        panic!("expected drag");
    };
    assert_eq!(from, Point::new(1.0, 2.0));
    assert_eq!(to, Point::new(3.0, 4.0));
    assert_eq!(display, (512.0, 512.0));
}

#[test]
fn render_command_flags() {
    let cli = Cli::try_parse_from(["playlist-cover", "render", "--display-list"]).unwrap();
    assert!(matches!(cli.command, Command::Render { out: None, display_list: true }));
}

// =============================================================
// Field edits
// =============================================================

#[test]
fn set_persists_the_field() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_in(&dir, "", 1);
    host.set(Field::TextContent, "Road Trip".into()).unwrap();
    host.set(Field::TextSize, "48".into()).unwrap();
    let state = stored(&dir).unwrap();
    assert_eq!(state.text_content, "Road Trip");
    assert_eq!(state.text_size, 48.0);
}

#[test]
fn failed_save_does_not_abort_the_edit() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let mut host = Host::open(FileStorage::new(&blocker), None, Box::new(Cursor::new("")), 1);
    host.set(Field::TextContent, "Unsaved".into()).unwrap();
    assert_eq!(host.core.state.text_content, "Unsaved");
    assert!(host.dispatch(InputEvent::ButtonPressed(Button::Randomize)).is_ok());
}

#[test]
fn set_rejects_uncoercible_value() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_in(&dir, "", 1);
    let result = host.set(Field::Color1, "purple".into());
    assert!(matches!(result, Err(CliError::InvalidValue { field: Field::Color1, .. })));
    assert!(stored(&dir).is_none());
}

// =============================================================
// Randomize / reset
// =============================================================

#[test]
fn randomize_with_seed_is_reproducible() {
    let (a, b) = (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap());
    host_in(&a, "", 99).dispatch(InputEvent::ButtonPressed(Button::Randomize)).unwrap();
    host_in(&b, "", 99).dispatch(InputEvent::ButtonPressed(Button::Randomize)).unwrap();
    assert_eq!(stored(&a), stored(&b));
    assert!(stored(&a).is_some());
}

#[test]
fn declined_reset_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    host_in(&dir, "", 1).set(Field::PosX, "40".into()).unwrap();
    let mut host = host_in(&dir, "n\n", 1);
    let result = host.dispatch(InputEvent::ButtonPressed(Button::Reset));
    assert!(matches!(result, Err(CliError::ResetDeclined)));
    assert_eq!(stored(&dir).unwrap().pos_x, 40.0);
}

#[test]
fn confirmed_reset_restores_defaults() {
    let dir = tempfile::tempdir().unwrap();
    host_in(&dir, "", 1).set(Field::PosX, "40".into()).unwrap();
    host_in(&dir, "y\n", 1).dispatch(InputEvent::ButtonPressed(Button::Reset)).unwrap();
    assert_eq!(stored(&dir).unwrap(), StyleState::default());
}

#[test]
fn assume_yes_skips_the_prompt() {
    let dir = tempfile::tempdir().unwrap();
    host_in(&dir, "", 1).set(Field::PosX, "40".into()).unwrap();
    let mut host = host_in(&dir, "", 1);
    host.assume_yes = true;
    host.dispatch(InputEvent::ButtonPressed(Button::Reset)).unwrap();
    assert_eq!(stored(&dir).unwrap().pos_x, 256.0);
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_moves_and_persists_anchor() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_in(&dir, "", 1);
    host.drag(Point::new(256.0, 256.0), Point::new(100.0, 90.0), DisplayRect::default()).unwrap();
    let state = stored(&dir).unwrap();
    assert_eq!(state.anchor(), Point::new(100.0, 90.0));
    assert!(!host.core.state.is_dragging());
}

#[test]
fn drag_on_scaled_display() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_in(&dir, "", 1);
    host.drag(Point::new(128.0, 128.0), Point::new(50.0, 50.0), DisplayRect::new(0.0, 0.0, 256.0, 256.0))
        .unwrap();
    assert_eq!(stored(&dir).unwrap().anchor(), Point::new(100.0, 100.0));
}

#[test]
fn drag_near_center_snaps() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_in(&dir, "", 1);
    host.drag(Point::new(256.0, 256.0), Point::new(262.0, 400.0), DisplayRect::default()).unwrap();
    assert_eq!(stored(&dir).unwrap().anchor(), Point::new(256.0, 400.0));
}

#[test]
fn drag_that_misses_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_in(&dir, "", 1);
    host.drag(Point::new(5.0, 5.0), Point::new(100.0, 100.0), DisplayRect::default()).unwrap();
    assert!(stored(&dir).is_none());
    assert_eq!(host.core.state.anchor(), Point::new(256.0, 256.0));
}

// =============================================================
// Export
// =============================================================

#[test]
fn download_writes_png_to_out_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cover.png");
    let mut host = host_in(&dir, "", 1);
    host.out = Some(out.clone());
    host.dispatch(InputEvent::ButtonPressed(Button::Download)).unwrap();
    let bytes = fs::read(out).unwrap();
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
}
