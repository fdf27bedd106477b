use super::*;
use canvas::persist::{STORAGE_KEY, load, save};
use canvas::state::StyleState;

#[test]
fn missing_file_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
}

#[test]
fn set_creates_directory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut storage = FileStorage::new(&nested);
    storage.set_item("k", "v").unwrap();
    assert_eq!(fs::read_to_string(nested.join("k.json")).unwrap(), "v");
    assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn keys_map_to_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    storage.set_item("one", "1").unwrap();
    storage.set_item("two", "2").unwrap();
    assert_eq!(storage.get_item("one").unwrap().as_deref(), Some("1"));
    assert_eq!(storage.get_item("two").unwrap().as_deref(), Some("2"));
}

#[test]
fn state_round_trips_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let state = StyleState { text_content: "On Repeat".into(), pos_y: 120.0, ..StyleState::default() };
    save(&mut storage, &state).unwrap();
    assert_eq!(load(&storage), state);
}

#[test]
fn unreadable_path_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be cannot be read as text.
    fs::create_dir_all(dir.path().join("k.json")).unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(matches!(storage.get_item("k"), Err(CoverError::Storage(_))));
}
