use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use taskcli_core::ops::add_task;
use taskcli_core::store::{TaskStore, TASKS_FILE};
use taskcli_core::task::TaskData;

fn store_in(temp: &TempDir) -> (TaskStore, PathBuf) {
    let path = temp.path().join(TASKS_FILE);
    (TaskStore::new(&path), path)
}

#[test]
fn load_missing_file_creates_default_collection() {
    let temp = TempDir::new().expect("tempdir");
    let (store, path) = store_in(&temp);

    let data = store.load();
    assert_eq!(data, TaskData::default());
    assert!(path.exists());

    let on_disk: TaskData =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(on_disk, TaskData::default());
}

#[test]
fn load_empty_file_recovers_to_default() {
    let temp = TempDir::new().expect("tempdir");
    let (store, path) = store_in(&temp);
    fs::write(&path, "  \n").expect("seed");

    let data = store.load();
    assert_eq!(data, TaskData::default());
}

#[test]
fn load_invalid_json_recovers_and_resets_the_file() {
    let temp = TempDir::new().expect("tempdir");
    let (store, path) = store_in(&temp);
    fs::write(&path, "not json").expect("seed");

    let data = store.load();
    assert_eq!(data, TaskData::default());

    // Immediate-reset policy: the file is valid again right after the load.
    let on_disk: TaskData =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(on_disk, TaskData::default());
}

#[test]
fn load_bare_array_shape_is_treated_as_corrupt() {
    let temp = TempDir::new().expect("tempdir");
    let (store, path) = store_in(&temp);
    fs::write(&path, "[]").expect("seed");

    let data = store.load();
    assert_eq!(data, TaskData::default());

    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("\"nextId\""));
}

#[test]
fn load_missing_next_id_is_treated_as_corrupt() {
    let temp = TempDir::new().expect("tempdir");
    let (store, _path) = store_in(&temp);
    fs::write(store.path(), "{\"tasks\": []}").expect("seed");

    assert_eq!(store.load(), TaskData::default());
}

#[test]
fn save_then_load_round_trips() {
    let temp = TempDir::new().expect("tempdir");
    let (store, _path) = store_in(&temp);

    let mut data = TaskData::default();
    add_task(&mut data, "Write the release notes");
    add_task(&mut data, "Cut the release");
    store.save(&data);

    assert_eq!(store.load(), data);
}

#[test]
fn save_of_unmodified_load_is_byte_stable() {
    let temp = TempDir::new().expect("tempdir");
    let (store, path) = store_in(&temp);

    let mut data = TaskData::default();
    add_task(&mut data, "Write the release notes");
    store.save(&data);
    let first = fs::read_to_string(&path).expect("read");

    let loaded = store.load();
    store.save(&loaded);
    let second = fs::read_to_string(&path).expect("read");
    assert_eq!(first, second);
}

#[test]
fn saved_file_is_indented_and_camel_case() {
    let temp = TempDir::new().expect("tempdir");
    let (store, path) = store_in(&temp);

    let mut data = TaskData::default();
    add_task(&mut data, "One");
    store.save(&data);

    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("\n  \"tasks\""));
    assert!(text.contains("\"createdAt\""));
    assert!(text.contains("\"updatedAt\""));
    assert!(text.contains("\"nextId\": 2"));
}
