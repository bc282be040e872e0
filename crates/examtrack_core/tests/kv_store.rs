use examtrack_core::db::{open_db, open_db_in_memory};
use examtrack_core::repo::json::{load_json_with_source, LoadSource, TASKS_KEY};
use examtrack_core::{load_json, save_json, KeyValueStore, SqliteKeyValueStore, Task};

#[test]
fn put_then_get_returns_latest_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert_eq!(store.get_raw("theme").unwrap(), None);
    store.put_raw("theme", "\"light\"").unwrap();
    store.put_raw("theme", "\"dark\"").unwrap();
    assert_eq!(store.get_raw("theme").unwrap().as_deref(), Some("\"dark\""));
}

#[test]
fn load_json_falls_back_on_missing_and_corrupt_documents() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    let (tasks, source) = load_json_with_source::<Vec<Task>, _>(&store, TASKS_KEY, Vec::new());
    assert!(tasks.is_empty());
    assert_eq!(source, LoadSource::Missing);

    store.put_raw(TASKS_KEY, "{not json").unwrap();
    let (tasks, source) = load_json_with_source::<Vec<Task>, _>(&store, TASKS_KEY, Vec::new());
    assert!(tasks.is_empty());
    assert_eq!(source, LoadSource::Corrupt);

    store.put_raw("goalAchieved", "\"yes\"").unwrap();
    assert!(!load_json(&store, "goalAchieved", false));
}

#[test]
fn documents_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("examtrack.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteKeyValueStore::new(&conn);
        save_json(&store, TASKS_KEY, &vec![Task::new("read", "2025-05-05")]).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    let tasks: Vec<Task> = load_json(&store, TASKS_KEY, Vec::new());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "read");
}
