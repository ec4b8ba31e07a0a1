//! Integration tests for the SQLite-backed record store.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use student_records::{search, Change, RecordStore, Student, ValidationError};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> RecordStore {
    RecordStore::open(db_path(dir)).unwrap()
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("database.db")
}

fn student(id: i64, name: &str, course: &str, mobile: &str) -> Student {
    Student {
        id,
        name: name.to_string(),
        course: course.to_string(),
        mobile: mobile.to_string(),
    }
}

#[test]
fn open_creates_an_empty_table() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(db_path(&dir).exists());
    assert_eq!(store.path(), db_path(&dir));
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn open_rejects_a_directory() {
    let dir = TempDir::new().unwrap();
    assert!(RecordStore::open(dir.path()).is_err());
}

#[test]
fn open_rejects_a_corrupt_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(db_path(&dir), b"this is not a sqlite database at all, not even close")
        .unwrap();
    assert!(RecordStore::open(db_path(&dir)).is_err());
}

#[test]
fn open_keeps_existing_rows() {
    let dir = TempDir::new().unwrap();
    {
        let conn = Connection::open(db_path(&dir)).unwrap();
        conn.execute_batch(
            "CREATE TABLE students (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL,
                 course TEXT NOT NULL,
                 mobile TEXT NOT NULL
             );
             INSERT INTO students (name, course, mobile) VALUES ('Grace', 'Math', '555-9999');",
        )
        .unwrap();
    }

    let store = store_in(&dir);
    assert_eq!(
        store.list_all().unwrap(),
        vec![student(1, "Grace", "Math", "555-9999")]
    );
}

#[test]
fn insert_update_delete_scenario() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let id = store.insert("Ada Lovelace", "Math", "555-1111").unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        store.list_all().unwrap(),
        vec![student(1, "Ada Lovelace", "Math", "555-1111")]
    );

    assert_eq!(
        store.update(1, "Ada L.", "Physics", "555-2222").unwrap(),
        Change::Applied
    );
    assert_eq!(
        store.list_all().unwrap(),
        vec![student(1, "Ada L.", "Physics", "555-2222")]
    );

    assert_eq!(store.delete(1).unwrap(), Change::Applied);
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn inserts_are_listed_in_storage_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.insert("Zed", "Biology", "1").unwrap();
    store.insert("Amy", "Chemistry", "2").unwrap();

    let names: Vec<String> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Zed", "Amy"]);
}

#[test]
fn empty_fields_never_reach_storage() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert("Ann", "Math", "1").unwrap();
    let before = store.list_all().unwrap();

    let cases = [("", "Math", "1"), ("Ann", "", "1"), ("Ann", "Math", "")];
    for (name, course, mobile) in cases {
        let err = store.insert(name, course, mobile).unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());

        let err = store.update(1, name, course, mobile).unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    assert_eq!(store.list_all().unwrap(), before);
}

#[test]
fn validation_runs_before_the_database_is_opened() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::remove_file(db_path(&dir)).unwrap();

    let err = store.insert("", "Math", "1").unwrap_err();
    assert!(err.downcast_ref::<ValidationError>().is_some());
    assert!(!db_path(&dir).exists());
}

#[test]
fn unknown_ids_are_reported_not_found() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert("Ann", "Math", "1").unwrap();

    assert_eq!(
        store.update(42, "Bob", "Math", "2").unwrap(),
        Change::NotFound
    );
    assert_eq!(store.delete(42).unwrap(), Change::NotFound);
    assert_eq!(
        store.list_all().unwrap(),
        vec![student(1, "Ann", "Math", "1")]
    );
}

#[test]
fn deleted_ids_are_never_reused() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let first = store.insert("Ann", "Math", "1").unwrap();
    let second = store.insert("Bob", "Math", "2").unwrap();
    store.delete(second).unwrap();
    store.delete(first).unwrap();

    let third = store.insert("Cy", "Math", "3").unwrap();
    assert!(third > second);
    assert!(store.list_all().unwrap().iter().all(|s| s.id == third));
}

#[test]
fn storage_removed_after_startup_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::remove_file(db_path(&dir)).unwrap();

    assert!(store.list_all().is_err());
    assert!(store.insert("Ann", "Math", "1").is_err());
    assert!(!db_path(&dir).exists());
}

#[test]
fn search_runs_over_listed_rows() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    for name in ["Ann", "Anna", "Bob"] {
        store.insert(name, "Astronomy", "555").unwrap();
    }
    let records = store.list_all().unwrap();

    assert_eq!(search(&records, "Ann").len(), 2);
    assert!(search(&records, "bob").is_empty());
    assert_eq!(search(&records, "").len(), records.len());
}

/// Shared buffer the fmt subscriber writes log lines into.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn every_statement_is_logged_at_debug() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let id = store.insert("Ann", "Math", "1").unwrap();
        store.update(id, "Ann B.", "Physics", "2").unwrap();
        store.list_all().unwrap();
        store.delete(id).unwrap();
    });

    let text = logs.text();
    for message in [
        "inserting student",
        "updating student",
        "listing students",
        "deleting student",
    ] {
        assert!(
            text.lines()
                .any(|line| line.contains("DEBUG") && line.contains(message)),
            "missing debug line for {message:?} in:\n{text}"
        );
    }
}
