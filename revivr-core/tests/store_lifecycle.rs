//! Integration test for the SQLite-backed session.
//!
//! Exercises: open_db, migrate, SqliteStore get/set/remove, Session restore,
//! mutators, clear, and persistence across connections.

use revivr_core::db::{self, SqliteStore};
use revivr_core::schema;
use revivr_core::session::{self, LANGUAGE_KEY, REVIEW_KEY, SOURCE_KEY};
use revivr_core::{Language, Session, SessionState, SlotStore};

fn temp_db_path() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.db");
    (dir, path)
}

#[test]
fn open_db_applies_schema_once() {
    let (_dir, path) = temp_db_path();
    let conn = db::open_db(&path).unwrap();

    let version = schema::current_version(&conn).unwrap();
    assert_eq!(version, schema::LATEST_VERSION);

    let journal: String = conn
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let key_type: String = conn
        .query_row(
            "SELECT type FROM pragma_table_info('slots') WHERE name = 'key'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(key_type, "TEXT");
    drop(conn);

    // Reopening must not insert a second version row.
    let conn = db::open_db(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1, "migration should be idempotent");
}

#[test]
fn slots_upsert_and_remove() {
    let (_dir, path) = temp_db_path();
    let mut store = SqliteStore::open(&path).unwrap();

    assert_eq!(store.get("missing").unwrap(), None);

    store.set(SOURCE_KEY, "first").unwrap();
    store.set(SOURCE_KEY, "second").unwrap();
    assert_eq!(store.get(SOURCE_KEY).unwrap().as_deref(), Some("second"));

    let count: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM slots", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1, "set should upsert, not append");

    store.remove(SOURCE_KEY).unwrap();
    assert_eq!(store.get(SOURCE_KEY).unwrap(), None);

    // Removing an absent key is not an error.
    store.remove(SOURCE_KEY).unwrap();
}

#[test]
fn session_survives_reopen() {
    let (_dir, path) = temp_db_path();

    {
        let mut session = Session::restore(SqliteStore::open(&path).unwrap());
        assert_eq!(session.state(), &SessionState::default());

        session.set_source_text("public class Main {}").unwrap();
        session.set_language(Language::Java).unwrap();
        session.set_review_text("Add a main method.").unwrap();
    }

    let session = Session::restore(SqliteStore::open(&path).unwrap());
    assert_eq!(
        session.state(),
        &SessionState {
            source_text: "public class Main {}".into(),
            language: Language::Java,
            review_text: "Add a main method.".into(),
        }
    );
}

#[test]
fn persist_restore_round_trip_for_every_language() {
    let (_dir, path) = temp_db_path();
    let mut store = SqliteStore::open(&path).unwrap();

    for lang in Language::ALL {
        let state = SessionState {
            source_text: format!("// {}\nconst ünïcödé = '✓';\n", lang.label()),
            language: lang,
            review_text: "- line 1: fine\n- line 2: fine".into(),
        };
        session::persist(&mut store, &state).unwrap();
        assert_eq!(session::restore(&store), state);
    }
}

#[test]
fn clear_removes_source_and_review_but_not_language() {
    let (_dir, path) = temp_db_path();

    {
        let mut session = Session::restore(SqliteStore::open(&path).unwrap());
        session.set_source_text("x = 1").unwrap();
        session.set_language(Language::Python).unwrap();
        session.set_review_text("ok").unwrap();
        session.clear().unwrap();

        assert_eq!(session.state().source_text, "");
        assert_eq!(session.state().review_text, "");
        assert_eq!(session.store().get(SOURCE_KEY).unwrap(), None);
        assert_eq!(session.store().get(REVIEW_KEY).unwrap(), None);
        assert_eq!(
            session.store().get(LANGUAGE_KEY).unwrap().as_deref(),
            Some("python")
        );
    }

    let session = Session::restore(SqliteStore::open(&path).unwrap());
    assert_eq!(session.state().source_text, "");
    assert_eq!(session.state().review_text, "");
    assert_eq!(session.state().language, Language::Python);
}
