//! Unit tests for the Chronomarks database layer (connection + migrations).

use chronomarks::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use chronomarks::database::{Database, BOOKMARKS_BAR_ID, OTHER_BOOKMARKS_ID, ROOT_ID};

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_node_table_and_index() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for (kind, name) in [("table", "bookmark_nodes"), ("table", "schema_version"), ("index", "idx_bookmark_nodes_parent")] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = ?1 AND name = ?2",
                [kind, name],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "{} '{}' should exist after migrations", kind, name);
    }
}

#[test]
fn test_migrations_seed_fixed_roots() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let rows: Vec<(String, Option<String>, String, i32)> = {
        let mut stmt = conn
            .prepare("SELECT id, parent_id, title, position FROM bookmark_nodes ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    };

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], (ROOT_ID.to_string(), None, String::new(), 0));
    assert_eq!(rows[1], (BOOKMARKS_BAR_ID.to_string(), Some(ROOT_ID.to_string()), "Bookmarks bar".to_string(), 0));
    assert_eq!(rows[2], (OTHER_BOOKMARKS_ID.to_string(), Some(ROOT_ID.to_string()), "Other bookmarks".to_string(), 1));
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);

    let roots: i32 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM bookmark_nodes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(roots, 3, "fixed roots must not be seeded twice");
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open with file path should succeed");
    assert!(db_path.exists(), "Database file should exist on disk");
}
