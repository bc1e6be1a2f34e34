//! Schema migrations for the Chronomarks SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Id of the invisible tree root.
pub const ROOT_ID: &str = "0";
/// Id of the bookmarks bar, the tree organized by a run.
pub const BOOKMARKS_BAR_ID: &str = "1";
/// Id of the "Other bookmarks" folder.
pub const OTHER_BOOKMARKS_ID: &str = "2";

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Bookmark node tree with fixed roots")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: node table plus the three fixed roots.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookmark_nodes (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            title TEXT NOT NULL DEFAULT '',
            url TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            date_added INTEGER,
            FOREIGN KEY (parent_id) REFERENCES bookmark_nodes(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bookmark_nodes_parent ON bookmark_nodes(parent_id, position);

        INSERT OR IGNORE INTO bookmark_nodes (id, parent_id, title, url, position, date_added)
            VALUES ('0', NULL, '', NULL, 0, NULL);
        INSERT OR IGNORE INTO bookmark_nodes (id, parent_id, title, url, position, date_added)
            VALUES ('1', '0', 'Bookmarks bar', NULL, 0, NULL);
        INSERT OR IGNORE INTO bookmark_nodes (id, parent_id, title, url, position, date_added)
            VALUES ('2', '0', 'Other bookmarks', NULL, 1, NULL);
        ",
    )?;
    Ok(())
}
