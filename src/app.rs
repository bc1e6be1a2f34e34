//! App Core for Chronomarks.
//!
//! Holds the bookmark tree and the organizer that runs against it.

use std::path::Path;
use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::bookmark_tree::{BookmarkTree, SqliteBookmarkTree};
use crate::services::organizer::Organizer;
use crate::types::errors::StorageError;

/// Central application struct.
///
/// `tree` and `organizer` share the same storage; the organizer only sees it
/// through the `BookmarkTree` capability.
pub struct App {
    pub tree: Arc<SqliteBookmarkTree>,
    pub organizer: Arc<Organizer>,
}

impl App {
    /// Opens (or creates) the bookmark database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        let db = Database::open(db_path)?;
        Ok(Self::with_database(db))
    }

    /// App over a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::with_database(Database::open_in_memory()?))
    }

    fn with_database(db: Database) -> Self {
        let tree = Arc::new(SqliteBookmarkTree::new(db));
        let capability: Arc<dyn BookmarkTree> = tree.clone();
        Self {
            organizer: Arc::new(Organizer::new(capability)),
            tree,
        }
    }
}
