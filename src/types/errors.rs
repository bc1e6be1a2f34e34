use thiserror::Error;

// === StorageError ===

/// Faults raised by the bookmark tree storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Node with the given ID was not found.
    #[error("Bookmark node not found: {0}")]
    NotFound(String),
    /// The requested parent folder was not found.
    #[error("Parent folder not found: {0}")]
    ParentNotFound(String),
    /// The node exists but is a link, not a folder.
    #[error("Not a folder: {0}")]
    NotAFolder(String),
    /// The move or removal would break the tree shape.
    #[error("Invalid tree operation: {0}")]
    InvalidMove(String),
    /// Database operation failed.
    #[error("Bookmark database error: {0}")]
    DatabaseError(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

// === OrganizeError ===

/// Errors that abort an organize run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// A run is already in flight.
    #[error("Organize run already in progress")]
    AlreadyRunning,
    /// The tree has no bookmarks bar to organize.
    #[error("Bookmarks bar not found")]
    MissingBookmarksBar,
    /// The storage rejected an operation; the tree may be partially migrated.
    #[error("Storage fault: {0}")]
    Storage(#[from] StorageError),
}
