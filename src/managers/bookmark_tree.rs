//! Bookmark tree storage for Chronomarks.
//!
//! Defines `BookmarkTree`, the storage capability the organizer drives, and
//! `SqliteBookmarkTree`, its implementation backed by SQLite via `rusqlite`.
//! Sibling positions are kept as a contiguous 0-based sequence on every write.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::{Database, BOOKMARKS_BAR_ID, OTHER_BOOKMARKS_ID, ROOT_ID};
use crate::types::bookmark::{BookmarkNode, CreateDetails, MoveDestination};
use crate::types::errors::StorageError;

/// Tree operations the organizer needs from bookmark storage.
#[async_trait]
pub trait BookmarkTree: Send + Sync {
    /// Returns the root node with every descendant nested under `children`.
    async fn get_tree(&self) -> Result<BookmarkNode, StorageError>;
    /// Returns the direct children of a folder, ordered by index.
    async fn get_children(&self, id: &str) -> Result<Vec<BookmarkNode>, StorageError>;
    async fn create(&self, details: CreateDetails) -> Result<BookmarkNode, StorageError>;
    async fn move_node(&self, id: &str, destination: MoveDestination) -> Result<BookmarkNode, StorageError>;
    /// Removes a node together with all of its descendants.
    async fn remove_tree(&self, id: &str) -> Result<(), StorageError>;
}

/// Bookmark tree stored in a SQLite `bookmark_nodes` table.
pub struct SqliteBookmarkTree {
    db: Mutex<Database>,
}

const NODE_COLUMNS: &str = "id, parent_id, title, url, position, date_added";

impl SqliteBookmarkTree {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Adds a link at the end of `parent_id`.
    pub async fn add_link(
        &self,
        parent_id: &str,
        title: &str,
        url: &str,
        date_added: i64,
    ) -> Result<BookmarkNode, StorageError> {
        self.create(CreateDetails::link(parent_id, title, url, date_added)).await
    }

    /// Adds a folder at the end of `parent_id`.
    pub async fn create_folder(&self, parent_id: &str, title: &str) -> Result<BookmarkNode, StorageError> {
        self.create(CreateDetails::folder(parent_id, title, None)).await
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, StorageError> {
        self.db
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("tree lock poisoned: {}", e)))
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn is_fixed_root(id: &str) -> bool {
        id == ROOT_ID || id == BOOKMARKS_BAR_ID || id == OTHER_BOOKMARKS_ID
    }

    /// Reads a single node row into a struct.
    fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<BookmarkNode> {
        Ok(BookmarkNode {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            index: row.get(4)?,
            date_added: row.get(5)?,
            children: None,
        })
    }

    fn find_node(conn: &Connection, id: &str) -> Result<Option<BookmarkNode>, StorageError> {
        let node = conn
            .query_row(
                &format!("SELECT {} FROM bookmark_nodes WHERE id = ?1", NODE_COLUMNS),
                params![id],
                Self::row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    /// Loads a node that must be a folder, mapping absence to `ParentNotFound`.
    fn require_folder(conn: &Connection, id: &str) -> Result<BookmarkNode, StorageError> {
        match Self::find_node(conn, id)? {
            Some(node) if node.is_link() => Err(StorageError::NotAFolder(id.to_string())),
            Some(node) => Ok(node),
            None => Err(StorageError::ParentNotFound(id.to_string())),
        }
    }

    fn child_count(conn: &Connection, parent_id: &str) -> Result<i32, StorageError> {
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM bookmark_nodes WHERE parent_id = ?1",
            params![parent_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_children(conn: &Connection, parent_id: &str) -> Result<Vec<BookmarkNode>, StorageError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bookmark_nodes WHERE parent_id = ?1 ORDER BY position",
            NODE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![parent_id], Self::row_to_node)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// True when `candidate` is `ancestor` or lies somewhere beneath it.
    fn is_within(conn: &Connection, candidate: &str, ancestor: &str) -> Result<bool, StorageError> {
        let mut current = Some(candidate.to_string());
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = Self::find_node(conn, &id)?.and_then(|n| n.parent_id);
        }
        Ok(false)
    }

    fn clamp_index(index: Option<i32>, len: i32) -> i32 {
        match index {
            Some(i) => i.clamp(0, len),
            None => len,
        }
    }

    /// Attaches each folder's children, recursively, from a parent -> children map.
    fn attach_children(node: &mut BookmarkNode, by_parent: &mut HashMap<String, Vec<BookmarkNode>>) {
        if node.is_link() {
            return;
        }
        let mut children = by_parent.remove(&node.id).unwrap_or_default();
        children.sort_by_key(|c| c.index);
        for child in children.iter_mut() {
            Self::attach_children(child, by_parent);
        }
        node.children = Some(children);
    }
}

#[async_trait]
impl BookmarkTree for SqliteBookmarkTree {
    async fn get_tree(&self) -> Result<BookmarkNode, StorageError> {
        let db = self.lock()?;
        let conn = db.connection();

        let mut stmt = conn.prepare(&format!("SELECT {} FROM bookmark_nodes", NODE_COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_node)?;

        let mut root = None;
        let mut by_parent: HashMap<String, Vec<BookmarkNode>> = HashMap::new();
        for row in rows {
            let node = row?;
            match node.parent_id.clone() {
                Some(pid) => by_parent.entry(pid).or_default().push(node),
                None => root = Some(node),
            }
        }

        let mut root = root.ok_or_else(|| StorageError::NotFound(ROOT_ID.to_string()))?;
        Self::attach_children(&mut root, &mut by_parent);
        Ok(root)
    }

    async fn get_children(&self, id: &str) -> Result<Vec<BookmarkNode>, StorageError> {
        let db = self.lock()?;
        let conn = db.connection();
        match Self::find_node(conn, id)? {
            None => Err(StorageError::NotFound(id.to_string())),
            Some(node) if node.is_link() => Err(StorageError::NotAFolder(id.to_string())),
            Some(_) => Self::list_children(conn, id),
        }
    }

    /// Inserts a node at the requested index, shifting later siblings down.
    async fn create(&self, details: CreateDetails) -> Result<BookmarkNode, StorageError> {
        let mut db = self.lock()?;
        let tx = db.connection_mut().transaction()?;

        Self::require_folder(&tx, &details.parent_id)?;
        let position = Self::clamp_index(details.index, Self::child_count(&tx, &details.parent_id)?);

        let node = BookmarkNode {
            id: Uuid::new_v4().to_string(),
            parent_id: Some(details.parent_id),
            title: details.title,
            date_added: Some(details.date_added.unwrap_or_else(Self::now_ms)),
            url: details.url,
            index: position,
            children: None,
        };

        tx.execute(
            "UPDATE bookmark_nodes SET position = position + 1 WHERE parent_id = ?1 AND position >= ?2",
            params![node.parent_id, position],
        )?;
        tx.execute(
            "INSERT INTO bookmark_nodes (id, parent_id, title, url, position, date_added) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![node.id, node.parent_id, node.title, node.url, node.index, node.date_added],
        )?;
        tx.commit()?;

        Ok(node)
    }

    /// Moves a node under a new parent.
    ///
    /// The destination index is read against the parent's children with the
    /// moved node already detached, and clamped to the valid range.
    async fn move_node(&self, id: &str, destination: MoveDestination) -> Result<BookmarkNode, StorageError> {
        if Self::is_fixed_root(id) {
            return Err(StorageError::InvalidMove(format!("cannot move fixed folder {}", id)));
        }

        let mut db = self.lock()?;
        let tx = db.connection_mut().transaction()?;

        let node = Self::find_node(&tx, id)?.ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Self::require_folder(&tx, &destination.parent_id)?;
        if Self::is_within(&tx, &destination.parent_id, id)? {
            return Err(StorageError::InvalidMove(format!(
                "cannot move {} into its own subtree",
                id
            )));
        }

        // Detach: close the gap left in the old parent.
        tx.execute(
            "UPDATE bookmark_nodes SET position = position - 1 WHERE parent_id = ?1 AND position > ?2",
            params![node.parent_id, node.index],
        )?;

        let siblings: i32 = tx.query_row(
            "SELECT COUNT(*) FROM bookmark_nodes WHERE parent_id = ?1 AND id != ?2",
            params![destination.parent_id, id],
            |row| row.get(0),
        )?;
        let position = Self::clamp_index(destination.index, siblings);

        tx.execute(
            "UPDATE bookmark_nodes SET position = position + 1 WHERE parent_id = ?1 AND position >= ?2 AND id != ?3",
            params![destination.parent_id, position, id],
        )?;
        tx.execute(
            "UPDATE bookmark_nodes SET parent_id = ?1, position = ?2 WHERE id = ?3",
            params![destination.parent_id, position, id],
        )?;
        tx.commit()?;

        Ok(BookmarkNode {
            parent_id: Some(destination.parent_id),
            index: position,
            ..node
        })
    }

    async fn remove_tree(&self, id: &str) -> Result<(), StorageError> {
        if Self::is_fixed_root(id) {
            return Err(StorageError::InvalidMove(format!("cannot remove fixed folder {}", id)));
        }

        let mut db = self.lock()?;
        let tx = db.connection_mut().transaction()?;

        let node = Self::find_node(&tx, id)?.ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        tx.execute(
            "WITH RECURSIVE subtree(id) AS (
                 SELECT ?1
                 UNION ALL
                 SELECT n.id FROM bookmark_nodes n JOIN subtree s ON n.parent_id = s.id
             )
             DELETE FROM bookmark_nodes WHERE id IN (SELECT id FROM subtree)",
            params![id],
        )?;
        tx.execute(
            "UPDATE bookmark_nodes SET position = position - 1 WHERE parent_id = ?1 AND position > ?2",
            params![node.parent_id, node.index],
        )?;
        tx.commit()?;

        Ok(())
    }
}
