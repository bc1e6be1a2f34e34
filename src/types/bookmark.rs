use serde::{Deserialize, Serialize};

/// A node in the bookmark tree: either a link (has a `url`) or a folder.
///
/// Field names serialize in camelCase so the RPC surface speaks the same
/// shape as a browser's bookmarks API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub index: i32,
    /// Milliseconds since the UNIX epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    /// Links carry a URL; folders never do.
    pub fn is_link(&self) -> bool {
        self.url.is_some()
    }

    /// Creation timestamp in milliseconds, with a missing value read as epoch.
    pub fn date_added_ms(&self) -> i64 {
        self.date_added.unwrap_or(0)
    }
}

/// Parameters for creating a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDetails {
    pub parent_id: String,
    /// Position among the parent's children; appended when `None`.
    #[serde(default)]
    pub index: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date_added: Option<i64>,
}

impl CreateDetails {
    pub fn folder(parent_id: &str, title: &str, index: Option<i32>) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            index,
            title: title.to_string(),
            url: None,
            date_added: None,
        }
    }

    pub fn link(parent_id: &str, title: &str, url: &str, date_added: i64) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            index: None,
            title: title.to_string(),
            url: Some(url.to_string()),
            date_added: Some(date_added),
        }
    }
}

/// Destination of a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDestination {
    pub parent_id: String,
    #[serde(default)]
    pub index: Option<i32>,
}

impl MoveDestination {
    pub fn new(parent_id: &str, index: i32) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            index: Some(index),
        }
    }
}
