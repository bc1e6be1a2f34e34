//! RPC method handler for the Chronomarks JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the bookmark tree or the organizer.

use serde_json::{json, Value};

use crate::app::App;
use crate::database::BOOKMARKS_BAR_ID;
use crate::managers::bookmark_tree::BookmarkTree;

fn str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.tree" => {
            let root = app.tree.get_tree().await.map_err(|e| e.to_string())?;
            serde_json::to_value(root).map_err(|e| e.to_string())
        }
        "bookmark.children" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let children = app.tree.get_children(id).await.map_err(|e| e.to_string())?;
            serde_json::to_value(children).map_err(|e| e.to_string())
        }
        "bookmark.add" => {
            let url = str_param(params, "url").ok_or("missing url")?;
            let title = str_param(params, "title").ok_or("missing title")?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("invalid url: must start with http:// or https://".to_string());
            }
            let parent = str_param(params, "parent_id").unwrap_or(BOOKMARKS_BAR_ID);
            let date_added = params
                .get("date_added")
                .and_then(|v| v.as_i64())
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
            let node = app
                .tree
                .add_link(parent, title, url, date_added)
                .await
                .map_err(|e| e.to_string())?;
            serde_json::to_value(node).map_err(|e| e.to_string())
        }
        "bookmark.create_folder" => {
            let title = str_param(params, "title").ok_or("missing title")?;
            let parent = str_param(params, "parent_id").unwrap_or(BOOKMARKS_BAR_ID);
            let node = app
                .tree
                .create_folder(parent, title)
                .await
                .map_err(|e| e.to_string())?;
            serde_json::to_value(node).map_err(|e| e.to_string())
        }

        // ─── Organizer ───
        "organize.run" => {
            let report = app.organizer.run().await.map_err(|e| e.to_string())?;
            serde_json::to_value(report).map_err(|e| e.to_string())
        }
        "organize.start" => {
            app.organizer.start().map_err(|e| e.to_string())?;
            Ok(json!({"started": true}))
        }
        "organize.status" => Ok(json!({
            "state": app.organizer.state().as_str(),
            "last": app.organizer.last_outcome(),
        })),

        _ => Err(format!("unknown method: {}", method)),
    }
}
