//! Unit tests for the RPC handler: all JSON-RPC methods dispatched by `handle_method`.
//!
//! These go through the same code path the `chronomarks-rpc` binary uses,
//! with a temporary on-disk SQLite database.

use chrono::{Local, TimeZone};
use serde_json::json;
use tempfile::TempDir;

use chronomarks::app::App;
use chronomarks::rpc_handler::handle_method;

/// Create a fresh App backed by a temp directory DB.
fn setup() -> (App, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let app = App::new(tmp.path().join("test.db")).expect("Failed to init App");
    (app, tmp)
}

fn at(year: i32, month: u32, day: u32) -> i64 {
    Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap()
        .timestamp_millis()
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(res, json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Bookmarks ───

#[tokio::test]
async fn test_bookmark_add_defaults_to_bar() {
    let (app, _tmp) = setup();

    let res = handle_method(&app, "bookmark.add", &json!({
        "url": "https://example.com",
        "title": "Example",
        "date_added": 1_600_000_000_000i64
    }))
    .await
    .unwrap();
    assert_eq!(res["parentId"], "1");
    assert_eq!(res["dateAdded"], 1_600_000_000_000i64);
    assert_eq!(res["url"], "https://example.com");

    let children = handle_method(&app, "bookmark.children", &json!({"id": "1"})).await.unwrap();
    let arr = children.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["title"], "Example");
}

#[tokio::test]
async fn test_bookmark_add_invalid_url() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "bookmark.add", &json!({
        "url": "ftp://bad.com",
        "title": "Bad"
    }))
    .await;
    assert!(res.unwrap_err().contains("invalid url"));
}

#[tokio::test]
async fn test_bookmark_add_missing_params() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "bookmark.add", &json!({"title": "No url"})).await;
    assert_eq!(res.unwrap_err(), "missing url");
    let res = handle_method(&app, "bookmark.children", &json!({})).await;
    assert_eq!(res.unwrap_err(), "missing id");
}

#[tokio::test]
async fn test_bookmark_add_into_missing_folder() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "bookmark.add", &json!({
        "url": "https://example.com",
        "title": "Orphan",
        "parent_id": "missing"
    }))
    .await;
    assert!(res.unwrap_err().contains("Parent folder not found"));
}

#[tokio::test]
async fn test_bookmark_tree_shape() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmark.create_folder", &json!({"title": "Work"})).await.unwrap();

    let tree = handle_method(&app, "bookmark.tree", &json!({})).await.unwrap();
    assert_eq!(tree["id"], "0");
    assert_eq!(tree["children"][0]["title"], "Bookmarks bar");
    assert_eq!(tree["children"][0]["children"][0]["title"], "Work");
    assert!(tree["children"][0]["children"][0].get("url").is_none());
}

// ─── Organizer ───

#[tokio::test]
async fn test_organize_run_returns_report() {
    let (app, _tmp) = setup();
    let folder = handle_method(&app, "bookmark.create_folder", &json!({"title": "Old"})).await.unwrap();
    let folder_id = folder["id"].as_str().unwrap();
    for (i, year) in [2019, 2021].into_iter().enumerate() {
        handle_method(&app, "bookmark.add", &json!({
            "url": format!("https://example.com/{}", i),
            "title": format!("Link {}", i),
            "parent_id": folder_id,
            "date_added": at(year, 4, 1)
        }))
        .await
        .unwrap();
    }

    let report = handle_method(&app, "organize.run", &json!({})).await.unwrap();

    assert_eq!(report["links_collected"], 2);
    assert_eq!(report["year_folders"].as_array().unwrap().len(), 3);
    assert_eq!(report["folders_removed"], 1);

    let status = handle_method(&app, "organize.status", &json!({})).await.unwrap();
    assert_eq!(status["state"], "idle");
    assert_eq!(status["last"]["status"], "completed");
    assert_eq!(status["last"]["links_collected"], 2);
}

#[tokio::test]
async fn test_organize_status_before_any_run() {
    let (app, _tmp) = setup();
    let status = handle_method(&app, "organize.status", &json!({})).await.unwrap();
    assert_eq!(status, json!({"state": "idle", "last": null}));
}

#[tokio::test]
async fn test_organize_start_runs_in_background() {
    let (app, _tmp) = setup();
    let folder = handle_method(&app, "bookmark.create_folder", &json!({"title": "Old"})).await.unwrap();
    handle_method(&app, "bookmark.add", &json!({
        "url": "https://example.com",
        "title": "Link",
        "parent_id": folder["id"].clone(),
        "date_added": at(2020, 2, 2)
    }))
    .await
    .unwrap();

    let res = handle_method(&app, "organize.start", &json!({})).await.unwrap();
    assert_eq!(res, json!({"started": true}));

    // Let the spawned run finish.
    for _ in 0..100 {
        if app.organizer.last_outcome().is_some() && !app.organizer.is_running() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let status = handle_method(&app, "organize.status", &json!({})).await.unwrap();
    assert_eq!(status["state"], "idle");
    assert_eq!(status["last"]["status"], "completed");
}

#[tokio::test]
async fn test_organize_start_refuses_second_start() {
    let (app, _tmp) = setup();
    let folder = handle_method(&app, "bookmark.create_folder", &json!({"title": "Old"})).await.unwrap();
    handle_method(&app, "bookmark.add", &json!({
        "url": "https://example.com",
        "title": "Link",
        "parent_id": folder["id"].clone(),
        "date_added": at(2020, 2, 2)
    }))
    .await
    .unwrap();

    let first = handle_method(&app, "organize.start", &json!({})).await;
    let second = handle_method(&app, "organize.start", &json!({})).await;

    assert_eq!(first.unwrap(), json!({"started": true}));
    assert!(second.unwrap_err().contains("already in progress"));
    let status = handle_method(&app, "organize.status", &json!({})).await.unwrap();
    assert_eq!(status["state"], "running");
}
