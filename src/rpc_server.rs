//! Chronomarks RPC server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"organize.run", "params":{}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::io::{self, Write};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use chronomarks::app::App;
use chronomarks::config::ServerConfig;
use chronomarks::logging::init_tracing;
use chronomarks::rpc_handler::handle_method;

fn emit(value: &Value) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", value).and_then(|_| stdout.flush()).is_err() {
        error!("stdout closed, dropping response");
    }
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();
    if let Err(e) = init_tracing(&config.log_filter) {
        eprintln!("tracing init failed: {}", e);
    }

    let app = match App::new(&config.db_path) {
        Ok(app) => app,
        Err(e) => {
            error!(path = %config.db_path.display(), error = %e, "failed to open bookmark database");
            std::process::exit(1);
        }
    };
    info!(path = %config.db_path.display(), "bookmark database open");

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }
}
