//! Chronomarks database layer.
//!
//! Provides SQLite connection management and schema migrations.
//!
//! # Usage
//!
//! ```no_run
//! use chronomarks::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("chronomarks.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
pub use migrations::{BOOKMARKS_BAR_ID, OTHER_BOOKMARKS_ID, ROOT_ID};
