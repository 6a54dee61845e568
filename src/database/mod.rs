//! SQLite database layer.
//!
//! Provides connection management and schema migrations for the key-value
//! table that backs persisted bookmarks.
//!
//! # Usage
//!
//! ```no_run
//! use quran_bookmarks::database::Database;
//!
//! let db = Database::open("bookmarks.db").expect("failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
