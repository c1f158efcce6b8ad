//! Local storage for moviesdb.
//!
//! Uses `rusqlite` (bundled `SQLite`) as the client-side key-value store
//! that holds the current guest session.

/// Key-value rows.
pub mod kv;
mod connection;
mod migrations;
mod session;

#[allow(clippy::module_name_repetitions)]
pub use connection::open_db;
#[allow(clippy::module_name_repetitions)]
pub use session::{SESSION_EXPIRES_KEY, SESSION_ID_KEY, SqliteSessionStore};
