//! `SQLite` implementation of the guest session store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use chrono::SecondsFormat;
use moviesdb_api::session::{GuestSession, SessionStore, parse_expires_at};
use rusqlite::Connection;

use crate::connection::open_db;
use crate::kv::{delete_values, load_value, save_values};

/// Key holding the guest session ID.
pub const SESSION_ID_KEY: &str = "tmdb_guest_session";

/// Key holding the session expiry (RFC 3339).
pub const SESSION_EXPIRES_KEY: &str = "tmdb_guest_session_expires";

/// Guest session store persisted in the `kv` table.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Wraps an open, migrated connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        open_db(path).map(Self::new)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("session database lock poisoned"))
    }
}

impl SessionStore for SqliteSessionStore {
    fn read(&self) -> Result<Option<GuestSession>> {
        let conn = self.conn()?;
        let session_id = load_value(&conn, SESSION_ID_KEY)?;
        let expires_at = load_value(&conn, SESSION_EXPIRES_KEY)?;

        match (session_id, expires_at) {
            (Some(id), Some(expires)) if !id.is_empty() => {
                let expires_at = parse_expires_at(&expires)?;
                Ok(Some(GuestSession::new(id, expires_at)))
            }
            (None, None) => Ok(None),
            _ => {
                tracing::debug!("incomplete guest session row ignored");
                Ok(None)
            }
        }
    }

    fn write(&self, session: &GuestSession) -> Result<()> {
        let conn = self.conn()?;
        let expires = session
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        save_values(
            &conn,
            &[
                (SESSION_ID_KEY, session.session_id.as_str()),
                (SESSION_EXPIRES_KEY, expires.as_str()),
            ],
        )
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        delete_values(&conn, &[SESSION_ID_KEY, SESSION_EXPIRES_KEY])
    }
}
