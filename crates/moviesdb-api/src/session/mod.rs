//! Guest sessions.
//!
//! A guest session is a short-lived anonymous identifier issued by TMDB that
//! scopes the favorites list. It is cached through a [`SessionStore`] and
//! replaced, never renewed, once it expires.

mod provider;
mod store;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::tmdb::TmdbGuestSessionResponse;

#[allow(clippy::module_name_repetitions)]
pub use provider::SessionProvider;
#[allow(clippy::module_name_repetitions)]
pub use store::{MemorySessionStore, SessionStore};

/// Expiry format used by `authentication/guest_session/new`.
const TMDB_EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A guest session and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestSession {
    /// Guest session ID.
    pub session_id: String,
    /// Instant after which the session must not be used.
    pub expires_at: DateTime<Utc>,
}

impl GuestSession {
    /// Creates a session value.
    pub fn new(session_id: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            expires_at,
        }
    }

    /// Builds a session from the TMDB creation response.
    ///
    /// # Errors
    ///
    /// Returns an error if TMDB reported failure, the ID is empty, or the
    /// expiry cannot be parsed.
    pub fn from_response(response: &TmdbGuestSessionResponse) -> Result<Self> {
        if !response.success {
            bail!("guest session creation reported failure");
        }
        if response.guest_session_id.is_empty() {
            bail!("no guest_session_id returned");
        }
        let expires_at = parse_expires_at(&response.expires_at)?;
        Ok(Self::new(response.guest_session_id.clone(), expires_at))
    }

    /// Whether the session is expired at `now` (`now >= expires_at`).
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the session is expired now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Parses a session expiry.
///
/// Accepts the TMDB format (`2024-01-01 12:00:00 UTC`) and RFC 3339.
///
/// # Errors
///
/// Returns an error if neither format matches.
pub fn parse_expires_at(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, TMDB_EXPIRY_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid session expiry: {value}"))
}
