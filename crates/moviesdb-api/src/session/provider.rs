//! `SessionProvider` - cached guest session acquisition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::instrument;

use super::GuestSession;
use super::store::SessionStore;
use crate::catalog::{QueryError, QueryResult};
use crate::tmdb::LocalTmdbApi;

/// Hands out a valid guest session, creating one when the cached session is
/// absent or expired.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SessionProvider<S> {
    store: S,
    /// Serializes acquisition so concurrent callers share one creation.
    acquire_lock: Mutex<()>,
}

impl<S: SessionStore> SessionProvider<S> {
    /// Creates a provider backed by `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            acquire_lock: Mutex::new(()),
        }
    }

    /// Backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the stored session if it is still valid at `now`.
    ///
    /// Read failures are logged and treated as "no session".
    pub fn cached_at(&self, now: DateTime<Utc>) -> Option<GuestSession> {
        match self.store.read() {
            Ok(Some(session)) if !session.is_expired_at(now) => Some(session),
            Ok(Some(session)) => {
                tracing::debug!(expires_at = %session.expires_at, "cached guest session expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cached guest session");
                None
            }
        }
    }

    /// Returns a valid guest session, creating one if needed.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if a new session is needed and creation fails.
    /// Callers must then skip favorite-dependent operations.
    pub async fn acquire_session<A: LocalTmdbApi>(&self, api: &A) -> QueryResult<GuestSession> {
        self.acquire_session_at(api, Utc::now()).await
    }

    /// Same as [`Self::acquire_session`], evaluating expiry at `now`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if a new session is needed and creation fails.
    #[instrument(skip_all)]
    pub async fn acquire_session_at<A: LocalTmdbApi>(
        &self,
        api: &A,
        now: DateTime<Utc>,
    ) -> QueryResult<GuestSession> {
        let _guard = self.acquire_lock.lock().await;

        if let Some(session) = self.cached_at(now) {
            tracing::debug!("reusing cached guest session");
            return Ok(session);
        }

        let response = api.create_guest_session().await.map_err(|e| {
            let error = QueryError::from_api(&e);
            tracing::warn!(reason = %error, "failed to create guest session");
            error
        })?;
        let session = GuestSession::from_response(&response).map_err(|e| {
            tracing::warn!(error = %e, "invalid guest session response");
            QueryError::Request(format!("{e:#}"))
        })?;

        if let Err(e) = self.store.write(&session) {
            tracing::warn!(error = %e, "failed to cache guest session");
        }
        tracing::info!(expires_at = %session.expires_at, "created guest session");
        Ok(session)
    }

    /// Drops the cached session so the next acquisition creates a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn invalidate(&self) -> Result<()> {
        self.store.clear()
    }
}
