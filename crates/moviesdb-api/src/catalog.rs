//! Movie query functions and the favorite write.
//!
//! Every function issues exactly one request and returns a [`QueryResult`].
//! Failures never escape as panics or raw error bodies.
#![allow(clippy::future_not_send)]

use std::fmt;

use tracing::instrument;

use crate::session::GuestSession;
use crate::tmdb::{LocalTmdbApi, MovieDetails, MovieSummary, TmdbApiError};

/// Result of a catalog query.
pub type QueryResult<T> = Result<T, QueryError>;

/// Why a catalog query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Transport failure, timeout, or undecodable body.
    Request(String),
    /// Non-2xx response from TMDB.
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Upstream status message.
        message: String,
    },
    /// No valid guest session for a session-bound call.
    NoSession,
    /// TMDB answered with details for a different movie.
    IdMismatch {
        /// Requested movie ID.
        requested: u64,
        /// Movie ID in the payload.
        received: u64,
    },
    /// A write returned 2xx but reported `success: false`.
    Rejected(String),
}

impl QueryError {
    /// Classifies an error returned by a [`LocalTmdbApi`] implementation.
    #[must_use]
    pub fn from_api(err: &anyhow::Error) -> Self {
        err.downcast_ref::<TmdbApiError>().map_or_else(
            || Self::Request(format!("{err:#}")),
            |api| Self::Upstream {
                status: api.status,
                message: api.message.clone(),
            },
        )
    }

    /// Human-readable reason, suitable for an error panel.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(message) => write!(f, "request failed: {message}"),
            Self::Upstream { status, message } => {
                write!(f, "TMDB returned HTTP {status}: {message}")
            }
            Self::NoSession => write!(f, "no valid guest session"),
            Self::IdMismatch {
                requested,
                received,
            } => write!(
                f,
                "details for movie {received} returned when {requested} was requested"
            ),
            Self::Rejected(message) => write!(f, "request rejected: {message}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Typed access to the movie endpoints.
#[derive(Debug)]
pub struct Catalog<A> {
    api: A,
}

impl<A: LocalTmdbApi> Catalog<A> {
    /// Wraps an API implementation.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Underlying API, used to acquire guest sessions.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Lists top rated movies.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the request fails.
    #[instrument(skip_all)]
    pub async fn list_top_rated(&self) -> QueryResult<Vec<MovieSummary>> {
        let page = self.api.top_rated().await.map_err(|e| failed("top rated", &e))?;
        Ok(page.results)
    }

    /// Lists movies trending this week.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the request fails.
    #[instrument(skip_all)]
    pub async fn list_trending(&self) -> QueryResult<Vec<MovieSummary>> {
        let page = self
            .api
            .trending_week()
            .await
            .map_err(|e| failed("trending", &e))?;
        Ok(page.results)
    }

    /// Lists upcoming releases.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the request fails.
    #[instrument(skip_all)]
    pub async fn list_upcoming(&self) -> QueryResult<Vec<MovieSummary>> {
        let page = self.api.upcoming().await.map_err(|e| failed("upcoming", &e))?;
        Ok(page.results)
    }

    /// Fetches details for `movie_id`.
    ///
    /// The returned value always carries the requested ID.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the request fails or the payload is for
    /// another movie.
    #[instrument(skip(self))]
    pub async fn get_details(&self, movie_id: u64) -> QueryResult<MovieDetails> {
        let details = self
            .api
            .movie_details(movie_id)
            .await
            .map_err(|e| failed("movie details", &e))?;
        if details.id != movie_id {
            tracing::warn!(
                requested = movie_id,
                received = details.id,
                "movie details ID mismatch"
            );
            return Err(QueryError::IdMismatch {
                requested: movie_id,
                received: details.id,
            });
        }
        Ok(details)
    }

    /// Lists recommendations for `movie_id`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_recommended(&self, movie_id: u64) -> QueryResult<Vec<MovieSummary>> {
        let page = self
            .api
            .recommendations(movie_id)
            .await
            .map_err(|e| failed("recommendations", &e))?;
        Ok(page.results)
    }

    /// Lists the favorites of a guest session.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::NoSession` without a request if the session has
    /// expired, otherwise `QueryError` if the request fails.
    #[instrument(skip_all)]
    pub async fn list_favorites(&self, session: &GuestSession) -> QueryResult<Vec<MovieSummary>> {
        if session.is_expired() {
            return Err(QueryError::NoSession);
        }
        let page = self
            .api
            .favorite_movies(&session.session_id)
            .await
            .map_err(|e| failed("favorites", &e))?;
        Ok(page.results)
    }

    /// Sets favorite membership of `movie_id` to `desired`.
    ///
    /// Does not touch any local favorite state.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::NoSession` without a request if the session has
    /// expired, `QueryError::Rejected` if TMDB reports `success: false`,
    /// otherwise `QueryError` if the request fails.
    #[instrument(skip(self, session))]
    pub async fn set_favorite(
        &self,
        movie_id: u64,
        desired: bool,
        session: &GuestSession,
    ) -> QueryResult<()> {
        if session.is_expired() {
            return Err(QueryError::NoSession);
        }
        let status = self
            .api
            .mark_favorite(&session.session_id, movie_id, desired)
            .await
            .map_err(|e| failed("favorite write", &e))?;
        if !status.success {
            tracing::warn!(
                movie_id,
                status_code = status.status_code,
                "favorite write rejected"
            );
            return Err(QueryError::Rejected(status.status_message));
        }
        tracing::info!(movie_id, favorite = desired, "favorite updated");
        Ok(())
    }
}

/// Logs and classifies a failed query.
fn failed(what: &str, err: &anyhow::Error) -> QueryError {
    let error = QueryError::from_api(err);
    tracing::warn!(query = what, reason = %error, "query failed");
    error
}
