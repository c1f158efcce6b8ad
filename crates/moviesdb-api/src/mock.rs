//! In-memory `LocalTmdbApi` used by unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};

use crate::favorites::FavoriteSet;
use crate::session::GuestSession;
use crate::tmdb::{
    LocalTmdbApi, MovieDetails, MovieSummary, TmdbApiError, TmdbGuestSessionResponse,
    TmdbMoviePage, TmdbStatusResponse,
};

/// A session valid for the next hour.
pub fn valid_session() -> GuestSession {
    GuestSession::new("guest-valid", Utc::now() + Duration::hours(1))
}

/// A session that expired an hour ago.
pub fn expired_session() -> GuestSession {
    GuestSession::new("guest-stale", Utc::now() - Duration::hours(1))
}

fn upstream(status: u16, message: &str) -> anyhow::Error {
    TmdbApiError {
        status,
        message: String::from(message),
    }
    .into()
}

fn summary(id: u64) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {id}"),
        poster_path: Some(format!("/poster-{id}.jpg")),
        vote_average: 7.5,
        release_date: Some(String::from("2000-01-01")),
    }
}

fn page(results: Vec<MovieSummary>) -> TmdbMoviePage {
    TmdbMoviePage {
        page: 1,
        results,
        total_pages: 1,
        total_results: 0,
    }
}

/// Scriptable fake of the TMDB API with a server-side favorites list.
#[derive(Debug, Default)]
pub struct MockTmdbApi {
    calls: AtomicUsize,
    session_calls: AtomicUsize,
    remote_favorites: Mutex<BTreeSet<u64>>,
    details_id: Mutex<Option<u64>>,
    fail_lists: Mutex<bool>,
    fail_transport: Mutex<bool>,
    fail_sessions: Mutex<bool>,
    fail_writes: Mutex<bool>,
    reject_writes: Mutex<bool>,
    fail_favorite_reads: Mutex<bool>,
    observed_set: Mutex<Option<FavoriteSet>>,
    observed_membership: Mutex<Vec<bool>>,
}

impl MockTmdbApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn seed_favorites(&self, ids: &[u64]) {
        self.remote_favorites
            .lock()
            .unwrap()
            .extend(ids.iter().copied());
    }

    pub fn remote_favorites(&self) -> Vec<u64> {
        self.remote_favorites
            .lock()
            .unwrap()
            .iter()
            .copied()
            .collect()
    }

    pub fn answer_details_with(&self, id: u64) {
        *self.details_id.lock().unwrap() = Some(id);
    }

    pub fn fail_lists(&self) {
        *self.fail_lists.lock().unwrap() = true;
    }

    pub fn fail_transport(&self) {
        *self.fail_transport.lock().unwrap() = true;
    }

    pub fn fail_sessions(&self) {
        *self.fail_sessions.lock().unwrap() = true;
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn reject_writes(&self) {
        *self.reject_writes.lock().unwrap() = true;
    }

    pub fn fail_favorite_reads(&self) {
        *self.fail_favorite_reads.lock().unwrap() = true;
    }

    /// Records membership of the written movie in `set` while each write is
    /// in flight.
    pub fn observe(&self, set: FavoriteSet) {
        *self.observed_set.lock().unwrap() = Some(set);
    }

    pub fn observed_membership(&self) -> Vec<bool> {
        self.observed_membership.lock().unwrap().clone()
    }

    fn check(&self, flag: &Mutex<bool>) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_transport.lock().unwrap() {
            return Err(anyhow!("connection refused"));
        }
        if *flag.lock().unwrap() {
            return Err(upstream(503, "Service unavailable"));
        }
        Ok(())
    }
}

impl LocalTmdbApi for MockTmdbApi {
    async fn create_guest_session(&self) -> Result<TmdbGuestSessionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_sessions.lock().unwrap() {
            return Err(upstream(401, "Invalid API key"));
        }
        let n = self.session_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let expires_at = Utc::now() + Duration::hours(1);
        Ok(TmdbGuestSessionResponse {
            success: true,
            guest_session_id: format!("guest-{n}"),
            expires_at: expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
    }

    async fn top_rated(&self) -> Result<TmdbMoviePage> {
        self.check(&self.fail_lists)?;
        let json = include_str!("../../../fixtures/tmdb/top_rated.json");
        Ok(serde_json::from_str(json)?)
    }

    async fn trending_week(&self) -> Result<TmdbMoviePage> {
        self.check(&self.fail_lists)?;
        let json = include_str!("../../../fixtures/tmdb/trending_week.json");
        Ok(serde_json::from_str(json)?)
    }

    async fn upcoming(&self) -> Result<TmdbMoviePage> {
        self.check(&self.fail_lists)?;
        let json = include_str!("../../../fixtures/tmdb/upcoming.json");
        Ok(serde_json::from_str(json)?)
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        self.check(&self.fail_lists)?;
        let json = include_str!("../../../fixtures/tmdb/movie_550.json");
        let mut details: MovieDetails = serde_json::from_str(json)?;
        details.id = self.details_id.lock().unwrap().unwrap_or(movie_id);
        Ok(details)
    }

    async fn recommendations(&self, _movie_id: u64) -> Result<TmdbMoviePage> {
        self.check(&self.fail_lists)?;
        let json = include_str!("../../../fixtures/tmdb/recommendations_550.json");
        Ok(serde_json::from_str(json)?)
    }

    async fn favorite_movies(&self, _guest_session_id: &str) -> Result<TmdbMoviePage> {
        self.check(&self.fail_favorite_reads)?;
        let results = self.remote_favorites().into_iter().map(summary).collect();
        Ok(page(results))
    }

    async fn mark_favorite(
        &self,
        _guest_session_id: &str,
        movie_id: u64,
        favorite: bool,
    ) -> Result<TmdbStatusResponse> {
        let observed = self.observed_set.lock().unwrap().clone();
        if let Some(set) = observed {
            let member = set.contains(movie_id).await;
            self.observed_membership.lock().unwrap().push(member);
        }
        self.check(&self.fail_writes)?;
        if *self.reject_writes.lock().unwrap() {
            return Ok(TmdbStatusResponse {
                success: false,
                status_code: 34,
                status_message: String::from("The resource you requested could not be found."),
            });
        }
        let mut remote = self.remote_favorites.lock().unwrap();
        if favorite {
            remote.insert(movie_id);
        } else {
            remote.remove(&movie_id);
        }
        Ok(TmdbStatusResponse {
            success: true,
            status_code: 1,
            status_message: String::from("Success."),
        })
    }
}
