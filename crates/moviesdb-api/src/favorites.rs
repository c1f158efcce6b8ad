//! Local favorite set and the optimistic toggle.
//!
//! The local set is updated before the write is sent. When the write fails
//! the set is replaced with a fresh read of the remote favorites list.
#![allow(clippy::future_not_send)]

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::catalog::{Catalog, QueryError};
use crate::session::GuestSession;
use crate::tmdb::{LocalTmdbApi, MovieSummary};

/// In-memory set of favorite movie IDs.
///
/// Cloning yields another handle to the same set, so readers observe
/// optimistic changes while a write is in flight.
#[derive(Debug, Clone, Default)]
pub struct FavoriteSet {
    ids: Arc<RwLock<BTreeSet<u64>>>,
    /// Held for the whole toggle so only one writer runs at a time.
    writer: Arc<Mutex<()>>,
}

impl FavoriteSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from a remote favorites list.
    #[must_use]
    pub fn from_movies(movies: &[MovieSummary]) -> Self {
        let ids = movies.iter().map(|m| m.id).collect();
        Self {
            ids: Arc::new(RwLock::new(ids)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Whether `movie_id` is a favorite.
    pub async fn contains(&self, movie_id: u64) -> bool {
        self.ids.read().await.contains(&movie_id)
    }

    /// Favorite IDs in ascending order.
    pub async fn ids(&self) -> Vec<u64> {
        self.ids.read().await.iter().copied().collect()
    }

    /// Number of favorites.
    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }

    /// Whether the set is empty.
    pub async fn is_empty(&self) -> bool {
        self.ids.read().await.is_empty()
    }

    /// Replaces the whole set with the given movies.
    pub async fn replace_with(&self, movies: &[MovieSummary]) {
        let mut ids = self.ids.write().await;
        *ids = movies.iter().map(|m| m.id).collect();
    }

    /// Sets membership and returns the previous membership.
    async fn apply(&self, movie_id: u64, desired: bool) -> bool {
        let mut ids = self.ids.write().await;
        let was_member = ids.contains(&movie_id);
        if desired {
            ids.insert(movie_id);
        } else {
            ids.remove(&movie_id);
        }
        was_member
    }
}

/// Result of an optimistic toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The write succeeded; local state matches the request.
    Confirmed {
        /// Movie ID.
        movie_id: u64,
        /// Membership now held locally and remotely.
        favorite: bool,
    },
    /// The write failed; local state was replaced by a fresh remote read.
    Reconciled {
        /// Why the write failed.
        reason: String,
    },
    /// The write and the reconciling read both failed; the single local
    /// change was undone.
    Reverted {
        /// Why the write failed.
        reason: String,
    },
    /// No valid session; nothing was changed or sent.
    NoSession,
}

impl ToggleOutcome {
    /// Whether the remote write succeeded.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Applies favorite changes locally first, then writes them remotely.
#[derive(Debug)]
pub struct OptimisticToggle<'a, A> {
    catalog: &'a Catalog<A>,
    session: &'a GuestSession,
}

impl<'a, A: LocalTmdbApi> OptimisticToggle<'a, A> {
    /// Creates a toggle helper bound to a session.
    pub const fn new(catalog: &'a Catalog<A>, session: &'a GuestSession) -> Self {
        Self { catalog, session }
    }

    /// Flips membership of `movie_id`.
    #[instrument(skip(self, favorites))]
    pub async fn toggle(&self, favorites: &FavoriteSet, movie_id: u64) -> ToggleOutcome {
        self.run(favorites, movie_id, None).await
    }

    /// Sets membership of `movie_id` to `desired`.
    ///
    /// The local set reflects `desired` before the write is awaited.
    #[instrument(skip(self, favorites))]
    pub async fn set(&self, favorites: &FavoriteSet, movie_id: u64, desired: bool) -> ToggleOutcome {
        self.run(favorites, movie_id, Some(desired)).await
    }

    /// Applies the change locally, writes it, and reconciles on failure.
    ///
    /// `desired` of `None` flips the membership seen under the writer lock.
    async fn run(
        &self,
        favorites: &FavoriteSet,
        movie_id: u64,
        desired: Option<bool>,
    ) -> ToggleOutcome {
        if self.session.is_expired() {
            tracing::warn!(movie_id, "favorite toggle skipped without a valid session");
            return ToggleOutcome::NoSession;
        }

        let _writer = favorites.writer.lock().await;
        let desired = match desired {
            Some(desired) => desired,
            None => !favorites.contains(movie_id).await,
        };
        let was_member = favorites.apply(movie_id, desired).await;

        let error = match self
            .catalog
            .set_favorite(movie_id, desired, self.session)
            .await
        {
            Ok(()) => {
                return ToggleOutcome::Confirmed {
                    movie_id,
                    favorite: desired,
                };
            }
            Err(e) => e,
        };

        let reason = error.reason();
        match self.catalog.list_favorites(self.session).await {
            Ok(movies) => {
                favorites.replace_with(&movies).await;
                tracing::info!(
                    movie_id,
                    favorites = movies.len(),
                    "favorites reconciled after failed write"
                );
                ToggleOutcome::Reconciled { reason }
            }
            Err(fetch_error) => {
                favorites.apply(movie_id, was_member).await;
                log_revert(movie_id, &error, &fetch_error);
                ToggleOutcome::Reverted { reason }
            }
        }
    }
}

fn log_revert(movie_id: u64, write_error: &QueryError, fetch_error: &QueryError) {
    tracing::warn!(
        movie_id,
        write_error = %write_error,
        fetch_error = %fetch_error,
        "favorites reconcile failed, reverted local change"
    );
}
