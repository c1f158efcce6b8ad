//! Favorites page and favorite changes.

use moviesdb_api::catalog::{QueryError, QueryResult};
use moviesdb_api::favorites::{FavoriteSet, OptimisticToggle, ToggleOutcome};
use moviesdb_api::session::SessionStore;
use moviesdb_api::tmdb::LocalTmdbApi;
use tracing::instrument;

use super::{ListSection, PageContext, load_favorites};

/// Requested favorite change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    /// Mark as favorite.
    Add,
    /// Unmark.
    Remove,
    /// Flip the current membership.
    Toggle,
}

/// Loaded favorites page.
#[derive(Debug)]
pub struct FavoritesPage {
    /// Favorite movies.
    pub movies: ListSection,
}

impl FavoritesPage {
    /// Acquires a session and reads its favorites.
    #[instrument(skip_all)]
    pub async fn load<A: LocalTmdbApi, S: SessionStore>(ctx: &PageContext<'_, A, S>) -> Self {
        let movies = match ctx.session().await {
            Some(session) => {
                ListSection::from_result(ctx.catalog.list_favorites(&session).await, usize::MAX)
            }
            None => ListSection::Failed(QueryError::NoSession.reason()),
        };
        Self { movies }
    }

    /// Renders the page.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let count = self.movies.movies().len();
        let noun = if count == 1 { "movie" } else { "movies" };
        self.movies
            .render(&format!("My Favorites ({count} {noun} saved)"), false, &[])
    }
}

/// Applies `action` to `movie_id` through the optimistic toggle.
///
/// Returns the outcome and the favorite set as it stands afterwards.
///
/// # Errors
///
/// Returns the read failure when the current favorites cannot be loaded.
/// Nothing is sent in that case.
#[instrument(skip(ctx))]
pub async fn apply_favorite_action<A: LocalTmdbApi, S: SessionStore>(
    ctx: &PageContext<'_, A, S>,
    movie_id: u64,
    action: FavoriteAction,
) -> QueryResult<(ToggleOutcome, FavoriteSet)> {
    let Some(session) = ctx.session().await else {
        return Ok((ToggleOutcome::NoSession, FavoriteSet::new()));
    };
    let favorites = load_favorites(ctx.catalog, Some(&session)).await?;
    let toggle = OptimisticToggle::new(ctx.catalog, &session);

    let outcome = match action {
        FavoriteAction::Add => toggle.set(&favorites, movie_id, true).await,
        FavoriteAction::Remove => toggle.set(&favorites, movie_id, false).await,
        FavoriteAction::Toggle => toggle.toggle(&favorites, movie_id).await,
    };
    Ok((outcome, favorites))
}
