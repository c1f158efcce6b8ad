//! Page loaders and their terminal rendering.
//!
//! Each page issues its reads concurrently, waits for all of them, then
//! renders. A failed read becomes an error panel for that section only.
#![allow(clippy::future_not_send)]

mod favorites;
mod home;
mod movie;
mod top_rated;

use moviesdb_api::catalog::{Catalog, QueryError, QueryResult};
use moviesdb_api::favorites::{FavoriteSet, ToggleOutcome};
use moviesdb_api::session::{GuestSession, SessionProvider, SessionStore};
use moviesdb_api::tmdb::{LocalTmdbApi, MovieSummary};

pub use favorites::{FavoriteAction, FavoritesPage, apply_favorite_action};
pub use home::HomePage;
pub use movie::MoviePage;
pub use top_rated::TopRatedPage;

/// Hint printed under every error panel.
const RETRY_HINT: &str = "Run the command again to retry.";

/// Shared collaborators of every page.
#[derive(Debug)]
pub struct PageContext<'a, A, S> {
    /// Movie queries.
    pub catalog: &'a Catalog<A>,
    /// Guest session source.
    pub sessions: &'a SessionProvider<S>,
}

impl<'a, A: LocalTmdbApi, S: SessionStore> PageContext<'a, A, S> {
    /// Creates a context.
    pub const fn new(catalog: &'a Catalog<A>, sessions: &'a SessionProvider<S>) -> Self {
        Self { catalog, sessions }
    }

    /// Acquires a guest session, or `None` when none can be created.
    ///
    /// Favorite-dependent sections are skipped when this returns `None`.
    pub async fn session(&self) -> Option<GuestSession> {
        match self.sessions.acquire_session(self.catalog.api()).await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(reason = %e, "continuing without a guest session");
                None
            }
        }
    }
}

/// Rehydrates the favorite set from the remote list.
///
/// # Errors
///
/// Returns `QueryError::NoSession` without a session, or the read failure.
/// Callers must not treat either as an empty set.
pub async fn load_favorites<A: LocalTmdbApi>(
    catalog: &Catalog<A>,
    session: Option<&GuestSession>,
) -> QueryResult<FavoriteSet> {
    let session = session.ok_or(QueryError::NoSession)?;
    catalog
        .list_favorites(session)
        .await
        .map(|movies| FavoriteSet::from_movies(&movies))
        .inspect_err(|e| tracing::warn!(reason = %e, "favorites unavailable"))
}

/// Note shown in place of favorite markers when the set could not be read.
fn favorites_note(err: &QueryError) -> String {
    format!("Favorites unavailable: {err}.")
}

/// Sorted favorite IDs, or the note explaining why there are none.
async fn favorite_ids(favorites: &QueryResult<FavoriteSet>) -> Result<Vec<u64>, String> {
    match favorites {
        Ok(set) => Ok(set.ids().await),
        Err(e) => Err(favorites_note(e)),
    }
}

/// A rendered list and its state.
#[derive(Debug, Clone, PartialEq)]
pub enum ListSection {
    /// At least one movie.
    Loaded(Vec<MovieSummary>),
    /// The query succeeded with no movies.
    Empty,
    /// The query failed; carries the reason.
    Failed(String),
}

impl ListSection {
    /// Builds a section from a query result, keeping at most `limit` movies.
    #[must_use]
    pub fn from_result(result: QueryResult<Vec<MovieSummary>>, limit: usize) -> Self {
        match result {
            Ok(mut movies) => {
                movies.truncate(limit);
                if movies.is_empty() {
                    Self::Empty
                } else {
                    Self::Loaded(movies)
                }
            }
            Err(e) => Self::Failed(e.reason()),
        }
    }

    /// Movies in the section; empty unless loaded.
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            Self::Loaded(movies) => movies,
            Self::Empty | Self::Failed(_) => &[],
        }
    }

    /// Renders the section under `title`.
    ///
    /// `favorite_ids` must be sorted; entries found there are marked.
    #[must_use]
    pub fn render(&self, title: &str, ranked: bool, favorite_ids: &[u64]) -> Vec<String> {
        let mut lines = vec![format!("== {title} ==")];
        match self {
            Self::Loaded(movies) => {
                for (position, movie) in (1_usize..).zip(movies) {
                    let rank = ranked.then_some(position);
                    let favorite = favorite_ids.binary_search(&movie.id).is_ok();
                    lines.push(movie_line(rank, movie, favorite));
                }
            }
            Self::Empty => lines.push(String::from("Nothing here yet.")),
            Self::Failed(reason) => lines.extend(error_panel(reason)),
        }
        lines
    }
}

/// One list entry: rank, ID, rating, year, title, favorite marker.
fn movie_line(rank: Option<usize>, movie: &MovieSummary, favorite: bool) -> String {
    let rank = rank.map_or_else(String::new, |r| format!("#{r}\t"));
    let year = movie
        .release_date
        .as_deref()
        .and_then(|d| d.get(..4))
        .unwrap_or("-");
    let marker = if favorite { "\t[fav]" } else { "" };
    format!(
        "{rank}{}\t{:.1}\t{year}\t{}{marker}",
        movie.id, movie.vote_average, movie.title
    )
}

/// Error panel lines.
fn error_panel(reason: &str) -> Vec<String> {
    vec![format!("Error: {reason}"), String::from(RETRY_HINT)]
}

/// Describes a toggle outcome for the user.
#[must_use]
pub fn outcome_line(outcome: &ToggleOutcome) -> String {
    match outcome {
        ToggleOutcome::Confirmed {
            movie_id,
            favorite: true,
        } => format!("Added {movie_id} to favorites."),
        ToggleOutcome::Confirmed {
            movie_id,
            favorite: false,
        } => format!("Removed {movie_id} from favorites."),
        ToggleOutcome::Reconciled { reason } => {
            format!("Favorite update failed ({reason}); favorites reloaded.")
        }
        ToggleOutcome::Reverted { reason } => {
            format!("Favorite update failed ({reason}); change undone.")
        }
        ToggleOutcome::NoSession => {
            String::from("No guest session available; favorites unchanged.")
        }
    }
}

/// Writes rendered lines to the log output.
pub fn emit(lines: &[String]) {
    for line in lines {
        tracing::info!("{line}");
    }
}

#[cfg(test)]
pub mod test_support {
    //! wiremock-backed TMDB server shared by page tests.
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use moviesdb_api::catalog::Catalog;
    use moviesdb_api::session::{
        GuestSession, MemorySessionStore, SessionProvider, parse_expires_at,
    };
    use moviesdb_api::tmdb::TmdbClient;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// ID of the cached session handed out by [`sessions`].
    pub const SESSION_ID: &str = "guest-test";

    pub const TOP_RATED: &str = include_str!("../../../../fixtures/tmdb/top_rated.json");
    pub const TRENDING: &str = include_str!("../../../../fixtures/tmdb/trending_week.json");
    pub const UPCOMING: &str = include_str!("../../../../fixtures/tmdb/upcoming.json");
    pub const MOVIE_550: &str = include_str!("../../../../fixtures/tmdb/movie_550.json");
    pub const RECOMMENDATIONS_550: &str =
        include_str!("../../../../fixtures/tmdb/recommendations_550.json");
    pub const FAVORITES: &str = include_str!("../../../../fixtures/tmdb/favorite_movies.json");
    pub const FAVORITES_EMPTY: &str =
        include_str!("../../../../fixtures/tmdb/favorite_movies_empty.json");
    pub const FAVORITE_SUCCESS: &str =
        include_str!("../../../../fixtures/tmdb/favorite_success.json");

    pub const ERROR_BODY: &str = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

    /// Serves `body` for `GET {route}` (relative to `/3/`).
    pub async fn serve(server: &MockServer, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/3/{route}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Catalog pointed at `server`.
    pub fn catalog(server: &MockServer) -> Catalog<TmdbClient> {
        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        Catalog::new(client)
    }

    /// Provider holding a session that stays valid.
    pub fn sessions() -> SessionProvider<MemorySessionStore> {
        let expires_at = parse_expires_at("2099-01-01 00:00:00 UTC").unwrap();
        SessionProvider::new(MemorySessionStore::with_session(GuestSession::new(
            SESSION_ID, expires_at,
        )))
    }
}
