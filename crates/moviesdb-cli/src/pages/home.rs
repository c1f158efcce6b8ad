//! Home page: top rated, trending, and upcoming lists.

use moviesdb_api::catalog::Catalog;
use moviesdb_api::tmdb::LocalTmdbApi;
use tracing::instrument;

use super::ListSection;

/// Loaded home page.
#[derive(Debug)]
pub struct HomePage {
    /// Top rated movies.
    pub top_rated: ListSection,
    /// Trending this week.
    pub trending: ListSection,
    /// Upcoming releases.
    pub upcoming: ListSection,
}

impl HomePage {
    /// Fetches the three lists concurrently, each capped at `limit`.
    #[instrument(skip_all)]
    pub async fn load<A: LocalTmdbApi>(catalog: &Catalog<A>, limit: usize) -> Self {
        let (top_rated, trending, upcoming) = futures::join!(
            catalog.list_top_rated(),
            catalog.list_trending(),
            catalog.list_upcoming(),
        );

        Self {
            top_rated: ListSection::from_result(top_rated, limit),
            trending: ListSection::from_result(trending, limit),
            upcoming: ListSection::from_result(upcoming, limit),
        }
    }

    /// Renders the page.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = self.top_rated.render("Top Rated", false, &[]);
        lines.extend(self.trending.render("Trending This Week", false, &[]));
        lines.extend(self.upcoming.render("Upcoming", false, &[]));
        lines
    }
}
