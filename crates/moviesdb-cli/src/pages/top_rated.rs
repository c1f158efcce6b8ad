//! Top rated page with favorite markers.

use moviesdb_api::catalog::QueryResult;
use moviesdb_api::favorites::FavoriteSet;
use moviesdb_api::session::SessionStore;
use moviesdb_api::tmdb::LocalTmdbApi;
use tracing::instrument;

use super::{ListSection, PageContext, favorite_ids, load_favorites};

/// Loaded top rated page.
#[derive(Debug)]
pub struct TopRatedPage {
    /// Ranked movies.
    pub movies: ListSection,
    /// Favorites of the current session, or why they could not be read.
    pub favorites: QueryResult<FavoriteSet>,
}

impl TopRatedPage {
    /// Acquires a session, then reads the list and favorites concurrently.
    #[instrument(skip_all)]
    pub async fn load<A: LocalTmdbApi, S: SessionStore>(
        ctx: &PageContext<'_, A, S>,
        limit: usize,
    ) -> Self {
        let session = ctx.session().await;
        let (movies, favorites) = futures::join!(
            ctx.catalog.list_top_rated(),
            load_favorites(ctx.catalog, session.as_ref()),
        );

        Self {
            movies: ListSection::from_result(movies, limit),
            favorites,
        }
    }

    /// Renders the page.
    pub async fn render(&self) -> Vec<String> {
        let title = format!("Top Rated ({} movies)", self.movies.movies().len());
        match favorite_ids(&self.favorites).await {
            Ok(ids) => self.movies.render(&title, true, &ids),
            Err(note) => {
                let mut lines = self.movies.render(&title, true, &[]);
                lines.push(note);
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, clippy::unwrap_used)]

    use moviesdb_api::catalog::QueryError;
    use moviesdb_api::session::{MemorySessionStore, SessionProvider};

    use super::*;
    use crate::pages::test_support::{
        ERROR_BODY, FAVORITES, SESSION_ID, TOP_RATED, catalog, serve, sessions,
    };

    #[tokio::test]
    async fn test_top_rated_marks_favorites() {
        // Arrange
        let server = wiremock::MockServer::start().await;
        serve(&server, "movie/top_rated", 200, TOP_RATED).await;
        serve(&server, &format!("account/{SESSION_ID}/favorite/movies"), 200, FAVORITES).await;
        let catalog = catalog(&server);
        let sessions = sessions();

        // Act
        let page = TopRatedPage::load(&PageContext::new(&catalog, &sessions), 50).await;
        let lines = page.render().await;

        // Assert
        assert_eq!(page.movies.movies().len(), 3);
        assert_eq!(page.favorites.as_ref().unwrap().ids().await, vec![278, 550]);
        assert!(lines[1].starts_with("#1\t278\t"));
        assert!(lines[1].ends_with("[fav]"));
        assert!(!lines[2].ends_with("[fav]"));
    }

    #[tokio::test]
    async fn test_top_rated_without_session_still_lists() {
        // Arrange
        let server = wiremock::MockServer::start().await;
        serve(&server, "movie/top_rated", 200, TOP_RATED).await;
        serve(&server, "authentication/guest_session/new", 401, ERROR_BODY).await;
        let catalog = catalog(&server);
        let sessions = SessionProvider::new(MemorySessionStore::new());

        // Act
        let page = TopRatedPage::load(&PageContext::new(&catalog, &sessions), 50).await;

        // Assert
        assert_eq!(page.favorites.as_ref().err(), Some(&QueryError::NoSession));
        assert_eq!(
            page.render().await.last().map(String::as_str),
            Some("Favorites unavailable: no valid guest session.")
        );
        assert_eq!(page.movies.movies().len(), 3);
    }

    #[tokio::test]
    async fn test_top_rated_failed_favorites_read_is_reported() {
        // Arrange
        let server = wiremock::MockServer::start().await;
        serve(&server, "movie/top_rated", 200, TOP_RATED).await;
        serve(&server, &format!("account/{SESSION_ID}/favorite/movies"), 500, ERROR_BODY).await;
        let catalog = catalog(&server);
        let sessions = sessions();

        // Act
        let page = TopRatedPage::load(&PageContext::new(&catalog, &sessions), 50).await;
        let lines = page.render().await;

        // Assert
        assert!(page.favorites.is_err());
        assert!(lines.iter().all(|l| !l.ends_with("[fav]")));
        assert!(
            lines
                .last()
                .unwrap()
                .starts_with("Favorites unavailable: TMDB returned HTTP 500")
        );
    }

    #[tokio::test]
    async fn test_top_rated_failure_renders_error_panel() {
        // Arrange
        let server = wiremock::MockServer::start().await;
        serve(&server, "movie/top_rated", 503, "Service Unavailable").await;
        serve(&server, &format!("account/{SESSION_ID}/favorite/movies"), 200, FAVORITES).await;
        let catalog = catalog(&server);
        let sessions = sessions();

        // Act
        let page = TopRatedPage::load(&PageContext::new(&catalog, &sessions), 50).await;
        let lines = page.render().await;

        // Assert
        assert!(lines[1].starts_with("Error: TMDB returned HTTP 503"));
    }
}
