//! Movie detail page.

use moviesdb_api::catalog::QueryResult;
use moviesdb_api::favorites::FavoriteSet;
use moviesdb_api::images::{ImageSize, image_url};
use moviesdb_api::session::SessionStore;
use moviesdb_api::tmdb::{LocalTmdbApi, MovieDetails, MovieSummary};
use tracing::instrument;

use super::{ListSection, PageContext, error_panel, favorite_ids, load_favorites};

/// Loaded movie detail page.
#[derive(Debug)]
pub struct MoviePage {
    /// Requested movie ID.
    pub movie_id: u64,
    /// Movie details, or why they are missing.
    pub details: QueryResult<MovieDetails>,
    /// Recommendations; `None` when the read failed or returned nothing.
    pub recommendations: Option<Vec<MovieSummary>>,
    /// Favorites of the current session, or why they could not be read.
    pub favorites: QueryResult<FavoriteSet>,
}

impl MoviePage {
    /// Acquires a session, then reads details, recommendations, and
    /// favorites concurrently.
    #[instrument(skip(ctx, limit))]
    pub async fn load<A: LocalTmdbApi, S: SessionStore>(
        ctx: &PageContext<'_, A, S>,
        movie_id: u64,
        limit: usize,
    ) -> Self {
        let session = ctx.session().await;
        let (details, recommendations, favorites) = futures::join!(
            ctx.catalog.get_details(movie_id),
            ctx.catalog.list_recommended(movie_id),
            load_favorites(ctx.catalog, session.as_ref()),
        );

        let recommendations = match recommendations {
            Ok(mut movies) if !movies.is_empty() => {
                movies.truncate(limit);
                Some(movies)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(movie_id, reason = %e, "recommendations omitted");
                None
            }
        };

        Self {
            movie_id,
            details,
            recommendations,
            favorites,
        }
    }

    /// Renders the page.
    pub async fn render(&self) -> Vec<String> {
        let details = match &self.details {
            Ok(details) => details,
            Err(e) => {
                let mut lines = vec![format!("== Movie {} ==", self.movie_id)];
                lines.extend(error_panel(&e.reason()));
                return lines;
            }
        };

        let mut lines = vec![format!("== {} ==", details.title)];
        let runtime = details
            .runtime
            .map_or_else(|| String::from("-"), |m| format!("{m} min"));
        lines.push(format!(
            "{}\t{runtime}\t{:.1}",
            details.release_year().unwrap_or("-"),
            details.vote_average
        ));
        if !details.genres.is_empty() {
            let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
            lines.push(format!("Genres: {}", genres.join(", ")));
        }
        if !details.overview.is_empty() {
            lines.push(details.overview.clone());
        }
        if let Some(url) = image_url(details.poster_path.as_deref(), ImageSize::W500) {
            lines.push(format!("Poster: {url}"));
        }
        if let Some(url) = image_url(details.backdrop_path.as_deref(), ImageSize::Original) {
            lines.push(format!("Backdrop: {url}"));
        }

        let marked = match favorite_ids(&self.favorites).await {
            Ok(ids) => {
                let favorite = ids.binary_search(&details.id).is_ok();
                lines.push(format!("Favorite: {}", if favorite { "yes" } else { "no" }));
                ids
            }
            Err(note) => {
                lines.push(note);
                Vec::new()
            }
        };

        if let Some(movies) = &self.recommendations {
            let section = ListSection::Loaded(movies.clone());
            lines.extend(section.render("Recommended", false, &marked));
        }
        lines
    }
}
