//! TMDB API response and request types.

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes `null`, missing, and `""` all as `None`.
///
/// TMDB sends an empty `release_date` for unreleased titles.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// --- Movie lists ---

/// Paged response shared by list endpoints (`movie/top_rated`,
/// `trending/movie/week`, `movie/upcoming`, recommendations, favorites).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMoviePage {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// Read-only projection of a movie used in list views.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average (0.0 - 10.0).
    #[serde(default)]
    pub vote_average: f64,
    /// Release date (YYYY-MM-DD).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
}

// --- Movie details ---

/// A genre attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    /// TMDB genre ID.
    pub id: u32,
    /// Localized genre name.
    pub name: String,
}

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Plot overview.
    #[serde(default)]
    pub overview: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl MovieDetails {
    /// Release year taken from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

// --- Authentication ---

/// Response from `authentication/guest_session/new`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGuestSessionResponse {
    /// Whether the session was created.
    #[serde(default)]
    pub success: bool,
    /// Guest session ID.
    pub guest_session_id: String,
    /// Expiry, formatted as `YYYY-MM-DD HH:MM:SS UTC`.
    pub expires_at: String,
}

// --- Favorites ---

/// Request body for the favorite write endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteRequest {
    /// Always `"movie"`.
    pub media_type: &'static str,
    /// TMDB movie ID.
    pub media_id: u64,
    /// Desired membership.
    pub favorite: bool,
}

impl FavoriteRequest {
    /// Creates a request for a movie.
    #[must_use]
    pub const fn movie(media_id: u64, favorite: bool) -> Self {
        Self {
            media_type: "movie",
            media_id,
            favorite,
        }
    }
}

/// Generic status body returned by write endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbStatusResponse {
    /// Success flag.
    #[serde(default)]
    pub success: bool,
    /// TMDB status code.
    #[serde(default)]
    pub status_code: u32,
    /// Status message.
    #[serde(default)]
    pub status_message: String,
}

// --- Errors ---

/// Error body returned by TMDB on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
