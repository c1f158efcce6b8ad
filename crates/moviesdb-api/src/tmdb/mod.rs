//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints used by the catalog:
//! movie lists, movie details, guest sessions, and guest favorites.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_LANGUAGE, TmdbApiError, TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    FavoriteRequest, Genre, MovieDetails, MovieSummary, TmdbErrorResponse,
    TmdbGuestSessionResponse, TmdbMoviePage, TmdbStatusResponse,
};
