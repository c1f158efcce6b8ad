//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{MovieDetails, TmdbGuestSessionResponse, TmdbMoviePage, TmdbStatusResponse};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Creates a new guest session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn create_guest_session(&self) -> Result<TmdbGuestSessionResponse>;

    /// Fetches the top rated movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn top_rated(&self) -> Result<TmdbMoviePage>;

    /// Fetches the movies trending this week.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending_week(&self) -> Result<TmdbMoviePage>;

    /// Fetches upcoming releases.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn upcoming(&self) -> Result<TmdbMoviePage>;

    /// Fetches details of a single movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails>;

    /// Fetches recommendations for a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn recommendations(&self, movie_id: u64) -> Result<TmdbMoviePage>;

    /// Fetches the favorite movies of a guest session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn favorite_movies(&self, guest_session_id: &str) -> Result<TmdbMoviePage>;

    /// Marks or unmarks a movie as favorite for a guest session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn mark_favorite(
        &self,
        guest_session_id: &str,
        movie_id: u64,
        favorite: bool,
    ) -> Result<TmdbStatusResponse>;
}
