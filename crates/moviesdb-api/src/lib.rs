//! API library for moviesdb.
//!
//! Provides the TMDB client, guest sessions, movie queries, and the
//! optimistic favorite toggle.

/// Movie queries and the favorite write.
pub mod catalog;

/// Local favorite set and optimistic toggle.
pub mod favorites;

/// Image host URLs.
pub mod images;

/// Guest session provider and storage capability.
pub mod session;

/// TMDB API client.
pub mod tmdb;

#[cfg(test)]
mod mock;
