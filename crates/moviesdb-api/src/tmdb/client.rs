//! `TmdbClient` - TMDB API client implementation.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, Method, Request, RequestBuilder, StatusCode};
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::types::{
    FavoriteRequest, MovieDetails, TmdbErrorResponse, TmdbGuestSessionResponse, TmdbMoviePage,
    TmdbStatusResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Upper bound for a single request, after which it is abandoned.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(50);

/// Error for a non-2xx TMDB response.
///
/// Carried inside `anyhow::Error`; callers recover it with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbApiError {
    /// HTTP status code.
    pub status: u16,
    /// `status_message` from the error body, or the raw body.
    pub message: String,
}

impl fmt::Display for TmdbApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TMDB API error (HTTP {}): {}", self.status, self.message)
    }
}

impl std::error::Error for TmdbApiError {}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// `language` query parameter sent on reads.
    language: String,
    /// Per-request timeout.
    timeout: Duration,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `en-US`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the per-request timeout (default: 50s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        if api_token.trim().is_empty() {
            bail!("api_token must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            timeout,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Language sent with every read.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Joins `path` onto the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))
    }

    /// Sends a GET request carrying the `language` query parameter.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let request = self
            .http_client
            .get(url)
            .query(&[("language", self.language.as_str())]);
        self.send_json(request, path).await
    }

    /// Attaches auth and accept headers, sends, and decodes the JSON body.
    ///
    /// Non-2xx responses become a `TmdbApiError`. No retries.
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T> {
        let request = request
            .bearer_auth(&self.api_token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        let method = request.method().clone();
        log_request(&request);

        let started = Instant::now();
        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                tracing::warn!(%method, path, "TMDB API request timed out");
                bail!(
                    "request timed out after {}s: {path}",
                    self.timeout.as_secs()
                );
            }
            Err(err) => {
                tracing::warn!(%method, path, error = %err, "TMDB API request failed");
                return Err(anyhow::Error::new(err).context(format!("request failed: {path}")));
            }
        };

        let status = response.status();
        log_response(&method, path, status, started.elapsed());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body)
                .map_or(body, |error_response| error_response.status_message);
            return Err(TmdbApiError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

/// Logs an outgoing request. The `Authorization` header is never logged.
fn log_request(request: &Request) {
    tracing::debug!(method = %request.method(), url = %request.url(), "TMDB API request");
}

/// Logs a received response.
fn log_response(method: &Method, path: &str, status: StatusCode, elapsed: Duration) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    if status.is_success() {
        tracing::debug!(%method, path, status = status.as_u16(), elapsed_ms, "TMDB API response");
    } else {
        tracing::warn!(%method, path, status = status.as_u16(), elapsed_ms, "TMDB API response");
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn create_guest_session(&self) -> Result<TmdbGuestSessionResponse> {
        let path = "authentication/guest_session/new";
        let request = self.http_client.get(self.endpoint(path)?);
        self.send_json(request, path).await
    }

    #[instrument(skip_all)]
    async fn top_rated(&self) -> Result<TmdbMoviePage> {
        self.get_json("movie/top_rated").await
    }

    #[instrument(skip_all)]
    async fn trending_week(&self) -> Result<TmdbMoviePage> {
        self.get_json("trending/movie/week").await
    }

    #[instrument(skip_all)]
    async fn upcoming(&self) -> Result<TmdbMoviePage> {
        self.get_json("movie/upcoming").await
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path).await
    }

    #[instrument(skip(self))]
    async fn recommendations(&self, movie_id: u64) -> Result<TmdbMoviePage> {
        let path = format!("movie/{movie_id}/recommendations");
        self.get_json(&path).await
    }

    #[instrument(skip_all)]
    async fn favorite_movies(&self, guest_session_id: &str) -> Result<TmdbMoviePage> {
        let path = format!("account/{guest_session_id}/favorite/movies");
        self.get_json(&path).await
    }

    #[instrument(skip(self, guest_session_id))]
    async fn mark_favorite(
        &self,
        guest_session_id: &str,
        movie_id: u64,
        favorite: bool,
    ) -> Result<TmdbStatusResponse> {
        let path = format!("account/{guest_session_id}/favorite");
        let request = self
            .http_client
            .post(self.endpoint(&path)?)
            .query(&[("guest_session_id", guest_session_id)])
            .json(&FavoriteRequest::movie(movie_id, favorite));
        self.send_json(request, &path).await
    }
}
