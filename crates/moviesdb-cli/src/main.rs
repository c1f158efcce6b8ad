//! moviesdb - terminal movie catalog backed by TMDB.

/// Application configuration (TOML).
mod config;
/// Page loaders and rendering.
mod pages;
/// Config and database file locations.
mod paths;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::AppConfig;
use crate::pages::{
    FavoriteAction, FavoritesPage, HomePage, MoviePage, PageContext, TopRatedPage,
    apply_favorite_action, emit, outcome_line,
};
use crate::paths::AppPaths;
use moviesdb_api::catalog::Catalog;
use moviesdb_api::session::{SessionProvider, SessionStore};
use moviesdb_api::tmdb::TmdbClient;
use moviesdb_db::SqliteSessionStore;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show top rated, trending, and upcoming movies.
    Home,
    /// Show the top rated movies with favorite markers.
    TopRated,
    /// List or change favorites of the guest session.
    Favorites(FavoritesCommand),
    /// Show details and recommendations for a movie.
    Movie(MovieArgs),
    /// Inspect or reset the cached guest session.
    Session(SessionCommand),
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List favorite movies.
    List,
    /// Mark a movie as favorite.
    Add(MovieIdArgs),
    /// Unmark a favorite movie.
    Remove(MovieIdArgs),
    /// Flip the favorite state of a movie.
    Toggle(MovieIdArgs),
}

/// A single movie ID.
#[derive(clap::Args)]
struct MovieIdArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `session` subcommand.
#[derive(clap::Args)]
struct SessionCommand {
    /// Session subcommand to run.
    #[command(subcommand)]
    command: SessionSubcommands,
}

/// Available session subcommands.
#[derive(Subcommand)]
enum SessionSubcommands {
    /// Show the cached guest session.
    Show,
    /// Replace the cached guest session with a new one.
    New,
    /// Remove the cached guest session.
    Clear,
}

/// Builds a `TmdbClient` from the config and the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;
    let base_url = Url::parse(&config.api.base_url)
        .with_context(|| format!("invalid api.base_url: {}", config.api.base_url))?;

    TmdbClient::builder()
        .base_url(base_url)
        .api_token(api_token)
        .language(config.api.language.as_str())
        .timeout(config.api.timeout())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Collaborators shared by the network-backed commands.
struct App {
    config: AppConfig,
    catalog: Catalog<TmdbClient>,
    sessions: SessionProvider<SqliteSessionStore>,
}

impl App {
    /// Loads config, builds the client, and opens the session store.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three fails.
    fn open(paths: &AppPaths) -> Result<Self> {
        let config = AppConfig::load(&paths.config_file)?;
        let client = build_tmdb_client(&config)?;
        let store = SqliteSessionStore::open(&paths.db_file)
            .context("failed to open session database")?;
        Ok(Self {
            config,
            catalog: Catalog::new(client),
            sessions: SessionProvider::new(store),
        })
    }

    const fn context(&self) -> PageContext<'_, TmdbClient, SqliteSessionStore> {
        PageContext::new(&self.catalog, &self.sessions)
    }
}

/// Runs the `home` subcommand.
///
/// # Errors
///
/// Returns an error if startup fails. Failed lists render as error panels.
#[instrument(skip_all)]
async fn run_home(paths: &AppPaths) -> Result<()> {
    let app = App::open(paths)?;
    let page = HomePage::load(&app.catalog, app.config.pages.home_limit).await;
    emit(&page.render());
    Ok(())
}

/// Runs the `top-rated` subcommand.
///
/// # Errors
///
/// Returns an error if startup fails.
#[instrument(skip_all)]
async fn run_top_rated(paths: &AppPaths) -> Result<()> {
    let app = App::open(paths)?;
    let page = TopRatedPage::load(&app.context(), app.config.pages.top_rated_limit).await;
    emit(&page.render().await);
    Ok(())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if startup fails.
#[instrument(skip_all)]
async fn run_favorites_list(paths: &AppPaths) -> Result<()> {
    let app = App::open(paths)?;
    let page = FavoritesPage::load(&app.context()).await;
    emit(&page.render());
    Ok(())
}

/// Runs the `favorites add|remove|toggle` subcommands.
///
/// # Errors
///
/// Returns an error if startup fails. A failed write is reported, not returned.
#[instrument(skip_all)]
async fn run_favorites_change(
    paths: &AppPaths,
    movie_id: u64,
    action: FavoriteAction,
) -> Result<()> {
    let app = App::open(paths)?;
    match apply_favorite_action(&app.context(), movie_id, action).await {
        Ok((outcome, favorites)) => {
            tracing::info!("{}", outcome_line(&outcome));
            tracing::info!("Favorites: {} movies", favorites.len().await);
        }
        Err(e) => tracing::info!("Favorites unavailable ({e}); nothing was sent."),
    }
    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if startup fails.
#[instrument(skip_all)]
async fn run_movie(args: &MovieArgs, paths: &AppPaths) -> Result<()> {
    let app = App::open(paths)?;
    let page = MoviePage::load(
        &app.context(),
        args.id,
        app.config.pages.recommendations_limit,
    )
    .await;
    emit(&page.render().await);
    Ok(())
}

/// Runs the `session show` subcommand. Needs no API token.
///
/// # Errors
///
/// Returns an error if the session database cannot be read.
#[instrument(skip_all)]
fn run_session_show(paths: &AppPaths) -> Result<()> {
    let store = SqliteSessionStore::open(&paths.db_file)
        .context("failed to open session database")?;
    match store.read().context("failed to read guest session")? {
        Some(session) => {
            let state = if session.is_expired() {
                "expired"
            } else {
                "valid"
            };
            tracing::info!("Session: {}", session.session_id);
            tracing::info!("Expires: {} ({state})", session.expires_at.to_rfc3339());
        }
        None => tracing::info!("No guest session cached."),
    }
    Ok(())
}

/// Runs the `session new` subcommand.
///
/// # Errors
///
/// Returns an error if startup fails or TMDB refuses to create a session.
#[instrument(skip_all)]
async fn run_session_new(paths: &AppPaths) -> Result<()> {
    let app = App::open(paths)?;
    app.sessions
        .invalidate()
        .context("failed to clear guest session")?;
    let session = app
        .sessions
        .acquire_session(app.catalog.api())
        .await
        .context("failed to create guest session")?;
    tracing::info!("Session: {}", session.session_id);
    tracing::info!("Expires: {}", session.expires_at.to_rfc3339());
    Ok(())
}

/// Runs the `session clear` subcommand. Needs no API token.
///
/// # Errors
///
/// Returns an error if the session database cannot be written.
#[instrument(skip_all)]
fn run_session_clear(paths: &AppPaths) -> Result<()> {
    let store = SqliteSessionStore::open(&paths.db_file)
        .context("failed to open session database")?;
    SessionProvider::new(store)
        .invalidate()
        .context("failed to clear guest session")?;
    tracing::info!("Guest session cleared.");
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let paths = AppPaths::resolve(cli.dir.as_deref())?;
    match cli.command {
        Commands::Home => run_home(&paths).await,
        Commands::TopRated => run_top_rated(&paths).await,
        Commands::Favorites(cmd) => match cmd.command {
            FavoritesSubcommands::List => run_favorites_list(&paths).await,
            FavoritesSubcommands::Add(args) => {
                run_favorites_change(&paths, args.id, FavoriteAction::Add).await
            }
            FavoritesSubcommands::Remove(args) => {
                run_favorites_change(&paths, args.id, FavoriteAction::Remove).await
            }
            FavoritesSubcommands::Toggle(args) => {
                run_favorites_change(&paths, args.id, FavoriteAction::Toggle).await
            }
        },
        Commands::Movie(args) => run_movie(&args, &paths).await,
        Commands::Session(cmd) => match cmd.command {
            SessionSubcommands::Show => run_session_show(&paths),
            SessionSubcommands::New => run_session_new(&paths).await,
            SessionSubcommands::Clear => run_session_clear(&paths),
        },
    }
}
