//! Application configuration module.
//!
//! Manages the TOML config file holding API and page settings.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
