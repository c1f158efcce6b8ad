//! Locations of the config file and the session database.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory name under the XDG base directories.
const APP_DIR: &str = "moviesdb";
/// Config file name.
const CONFIG_FILE: &str = "config.toml";
/// Session database file name.
const DB_FILE: &str = "moviesdb.db";

/// Resolved file locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// TOML config file; may not exist.
    pub config_file: PathBuf,
    /// `SQLite` file holding the guest session.
    pub db_file: PathBuf,
}

impl AppPaths {
    /// Resolves both paths from `--dir` and the process environment.
    ///
    /// With `dir`, both files live directly in it. Otherwise the config goes
    /// under `$XDG_CONFIG_HOME` (default `~/.config`) and the database under
    /// `$XDG_DATA_HOME` (default `~/.local/share`), each in `moviesdb/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is needed but unset.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        Self::resolve_with(dir, |key| std::env::var_os(key))
    }

    fn resolve_with(dir: Option<&Path>, var: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        if let Some(d) = dir {
            return Ok(Self {
                config_file: d.join(CONFIG_FILE),
                db_file: d.join(DB_FILE),
            });
        }

        let config_home = base_dir(&var, "XDG_CONFIG_HOME", &[".config"])?;
        let data_home = base_dir(&var, "XDG_DATA_HOME", &[".local", "share"])?;
        Ok(Self {
            config_file: config_home.join(APP_DIR).join(CONFIG_FILE),
            db_file: data_home.join(APP_DIR).join(DB_FILE),
        })
    }
}

/// `$key` when it holds an absolute path, else `$HOME/{fallback}`.
///
/// Relative XDG values are ignored, as the base directory rules require.
fn base_dir(
    var: &impl Fn(&str) -> Option<OsString>,
    key: &str,
    fallback: &[&str],
) -> Result<PathBuf> {
    if let Some(value) = var(key).map(PathBuf::from).filter(|p| p.is_absolute()) {
        return Ok(value);
    }
    let Some(home) = var("HOME").filter(|h| !h.is_empty()) else {
        bail!("HOME environment variable is not set");
    };
    Ok(fallback
        .iter()
        .fold(PathBuf::from(home), |path, part| path.join(part)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<OsString> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| OsString::from(v))
        }
    }

    #[test]
    fn test_dir_holds_both_files() {
        // Arrange
        let dir = PathBuf::from("/tmp/myproject");

        // Act
        let paths = AppPaths::resolve_with(Some(dir.as_path()), env(&[])).unwrap();

        // Assert
        assert_eq!(paths.config_file, PathBuf::from("/tmp/myproject/config.toml"));
        assert_eq!(paths.db_file, PathBuf::from("/tmp/myproject/moviesdb.db"));
    }

    #[test]
    fn test_home_defaults() {
        // Arrange & Act
        let paths = AppPaths::resolve_with(None, env(&[("HOME", "/home/alice")])).unwrap();

        // Assert
        assert_eq!(
            paths.config_file,
            PathBuf::from("/home/alice/.config/moviesdb/config.toml")
        );
        assert_eq!(
            paths.db_file,
            PathBuf::from("/home/alice/.local/share/moviesdb/moviesdb.db")
        );
    }

    #[test]
    fn test_xdg_dirs_take_precedence() {
        // Arrange
        let vars = env(&[
            ("HOME", "/home/alice"),
            ("XDG_CONFIG_HOME", "/etc/xdg-alice"),
            ("XDG_DATA_HOME", "/srv/data"),
        ]);

        // Act
        let paths = AppPaths::resolve_with(None, vars).unwrap();

        // Assert
        assert_eq!(paths.config_file, PathBuf::from("/etc/xdg-alice/moviesdb/config.toml"));
        assert_eq!(paths.db_file, PathBuf::from("/srv/data/moviesdb/moviesdb.db"));
    }

    #[test]
    fn test_relative_xdg_value_is_ignored() {
        // Arrange
        let vars = env(&[("HOME", "/home/alice"), ("XDG_DATA_HOME", "data")]);

        // Act
        let paths = AppPaths::resolve_with(None, vars).unwrap();

        // Assert
        assert_eq!(
            paths.db_file,
            PathBuf::from("/home/alice/.local/share/moviesdb/moviesdb.db")
        );
    }

    #[test]
    fn test_missing_home_is_error() {
        // Arrange & Act
        let result = AppPaths::resolve_with(None, env(&[]));

        // Assert
        assert!(result.unwrap_err().to_string().contains("HOME"));
    }

    #[test]
    fn test_partial_xdg_without_home_is_error() {
        // Arrange & Act
        let result = AppPaths::resolve_with(None, env(&[("XDG_CONFIG_HOME", "/cfg")]));

        // Assert
        assert!(result.is_err());
    }
}
