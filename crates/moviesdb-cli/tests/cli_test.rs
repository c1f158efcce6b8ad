#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("top-rated"))
        .stdout(predicate::str::contains("favorites"))
        .stdout(predicate::str::contains("session"));
}

#[test]
fn test_home_requires_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["home", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "TMDB_API_TOKEN environment variable is required",
        ));
}

#[test]
fn test_movie_requires_numeric_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.args(["movie", "--id", "fight-club"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_favorites_add_requires_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.args(["favorites", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_session_show_without_cached_session() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.env_remove("TMDB_API_TOKEN")
        .env("RUST_LOG", "info")
        .args(["session", "show", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No guest session cached."));
}

#[test]
fn test_session_clear_is_idempotent() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    for _ in 0..2 {
        let mut cmd = cargo_bin_cmd!("moviesdb");
        cmd.env("RUST_LOG", "info")
            .args(["session", "clear", "--dir"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Guest session cleared."));
    }
}

#[test]
fn test_invalid_config_is_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[api\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .args(["top-rated", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_session_database_follows_xdg_data_home() {
    // Arrange
    let data = tempfile::tempdir().unwrap();
    let config = tempfile::tempdir().unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("moviesdb");
    cmd.env("XDG_DATA_HOME", data.path())
        .env("XDG_CONFIG_HOME", config.path())
        .args(["session", "clear"])
        .assert()
        .success();

    // Assert
    assert!(data.path().join("moviesdb").join("moviesdb.db").exists());
}
