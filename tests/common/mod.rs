//! Shared utilities for integration testing.

use ipconf::config::ServerConfig;
use tempfile::TempDir;

/// Template directory fixture with the same substitution keys as the
/// shipped templates.
pub fn template_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "<html><title>{{title}}</title><h1>{{ip}}</h1><table>{{clientinfo}}</table></html>",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("error.html"),
        "<html><h1>{{code}} {{header}}</h1><p>{{message}}</p></html>",
    )
    .unwrap();
    std::fs::write(dir.path().join("robots.txt"), "User-agent: *\nDisallow: /\n").unwrap();
    dir
}

/// Default config pointed at the fixture template directory.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.templates.dir = dir.path().display().to_string();
    config
}
