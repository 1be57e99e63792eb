//! Environment overrides live in their own test binary: they mutate process state.

use tempfile::TempDir;

use treemap::config::{local_config_path, Settings};
use treemap::domain::PrunePolicy;

#[test]
fn given_env_vars_when_load_then_they_override_local_config() {
    // Arrange
    let config_home = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let dir = TempDir::new().unwrap();
    std::fs::write(
        local_config_path(dir.path()),
        "prune = \"label\"\n[canvas]\nwidth = 800\n",
    )
    .unwrap();
    std::env::set_var("TREEMAP_CANVAS__WIDTH", "640");
    std::env::set_var("TREEMAP_CANVAS__STATUS_HEIGHT", "0");
    std::env::set_var("TREEMAP_PRUNE", "identity");
    std::env::set_var("TREEMAP_SCAN__FOLLOW_LINKS", "true");

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.canvas.width, 640);
    assert_eq!(settings.canvas.status_height, 0);
    assert_eq!(settings.prune, PrunePolicy::Identity);
    assert!(settings.scan.follow_links);
}
