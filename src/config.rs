//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treemap/treemap.toml`
//! 3. Local config: `<dir>/.treemap.toml` (working directory by default)
//! 4. Environment variables: `TREEMAP_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{PrunePolicy, Rect};
use crate::util::path::expand_path;

/// Window the treemap is drawn into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: i64,
    pub height: i64,
    /// Band at the bottom reserved for the status line
    pub status_height: i64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            status_height: 30,
        }
    }
}

impl CanvasConfig {
    /// The area above the status line.
    pub fn treemap_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, (self.height - self.status_height).max(0))
    }
}

/// Directory scan options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    pub follow_links: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

/// Default World Bank dataset locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PopulationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populations_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions_file: Option<PathBuf>,
}

/// Raw canvas config for intermediate parsing (None = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCanvasConfig {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub status_height: Option<i64>,
}

/// Raw scan config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawScanConfig {
    pub follow_links: Option<bool>,
    pub max_depth: Option<usize>,
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so a layer only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub prune: Option<PrunePolicy>,
    pub canvas: RawCanvasConfig,
    pub scan: RawScanConfig,
    pub population: PopulationConfig,
}

/// Unified configuration for treemap.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How deletes choose the node to remove
    pub prune: PrunePolicy,
    /// Drawing area
    pub canvas: CanvasConfig,
    /// Directory scan options
    pub scan: ScanConfig,
    /// Default population datasets
    pub population: PopulationConfig,
}

/// Get the XDG config directory for treemap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treemap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treemap.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treemap.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Rectangle the treemap is laid out in.
    pub fn treemap_rect(&self) -> Rect {
        self.canvas.treemap_rect()
    }

    /// Merge overlay config onto self: overlay wins where it says something.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            prune: overlay.prune.unwrap_or(self.prune),
            canvas: CanvasConfig {
                width: overlay.canvas.width.unwrap_or(self.canvas.width),
                height: overlay.canvas.height.unwrap_or(self.canvas.height),
                status_height: overlay
                    .canvas
                    .status_height
                    .unwrap_or(self.canvas.status_height),
            },
            scan: ScanConfig {
                follow_links: overlay.scan.follow_links.unwrap_or(self.scan.follow_links),
                max_depth: overlay.scan.max_depth.or(self.scan.max_depth),
            },
            population: PopulationConfig {
                populations_file: overlay
                    .population
                    .populations_file
                    .clone()
                    .or_else(|| self.population.populations_file.clone()),
                regions_file: overlay
                    .population
                    .regions_file
                    .clone()
                    .or_else(|| self.population.regions_file.clone()),
            },
        }
    }

    /// Expand `~` and `$VAR` in dataset paths.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.population.populations_file {
            self.population.populations_file = Some(expand_path(path));
        }
        if let Some(path) = &self.population.regions_file {
            self.population.regions_file = Some(expand_path(path));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treemap.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply TREEMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // TREEMAP_CANVAS__WIDTH -> canvas.width
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEMAP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("canvas.width") {
            settings.canvas.width = val;
        }
        if let Ok(val) = config.get_int("canvas.height") {
            settings.canvas.height = val;
        }
        if let Ok(val) = config.get_int("canvas.status_height") {
            settings.canvas.status_height = val;
        }
        if let Ok(val) = config.get_string("prune") {
            settings.prune = parse_prune_policy(&val)?;
        }
        if let Ok(val) = config.get_bool("scan.follow_links") {
            settings.scan.follow_links = val;
        }
        if let Ok(val) = config.get_int("scan.max_depth") {
            settings.scan.max_depth = usize::try_from(val).ok();
        }
        if let Ok(val) = config.get_string("population.populations_file") {
            settings.population.populations_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("population.regions_file") {
            settings.population.regions_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Render as TOML, e.g. for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

fn parse_prune_policy(value: &str) -> Result<PrunePolicy, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "label" => Ok(PrunePolicy::Label),
        "identity" => Ok(PrunePolicy::Identity),
        other => Err(ApplicationError::Config {
            message: format!("unknown prune policy: {} (expected label or identity)", other),
        }),
    }
}
