//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{PopulationService, TreemapSession};
use crate::config::Settings;
use crate::domain::{FilesystemTreeBuilder, WeightedTree};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Where a tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// A file or directory on disk.
    Filesystem(PathBuf),
    /// The two World Bank documents.
    Population {
        populations: PathBuf,
        regions: PathBuf,
    },
}

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub population: PopulationService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let population = PopulationService::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            population,
        }
    }

    /// Build the tree for `source`.
    pub fn load_tree(&self, source: &TreeSource) -> InfraResult<WeightedTree> {
        debug!(?source, "load_tree");
        match source {
            TreeSource::Filesystem(path) => {
                let builder = FilesystemTreeBuilder::new()
                    .follow_links(self.settings.scan.follow_links)
                    .max_depth(self.settings.scan.max_depth);
                Ok(builder.build(path)?)
            }
            TreeSource::Population {
                populations,
                regions,
            } => {
                for path in [populations, regions] {
                    if !self.fs.is_file(path) {
                        return Err(InfraError::io(
                            format!("dataset not found: {}", path.display()),
                            std::io::Error::from(std::io::ErrorKind::NotFound),
                        ));
                    }
                }
                Ok(self.population.load(populations, regions)?)
            }
        }
    }

    /// Start an interactive session on `tree` using the configured canvas.
    pub fn session(&self, tree: WeightedTree) -> TreemapSession {
        TreemapSession::new(tree, self.settings.treemap_rect(), self.settings.prune)
    }
}
