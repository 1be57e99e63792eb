//! Tree builder for scanning directories into weighted trees.

use std::path::Path;

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::domain::arena::{NodeId, TreeVariant, WeightedTree};
use crate::domain::error::{DomainError, TreeResult};
use crate::util::path::PathExt;

/// Builds a [`WeightedTree`] from a file or directory.
///
/// Files become leaves weighing their size in bytes; directories weigh the
/// sum of their entries. Labels are base names, siblings are ordered by file
/// name. An empty directory is a leaf of weight 0.
#[derive(Debug, Clone, Default)]
pub struct FilesystemTreeBuilder {
    follow_links: bool,
    max_depth: Option<usize>,
}

impl FilesystemTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Directories at this depth are kept but not descended into.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, root_path: &Path) -> TreeResult<WeightedTree> {
        if !root_path.exists() {
            return Err(DomainError::Scan {
                path: root_path.to_path_buf(),
                message: "no such file or directory".to_string(),
            });
        }

        let mut walker = WalkDir::new(root_path)
            .follow_links(self.follow_links)
            .contents_first(true)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut tree = WeightedTree::new(TreeVariant::Filesystem);
        // finished[d] holds the nodes at depth d waiting for their directory
        let mut finished: Vec<Vec<NodeId>> = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(DomainError::Scan {
                        path: root_path.to_path_buf(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let depth = entry.depth();
            if finished.len() < depth + 2 {
                finished.resize_with(depth + 2, Vec::new);
            }
            let label = entry.path().base_label();

            let idx = if entry.file_type().is_dir() {
                let children = std::mem::take(&mut finished[depth + 1]);
                tree.add_node(label, children, 0)?
            } else {
                let size = match entry.metadata() {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        warn!("no size for {}: {}", entry.path().display(), e);
                        0
                    }
                };
                tree.add_leaf(label, size)
            };
            finished[depth].push(idx);
        }

        debug!(nodes = tree.size(), "scanned {}", root_path.display());
        Ok(tree)
    }
}
