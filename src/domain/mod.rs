//! Domain layer: the weighted tree and the layout/mutation engine
//!
//! Everything here is synchronous and independent of configuration, CLI and
//! dataset formats. The only I/O is the directory walk in `builder`.

pub mod arena;
pub mod builder;
pub mod color;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mutation;
pub mod path;

pub use arena::{NodeData, NodeId, TreeNode, TreeVariant, WeightedTree};
pub use builder::FilesystemTreeBuilder;
pub use error::{DomainError, TreeResult};
pub use geometry::{Point, Rect, Rgb, Tile};
pub use hit_test::{leaf_group_at, point_to_leaf, LeafGroup};
pub use layout::{layout, layout_tree, Orientation};
pub use mutation::{adjust_leaf, propagate_delta, resize_leaf, select_and_delete, PrunePolicy};
pub use path::path;
