//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the tree model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("node is empty: {0:?}")]
    EmptyNode(NodeId),

    #[error("node already has a parent: {0:?}")]
    AlreadyAttached(NodeId),

    #[error("node listed more than once among children: {0:?}")]
    DuplicateChild(NodeId),

    #[error("node has children and cannot be resized: {0:?}")]
    NotALeaf(NodeId),

    #[error("scan failed for {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("invariant violated at {node:?}: {message}")]
    InvariantViolated { node: NodeId, message: String },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
