use generational_arena::{Arena, Index};
use itertools::Itertools;
use std::fmt;
use std::path::MAIN_SEPARATOR_STR;
use tracing::{instrument, trace};

use crate::domain::color::derive_color;
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::geometry::Rgb;

/// Handle of a node in a [`WeightedTree`].
///
/// Handles are generational: once a node is pruned its handle no longer
/// resolves, even if the slot is reused.
pub type NodeId = Index;

/// Which kind of hierarchy a tree holds; decides how paths are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeVariant {
    /// Files and folders; weights are byte sizes.
    Filesystem,
    /// World -> region -> country; weights are head counts.
    Population,
    /// Anything else, joined with the given separator.
    Custom(String),
}

impl TreeVariant {
    pub fn separator(&self) -> &str {
        match self {
            TreeVariant::Filesystem => MAIN_SEPARATOR_STR,
            TreeVariant::Population => "->",
            TreeVariant::Custom(sep) => sep.as_str(),
        }
    }
}

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Identifying label, `None` for the empty node
    pub label: Option<String>,
    /// Data size: own size for leaves, sum of children otherwise
    pub weight: u64,
    /// Paint color, only visible on leaves
    pub color: Rgb,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.weight),
            None => write!(f, "<empty>"),
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Label, weight and color of this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for roots and empty nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_empty(&self) -> bool {
        self.data.label.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label.as_deref()
    }

    pub fn weight(&self) -> u64 {
        self.data.weight
    }
}

/// Arena-based weighted tree.
///
/// Ownership flows parent -> children through `children`; `parent` is a plain
/// handle used only for upward traversal. Nodes are built bottom-up: children
/// first, then the node adopting them. The most recently constructed node
/// (which is parentless at creation) is the root.
#[derive(Debug)]
pub struct WeightedTree {
    arena: Arena<TreeNode>,
    root: Option<NodeId>,
    variant: TreeVariant,
    constructed: u64,
}

impl WeightedTree {
    pub fn new(variant: TreeVariant) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            variant,
            constructed: 0,
        }
    }

    pub fn variant(&self) -> &TreeVariant {
        &self.variant
    }

    /// String used to join labels when rendering a path.
    pub fn separator(&self) -> &str {
        self.variant.separator()
    }

    /// Construct a childless node with an explicit weight.
    pub fn add_leaf(&mut self, label: impl Into<String>, weight: u64) -> NodeId {
        self.insert_node(Some(label.into()), Vec::new(), weight)
    }

    /// Construct the canonical empty node (no label, no children, weight 0).
    pub fn add_empty(&mut self) -> NodeId {
        self.insert_node(None, Vec::new(), 0)
    }

    /// Construct a node adopting `children`.
    ///
    /// With children, `weight` is ignored and recomputed as their sum.
    /// Every non-empty child gets this node as parent; children that already
    /// have a parent, or appear twice in `children`, are rejected.
    #[instrument(level = "trace", skip(self, label, children))]
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        children: Vec<NodeId>,
        weight: u64,
    ) -> TreeResult<NodeId> {
        for &child in &children {
            let node = self.node(child)?;
            if node.parent.is_some() {
                return Err(DomainError::AlreadyAttached(child));
            }
        }
        if let Some(&dup) = children.iter().duplicates().next() {
            return Err(DomainError::DuplicateChild(dup));
        }
        Ok(self.insert_node(Some(label.into()), children, weight))
    }

    fn insert_node(&mut self, label: Option<String>, children: Vec<NodeId>, weight: u64) -> NodeId {
        let weight = if label.is_none() {
            0
        } else if children.is_empty() {
            weight
        } else {
            children
                .iter()
                .filter_map(|&c| self.arena.get(c))
                .map(TreeNode::weight)
                .sum()
        };

        self.constructed += 1;
        let color = derive_color(label.as_deref(), self.constructed);
        let node = TreeNode {
            data: NodeData {
                label,
                weight,
                color,
            },
            parent: None,
            children,
        };
        let node_idx = self.arena.insert(node);

        let adopted: Vec<NodeId> = self.arena[node_idx].children.clone();
        for child in adopted {
            if let Some(child_node) = self.arena.get_mut(child) {
                if !child_node.is_empty() {
                    child_node.parent = Some(node_idx);
                }
            }
        }
        trace!(?node_idx, weight, "node constructed");

        self.root = Some(node_idx);
        node_idx
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    /// Like [`get_node`](Self::get_node), but a stale handle is an error.
    pub fn node(&self, idx: NodeId) -> TreeResult<&TreeNode> {
        self.arena.get(idx).ok_or(DomainError::NodeNotFound(idx))
    }

    pub fn node_mut(&mut self, idx: NodeId) -> TreeResult<&mut TreeNode> {
        self.arena.get_mut(idx).ok_or(DomainError::NodeNotFound(idx))
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    /// True if the tree has no root or its root is the empty node.
    pub fn is_empty(&self) -> bool {
        self.root.map_or(true, |root| self.is_empty_node(root))
    }

    /// True if `idx` is the empty node; stale handles count as empty.
    pub fn is_empty_node(&self, idx: NodeId) -> bool {
        self.get_node(idx).map_or(true, TreeNode::is_empty)
    }

    /// Number of non-empty nodes in the whole tree.
    pub fn size(&self) -> usize {
        self.root.map_or(0, |root| self.size_of(root))
    }

    /// Number of non-empty nodes in the subtree rooted at `idx`.
    pub fn size_of(&self, idx: NodeId) -> usize {
        self.iter_from(idx).filter(|(_, node)| !node.is_empty()).count()
    }

    /// Non-empty childless descendants of `idx`, pre-order, left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn leaves(&self, idx: NodeId) -> Vec<NodeId> {
        self.iter_from(idx)
            .filter(|(_, node)| !node.is_empty() && node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Leaves that receive a tile in a layout of `idx`.
    ///
    /// Same order as [`leaves`](Self::leaves), but subtrees of zero weight
    /// are skipped entirely, mirroring what the layout engine visits.
    pub fn weighted_leaves(&self, idx: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get_node(current) else {
                continue;
            };
            if node.is_empty() || node.weight() == 0 {
                continue;
            }
            if node.is_leaf() {
                leaves.push(current);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    /// Strict ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.get_node(idx).and_then(|n| n.parent),
        }
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    pub fn iter_from(&self, idx: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, Some(idx))
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut max_depth = 0;
        let mut stack = vec![(root, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                max_depth = max_depth.max(depth);
                stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
            }
        }
        max_depth
    }

    /// Unlink `idx` from its parent's children and clear its parent handle.
    pub(crate) fn detach(&mut self, idx: NodeId) -> TreeResult<()> {
        let parent = self.node(idx)?.parent;
        if let Some(parent_idx) = parent {
            let parent_node = self.node_mut(parent_idx)?;
            parent_node.children.retain(|&c| c != idx);
        }
        self.node_mut(idx)?.parent = None;
        Ok(())
    }

    /// Drop a detached node from the arena; its handle becomes stale.
    pub(crate) fn remove(&mut self, idx: NodeId) -> Option<TreeNode> {
        self.arena.remove(idx)
    }

    /// Verify the structural invariants of every node reachable from the root.
    ///
    /// - an empty node has no children and weight 0
    /// - a node with children weighs the sum of its children
    /// - every non-empty child points back at its parent
    /// - no handle appears twice among a node's children
    pub fn check_invariants(&self) -> TreeResult<()> {
        for (idx, node) in self.iter() {
            if node.is_empty() {
                if !node.children.is_empty() || node.weight() != 0 {
                    return Err(DomainError::InvariantViolated {
                        node: idx,
                        message: "empty node with children or weight".to_string(),
                    });
                }
                continue;
            }
            if node.is_leaf() {
                continue;
            }
            if let Some(&dup) = node.children.iter().duplicates().next() {
                return Err(DomainError::InvariantViolated {
                    node: dup,
                    message: "child listed more than once".to_string(),
                });
            }
            let mut sum = 0u64;
            for &child in &node.children {
                let child_node = self.node(child)?;
                if !child_node.is_empty() && child_node.parent != Some(idx) {
                    return Err(DomainError::InvariantViolated {
                        node: child,
                        message: "child does not point back at its parent".to_string(),
                    });
                }
                sum += child_node.weight();
            }
            if sum != node.weight() {
                return Err(DomainError::InvariantViolated {
                    node: idx,
                    message: format!("weight {} != sum of children {}", node.weight(), sum),
                });
            }
        }
        Ok(())
    }
}

/// Walks parent handles upward.
pub struct Ancestors<'a> {
    tree: &'a WeightedTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        self.current = self.tree.get_node(idx).and_then(|n| n.parent);
        Some(idx)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a WeightedTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a WeightedTree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a WeightedTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a WeightedTree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.map(|idx| (idx, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
