//! Edits that keep the weight invariant: delete-by-selection and resize.
//!
//! Weight bookkeeping always runs before structural removal: a deleted leaf
//! first hands its weight back up the ancestor chain, then gets pruned.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeId, WeightedTree};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::geometry::{Point, Rect};
use crate::domain::hit_test::leaf_group_at;

/// Which node a delete removes from the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrunePolicy {
    /// First node in pre-order whose label equals the selected leaf's label.
    ///
    /// Labels are not unique, so with duplicates this can prune a different
    /// node than the one whose weight was released.
    #[default]
    Label,
    /// Exactly the selected leaf.
    Identity,
}

/// Delete the leaves under `point`.
///
/// Each leaf in the hit group releases its weight to all strict ancestors, is
/// zeroed, and is then pruned according to `policy`. Returns the hit group,
/// empty when nothing was hit or the tree is empty.
#[instrument(level = "debug", skip(tree))]
pub fn select_and_delete(
    tree: &mut WeightedTree,
    rect: Rect,
    point: Point,
    policy: PrunePolicy,
) -> TreeResult<Vec<NodeId>> {
    let Some(root) = tree.root() else {
        return Ok(Vec::new());
    };
    if tree.is_empty() {
        return Ok(Vec::new());
    }
    let Some(group) = leaf_group_at(tree, root, rect, point) else {
        debug!("nothing under point");
        return Ok(Vec::new());
    };

    for &leaf in &group.leaves {
        // An earlier label match in the same group may already have taken it.
        let Some(weight) = tree.get_node(leaf).map(|n| n.weight()) else {
            continue;
        };
        propagate_delta(tree, leaf, weight, false)?;
        tree.node_mut(leaf)?.data.weight = 0;

        match policy {
            PrunePolicy::Label => {
                let label = tree.node(leaf)?.data.label.clone();
                if let Some(label) = label {
                    prune_first_by_label(tree, &label)?;
                }
            }
            PrunePolicy::Identity => prune_node(tree, leaf)?,
        }
    }
    Ok(group.leaves)
}

/// Prune the first node, in pre-order from the root, labelled `label`.
///
/// A childless match is emptied and unlinked; a match with children stops
/// the search without pruning anything. Returns whether a match was found.
pub fn prune_first_by_label(tree: &mut WeightedTree, label: &str) -> TreeResult<bool> {
    let found = tree
        .iter()
        .find(|(_, node)| node.label() == Some(label))
        .map(|(idx, node)| (idx, node.is_leaf()));

    match found {
        Some((idx, true)) => {
            prune_node(tree, idx)?;
            Ok(true)
        }
        Some((idx, false)) => {
            trace!(?idx, "label matched an inner node, nothing pruned");
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Empty `idx` and unlink it from its parent.
///
/// A pruned non-root node leaves the arena; a pruned root stays behind as
/// the tree's empty root.
pub fn prune_node(tree: &mut WeightedTree, idx: NodeId) -> TreeResult<()> {
    let node = tree.node_mut(idx)?;
    node.data.label = None;
    node.data.weight = 0;
    node.children.clear();

    let is_root = tree.root() == Some(idx);
    tree.detach(idx)?;
    if !is_root {
        tree.remove(idx);
    }
    debug!(?idx, is_root, "node pruned");
    Ok(())
}

/// Grow or shrink `leaf` by one percent of its weight, rounded up.
///
/// Shrinking never takes the weight below 1; a shrink that would is skipped
/// and reports a delta of 0. Callers pass the returned delta to
/// [`propagate_delta`]. A node with children is rejected with
/// [`DomainError::NotALeaf`]: its weight is the sum of its children.
pub fn resize_leaf(tree: &mut WeightedTree, leaf: NodeId, grow: bool) -> TreeResult<u64> {
    if tree.is_empty() {
        return Ok(0);
    }
    let node = tree.node_mut(leaf)?;
    if !node.is_leaf() {
        return Err(DomainError::NotALeaf(leaf));
    }
    let weight = node.data.weight;
    let delta = weight.div_ceil(100);

    if grow {
        node.data.weight = weight.saturating_add(delta);
        return Ok(delta);
    }
    if weight.saturating_sub(delta) >= 1 {
        node.data.weight = weight - delta;
        return Ok(delta);
    }
    Ok(0)
}

/// Apply `delta` to every strict ancestor of `leaf`.
pub fn propagate_delta(
    tree: &mut WeightedTree,
    leaf: NodeId,
    delta: u64,
    grow: bool,
) -> TreeResult<()> {
    if delta == 0 {
        return Ok(());
    }
    tree.node(leaf)?;
    let ancestors: Vec<NodeId> = tree.ancestors(leaf).collect();
    for ancestor in ancestors {
        let node = tree.node_mut(ancestor)?;
        node.data.weight = if grow {
            node.data.weight.saturating_add(delta)
        } else {
            node.data.weight.saturating_sub(delta)
        };
    }
    Ok(())
}

/// [`resize_leaf`] followed by [`propagate_delta`] with its result.
#[instrument(level = "debug", skip(tree))]
pub fn adjust_leaf(tree: &mut WeightedTree, leaf: NodeId, grow: bool) -> TreeResult<u64> {
    let delta = resize_leaf(tree, leaf, grow)?;
    propagate_delta(tree, leaf, delta, grow)?;
    Ok(delta)
}
