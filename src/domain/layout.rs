//! Slice-and-dice treemap layout.
//!
//! Each node with children splits its rectangle into slices along its longer
//! axis (x when `width > height`, y otherwise), one slice per child, sized in
//! proportion to the child's weight. Slice offsets accumulate per-term floors;
//! the last child, or the last child before a zero-weight tail, takes the
//! remaining extent so the slices tile the parent exactly.
//!
//! The walk uses an explicit stack, so deep trees cannot exhaust the call
//! stack. Output order is pre-order over the leaves, left to right.

use tracing::{debug, trace};

use crate::domain::arena::{NodeId, WeightedTree};
use crate::domain::geometry::{Rect, Tile};

/// Axis along which a node's children are sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left-to-right slices spanning the full height.
    Horizontal,
    /// Top-to-bottom slices spanning the full width.
    Vertical,
}

impl Orientation {
    pub fn for_rect(rect: &Rect) -> Self {
        if rect.width > rect.height {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// Lay out the subtree rooted at `node` inside `rect`.
///
/// Returns one tile per leaf of positive weight. Empty and zero-weight
/// subtrees produce nothing.
pub fn layout(tree: &WeightedTree, node: NodeId, rect: Rect) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut stack = vec![(node, rect)];

    while let Some((idx, rect)) = stack.pop() {
        let Some(current) = tree.get_node(idx) else {
            continue;
        };
        if current.is_empty() || current.weight() == 0 {
            continue;
        }
        if current.is_leaf() {
            tiles.push(Tile {
                rect,
                color: current.data.color,
            });
            continue;
        }

        let weights: Vec<u64> = current
            .children
            .iter()
            .map(|&c| tree.get_node(c).map_or(0, |n| n.weight()))
            .collect();
        let slices = slice(&weights, rect);
        trace!(?idx, ?rect, slices = slices.len(), "sliced node");

        // Reverse push keeps the pop order left to right.
        for (&child, sub_rect) in current.children.iter().zip(slices).rev() {
            stack.push((child, sub_rect));
        }
    }

    debug!(tiles = tiles.len(), "layout computed");
    tiles
}

/// Lay out the whole tree; an empty tree yields no tiles.
pub fn layout_tree(tree: &WeightedTree, rect: Rect) -> Vec<Tile> {
    tree.root().map_or_else(Vec::new, |root| layout(tree, root, rect))
}

/// Split `rect` into one sub-rectangle per weight.
///
/// With a zero total the first slice takes the whole extent.
pub fn slice(weights: &[u64], rect: Rect) -> Vec<Rect> {
    let orientation = Orientation::for_rect(&rect);
    let (offset, extent) = match orientation {
        Orientation::Horizontal => (rect.x, rect.width),
        Orientation::Vertical => (rect.y, rect.height),
    };
    let total: u64 = weights.iter().sum();
    let end = offset + extent;

    // tail[i] = total weight of the children after i
    let mut tail = vec![0u64; weights.len()];
    for i in (0..weights.len().saturating_sub(1)).rev() {
        tail[i] = tail[i + 1] + weights[i + 1];
    }

    let mut start = offset;
    let mut slices = Vec::with_capacity(weights.len());
    for (i, &weight) in weights.iter().enumerate() {
        let share = proportional(weight, total, extent);
        let length = if tail[i] == 0 { end - start } else { share };

        slices.push(match orientation {
            Orientation::Horizontal => Rect::new(start, rect.y, length, rect.height),
            Orientation::Vertical => Rect::new(rect.x, start, rect.width, length),
        });
        start += share;
    }
    slices
}

/// `floor(weight / total * extent)` in exact integer arithmetic.
fn proportional(weight: u64, total: u64, extent: i64) -> i64 {
    if total == 0 || extent <= 0 {
        return 0;
    }
    let share = u128::from(weight) * extent as u128 / u128::from(total);
    share as i64
}
