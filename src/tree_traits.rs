//! Text outline of a weighted tree, rendered with `termtree`.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeId, WeightedTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for WeightedTree {
    /// Each line reads `label (weight)`; empty children are left out.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root_idx) = self.root().filter(|&idx| self.contains(idx)) else {
            return Tree::new("Empty tree".to_string());
        };

        // Post-order with an explicit stack: a node is rendered once all of
        // its shown children sit on top of `built`, left to right.
        let mut built: Vec<Tree<String>> = Vec::new();
        let mut stack = vec![(root_idx, false)];
        while let Some((idx, expanded)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            let shown: Vec<NodeId> = node
                .children
                .iter()
                .copied()
                .filter(|&child| !self.is_empty_node(child))
                .collect();
            if expanded {
                let leaves = built.split_off(built.len() - shown.len());
                built.push(Tree::new(node.data.to_string()).with_leaves(leaves));
            } else {
                stack.push((idx, true));
                stack.extend(shown.iter().rev().map(|&child| (child, false)));
            }
        }
        built
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}
