//! Status-line paths: root-first labels joined by the tree's separator.

use itertools::Itertools;

use crate::domain::arena::{NodeId, WeightedTree};
use crate::domain::error::{DomainError, TreeResult};

/// Render `node` as `root<sep>...<sep>node (<weight>)`.
///
/// ```
/// use treemap::domain::{path, TreeVariant, WeightedTree};
///
/// let mut tree = WeightedTree::new(TreeVariant::Custom("/".into()));
/// let leaf = tree.add_leaf("leaf", 132);
/// let sub = tree.add_node("sub", vec![leaf], 0).unwrap();
/// tree.add_node("root", vec![sub], 0).unwrap();
///
/// assert_eq!(path(&tree, leaf).unwrap(), "root/sub/leaf (132)");
/// ```
pub fn path(tree: &WeightedTree, node: NodeId) -> TreeResult<String> {
    let current = tree.node(node)?;
    if current.is_empty() {
        return Err(DomainError::EmptyNode(node));
    }

    let mut labels: Vec<&str> = std::iter::once(node)
        .chain(tree.ancestors(node))
        .filter_map(|idx| tree.get_node(idx).and_then(|n| n.label()))
        .collect();
    labels.reverse();

    Ok(format!(
        "{} ({})",
        labels.iter().join(tree.separator()),
        current.weight()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::TreeVariant;

    #[test]
    fn test_path_of_root_is_its_label() {
        let mut tree = WeightedTree::new(TreeVariant::Population);
        let root = tree.add_leaf("World", 7);
        assert_eq!(path(&tree, root).unwrap(), "World (7)");
    }

    #[test]
    fn test_path_uses_population_arrow() {
        let mut tree = WeightedTree::new(TreeVariant::Population);
        let country = tree.add_leaf("Canada", 38);
        let region = tree.add_node("North America", vec![country], 0).unwrap();
        tree.add_node("World", vec![region], 0).unwrap();
        assert_eq!(
            path(&tree, country).unwrap(),
            "World->North America->Canada (38)"
        );
    }

    #[test]
    fn test_path_of_empty_node_errors() {
        let mut tree = WeightedTree::new(TreeVariant::Filesystem);
        let empty = tree.add_empty();
        assert!(matches!(path(&tree, empty), Err(DomainError::EmptyNode(_))));
    }
}
