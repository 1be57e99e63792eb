//! Tests for delete-by-selection and resize

use rstest::rstest;

use treemap::domain::{
    adjust_leaf, layout, propagate_delta, resize_leaf, select_and_delete, DomainError, NodeId,
    Point, PrunePolicy, Rect, TreeVariant, WeightedTree,
};
use treemap::util::testing::init_test_setup;

const BOUNDS: Rect = Rect::new(0, 0, 100, 10);

/// root(a=60, b=40)
fn two_leaves() -> (WeightedTree, NodeId, NodeId, NodeId) {
    let mut tree = WeightedTree::new(TreeVariant::Custom("/".into()));
    let a = tree.add_leaf("a", 60);
    let b = tree.add_leaf("b", 40);
    let root = tree.add_node("root", vec![a, b], 0).unwrap();
    (tree, root, a, b)
}

/// root(dir(d1=30, d2=30), f=40)
fn nested() -> (WeightedTree, NodeId, NodeId, NodeId) {
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let d1 = tree.add_leaf("d1", 30);
    let d2 = tree.add_leaf("d2", 30);
    let dir = tree.add_node("dir", vec![d1, d2], 0).unwrap();
    let f = tree.add_leaf("f", 40);
    let root = tree.add_node("root", vec![dir, f], 0).unwrap();
    (tree, root, dir, d1)
}

#[rstest]
#[case(PrunePolicy::Label)]
#[case(PrunePolicy::Identity)]
fn given_two_leaves_when_deleting_heavier_then_root_keeps_the_rest(#[case] policy: PrunePolicy) {
    // Arrange
    init_test_setup();
    let (mut tree, root, a, b) = two_leaves();

    // Act
    let deleted = select_and_delete(&mut tree, BOUNDS, Point::new(10, 5), policy).unwrap();

    // Assert
    assert_eq!(deleted, vec![a]);
    assert_eq!(tree.node(root).unwrap().weight(), 40);
    assert_eq!(tree.node(root).unwrap().children, vec![b]);
    assert!(matches!(tree.node(a), Err(DomainError::NodeNotFound(_))));
    tree.check_invariants().unwrap();
}

#[test]
fn given_nested_leaf_when_deleted_then_every_ancestor_loses_its_weight() {
    // Arrange
    let (mut tree, root, dir, d1) = nested();
    // dir is 60x10 at the left, d1 its left half
    let point = Point::new(5, 5);

    // Act
    let deleted = select_and_delete(&mut tree, BOUNDS, point, PrunePolicy::Label).unwrap();

    // Assert
    assert_eq!(deleted, vec![d1]);
    assert_eq!(tree.node(dir).unwrap().weight(), 30);
    assert_eq!(tree.node(root).unwrap().weight(), 70);
    assert_eq!(tree.size(), 4);
    tree.check_invariants().unwrap();
}

#[test]
fn given_directory_emptied_when_laid_out_then_it_gets_no_tile() {
    // Arrange
    let (mut tree, root, dir, _) = nested();

    // Act: delete both files of dir, one click each
    select_and_delete(&mut tree, BOUNDS, Point::new(5, 5), PrunePolicy::Identity).unwrap();
    select_and_delete(&mut tree, BOUNDS, Point::new(5, 5), PrunePolicy::Identity).unwrap();

    // Assert
    let dir_node = tree.node(dir).unwrap();
    assert!(dir_node.children.is_empty());
    assert_eq!(dir_node.weight(), 0);
    let tiles = layout(&tree, root, BOUNDS);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].rect, BOUNDS);
    tree.check_invariants().unwrap();
}

#[test]
fn given_single_leaf_root_when_deleted_then_tree_is_empty_and_next_delete_is_noop() {
    // Arrange
    let mut tree = WeightedTree::new(TreeVariant::Population);
    let root = tree.add_leaf("World", 5);

    // Act
    let first = select_and_delete(&mut tree, BOUNDS, Point::new(1, 1), PrunePolicy::Label).unwrap();
    let second =
        select_and_delete(&mut tree, BOUNDS, Point::new(1, 1), PrunePolicy::Label).unwrap();

    // Assert
    assert_eq!(first, vec![root]);
    assert!(second.is_empty());
    assert!(tree.is_empty());
    assert!(layout(&tree, root, BOUNDS).is_empty());
}

#[test]
fn given_point_outside_when_delete_then_nothing_changes() {
    let (mut tree, root, _, _) = two_leaves();

    let deleted =
        select_and_delete(&mut tree, BOUNDS, Point::new(500, 5), PrunePolicy::Label).unwrap();

    assert!(deleted.is_empty());
    assert_eq!(tree.node(root).unwrap().weight(), 100);
    assert_eq!(tree.size(), 3);
}

#[test]
fn given_duplicate_labels_when_label_policy_then_first_match_is_pruned() {
    // Arrange: root(dup=10, dup=30); the click lands on the second one
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let first = tree.add_leaf("dup", 10);
    let second = tree.add_leaf("dup", 30);
    let root = tree.add_node("root", vec![first, second], 0).unwrap();

    // Act
    let deleted =
        select_and_delete(&mut tree, Rect::new(0, 0, 40, 10), Point::new(30, 5), PrunePolicy::Label)
            .unwrap();

    // Assert: weight came off the clicked leaf, structure lost the first match
    assert_eq!(deleted, vec![second]);
    assert!(!tree.contains(first));
    assert_eq!(tree.node(second).unwrap().weight(), 0);
    assert_eq!(tree.node(root).unwrap().weight(), 10);
}

#[test]
fn given_duplicate_labels_when_identity_policy_then_clicked_leaf_is_pruned() {
    // Arrange
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let first = tree.add_leaf("dup", 10);
    let second = tree.add_leaf("dup", 30);
    let root = tree.add_node("root", vec![first, second], 0).unwrap();

    // Act
    select_and_delete(
        &mut tree,
        Rect::new(0, 0, 40, 10),
        Point::new(30, 5),
        PrunePolicy::Identity,
    )
    .unwrap();

    // Assert
    assert!(tree.contains(first));
    assert!(!tree.contains(second));
    assert_eq!(tree.node(root).unwrap().weight(), 10);
    tree.check_invariants().unwrap();
}

#[test]
fn given_label_matching_inner_node_when_label_policy_then_nothing_pruned() {
    // Arrange: root(x(x=5), y=5); the leaf shares its directory's name
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let inner_leaf = tree.add_leaf("x", 5);
    let dir = tree.add_node("x", vec![inner_leaf], 0).unwrap();
    let y = tree.add_leaf("y", 5);
    let root = tree.add_node("root", vec![dir, y], 0).unwrap();

    // Act
    select_and_delete(&mut tree, BOUNDS, Point::new(10, 5), PrunePolicy::Label).unwrap();

    // Assert: weight released, but the leaf is still attached
    assert_eq!(tree.node(dir).unwrap().children, vec![inner_leaf]);
    assert_eq!(tree.node(inner_leaf).unwrap().weight(), 0);
    assert_eq!(tree.node(root).unwrap().weight(), 5);
    assert_eq!(layout(&tree, root, BOUNDS).len(), 1);
    tree.check_invariants().unwrap();
}

#[test]
fn given_leaf_of_100_when_adjusted_then_ancestors_follow() {
    // Arrange
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let leaf = tree.add_leaf("leaf", 100);
    let sibling = tree.add_leaf("sibling", 50);
    let dir = tree.add_node("dir", vec![leaf, sibling], 0).unwrap();
    let root = tree.add_node("root", vec![dir], 0).unwrap();

    // Act
    let grown = adjust_leaf(&mut tree, leaf, true).unwrap();
    let shrunk = adjust_leaf(&mut tree, leaf, false).unwrap();

    // Assert: 100 -> 101 (delta 1), then 101 -> 99 (delta 2)
    assert_eq!(grown, 1);
    assert_eq!(shrunk, 2);
    assert_eq!(tree.node(leaf).unwrap().weight(), 99);
    assert_eq!(tree.node(dir).unwrap().weight(), 149);
    assert_eq!(tree.node(root).unwrap().weight(), 149);
    tree.check_invariants().unwrap();
}

#[test]
fn given_weight_one_when_shrunk_then_nothing_changes() {
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let leaf = tree.add_leaf("leaf", 1);
    let root = tree.add_node("root", vec![leaf], 0).unwrap();

    let delta = adjust_leaf(&mut tree, leaf, false).unwrap();

    assert_eq!(delta, 0);
    assert_eq!(tree.node(leaf).unwrap().weight(), 1);
    assert_eq!(tree.node(root).unwrap().weight(), 1);
}

#[test]
fn given_many_resizes_when_checked_then_invariants_hold_throughout() {
    let (mut tree, _, _, d1) = nested();

    for step in 0..50 {
        adjust_leaf(&mut tree, d1, step % 3 != 0).unwrap();
        tree.check_invariants().unwrap();
    }
}

#[test]
fn given_resize_without_propagation_when_delta_applied_later_then_consistent() {
    let (mut tree, root, _, d1) = nested();

    let delta = resize_leaf(&mut tree, d1, true).unwrap();
    assert!(tree.check_invariants().is_err());
    propagate_delta(&mut tree, d1, delta, true).unwrap();

    assert_eq!(tree.node(root).unwrap().weight(), 101);
    tree.check_invariants().unwrap();
}

#[test]
fn given_pruned_handle_when_resized_then_node_not_found() {
    // Arrange
    let (mut tree, _, a, _) = two_leaves();
    select_and_delete(&mut tree, BOUNDS, Point::new(10, 5), PrunePolicy::Identity).unwrap();

    // Act
    let result = adjust_leaf(&mut tree, a, true);

    // Assert
    assert!(matches!(result, Err(DomainError::NodeNotFound(id)) if id == a));
}

#[rstest]
#[case(true)]
#[case(false)]
fn given_directory_node_when_adjusted_then_rejected_and_weights_untouched(#[case] grow: bool) {
    // Arrange
    let (mut tree, root, dir, d1) = nested();

    // Act
    let result = adjust_leaf(&mut tree, dir, grow);

    // Assert
    assert!(matches!(result, Err(DomainError::NotALeaf(id)) if id == dir));
    assert_eq!(tree.node(dir).unwrap().weight(), 60);
    assert_eq!(tree.node(d1).unwrap().weight(), 30);
    assert_eq!(tree.node(root).unwrap().weight(), 100);
    tree.check_invariants().unwrap();
}

#[test]
fn given_weight_700_when_shrunk_then_delta_is_exact_one_percent() {
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let leaf = tree.add_leaf("leaf", 700);
    let root = tree.add_node("root", vec![leaf], 0).unwrap();

    let delta = adjust_leaf(&mut tree, leaf, false).unwrap();

    assert_eq!(delta, 7);
    assert_eq!(tree.node(leaf).unwrap().weight(), 693);
    assert_eq!(tree.node(root).unwrap().weight(), 693);
}
