//! Tests for mapping points back to leaves

use rstest::rstest;

use treemap::domain::{
    leaf_group_at, point_to_leaf, NodeId, Point, Rect, TreeVariant, WeightedTree,
};

fn handout_tree() -> (WeightedTree, [NodeId; 3], NodeId) {
    let mut tree = WeightedTree::new(TreeVariant::Custom("/".into()));
    let a = tree.add_leaf("a", 20);
    let b = tree.add_leaf("b", 50);
    let c = tree.add_leaf("c", 30);
    let root = tree.add_node("root", vec![a, b, c], 0).unwrap();
    (tree, [a, b, c], root)
}

const BOUNDS: Rect = Rect::new(0, 0, 200, 100);

#[rstest]
#[case(Point::new(0, 0), 0)]
#[case(Point::new(39, 99), 0)]
#[case(Point::new(40, 0), 1)]
#[case(Point::new(139, 50), 1)]
#[case(Point::new(140, 50), 2)]
#[case(Point::new(199, 99), 2)]
fn given_point_inside_tile_when_hit_test_then_returns_its_leaf(
    #[case] point: Point,
    #[case] expected: usize,
) {
    let (tree, leaves, root) = handout_tree();

    let hit = point_to_leaf(&tree, root, BOUNDS, point);

    assert_eq!(hit, Some(leaves[expected]));
}

#[rstest]
#[case(Point::new(200, 50))]
#[case(Point::new(50, 100))]
#[case(Point::new(-1, 0))]
fn given_point_outside_bounds_when_hit_test_then_none(#[case] point: Point) {
    let (tree, _, root) = handout_tree();

    assert_eq!(point_to_leaf(&tree, root, BOUNDS, point), None);
}

#[test]
fn given_zero_weight_leaf_when_hit_test_then_never_selected() {
    // Arrange
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let left = tree.add_leaf("left", 50);
    let zero = tree.add_leaf("zero", 0);
    let right = tree.add_leaf("right", 50);
    let root = tree.add_node("root", vec![left, zero, right], 0).unwrap();
    let bounds = Rect::new(0, 0, 100, 10);

    // Act
    let hits: Vec<Option<NodeId>> = (0..100)
        .map(|x| point_to_leaf(&tree, root, bounds, Point::new(x, 5)))
        .collect();

    // Assert
    assert!(hits.iter().all(|hit| *hit != Some(zero)));
    assert_eq!(hits[49], Some(left));
    assert_eq!(hits[50], Some(right));
}

#[test]
fn given_leaf_rounded_to_zero_height_when_hit_test_then_sibling_is_hit() {
    // Arrange: pair is squeezed into a 1x1 cell at the right edge
    let mut tree = WeightedTree::new(TreeVariant::Filesystem);
    let x = tree.add_leaf("x", 1);
    let y = tree.add_leaf("y", 1);
    let pair = tree.add_node("pair", vec![x, y], 0).unwrap();
    let big = tree.add_leaf("big", 1000);
    let root = tree.add_node("root", vec![big, pair], 0).unwrap();
    let bounds = Rect::new(0, 0, 100, 1);

    // Act
    let group = leaf_group_at(&tree, root, bounds, Point::new(99, 0));

    // Assert: x rounds to (99, 0, 1, 0), y takes the whole cell
    let group = group.expect("something at the right edge");
    assert_eq!(group.rect, Rect::new(99, 0, 1, 1));
    assert_eq!(group.leaves, vec![y]);
    assert_ne!(point_to_leaf(&tree, root, bounds, Point::new(99, 0)), Some(x));
}

#[test]
fn given_single_leaf_root_when_hit_test_then_root_is_hit() {
    let mut tree = WeightedTree::new(TreeVariant::Population);
    let root = tree.add_leaf("World", 5);

    assert_eq!(point_to_leaf(&tree, root, BOUNDS, Point::new(10, 10)), Some(root));
}
