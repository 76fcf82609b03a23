use crate::errors::QuadtreeError;
use crate::quadtree::traversal::{BoundedStack, WorkList};
use crate::quadtree::{Body, QuadTree, Traversal, TRAVERSAL_STACK_CAPACITY};
use approx::assert_relative_eq;

const ALL_STRATEGIES: [Traversal; 4] = [
    Traversal::Recursive,
    Traversal::BreadthFirst,
    Traversal::DepthFirst,
    Traversal::BoundedDepthFirst,
];

fn build_tree<'a>(bodies: &'a [Body]) -> QuadTree<'a> {
    let mut tree = QuadTree::unit_square();
    for body in bodies {
        tree.add_particle(body).expect("body inside unit square");
    }
    tree.compute_aggregates();
    tree
}

#[test]
fn test_all_strategies_agree() {
    let bodies: Vec<Body> = (0..200)
        .map(|i| {
            Body::new(
                i as u32,
                rand::random::<f64>(),
                rand::random::<f64>(),
                0.5 + rand::random::<f64>(),
            )
            .unwrap()
        })
        .collect();
    let tree = build_tree(&bodies);

    let mut queries: Vec<(f64, f64)> = (0..8)
        .map(|_| (rand::random::<f64>(), rand::random::<f64>()))
        .collect();
    // Include a tree-held position so the self-exclusion path is covered in
    // every strategy.
    queries.push(bodies[0].position());

    for &pos in &queries {
        for theta in [0.1, 0.5, 1.0] {
            let (rx, ry) = tree.force_at_with(pos, theta, Traversal::Recursive).unwrap();
            for strategy in ALL_STRATEGIES {
                let (fx, fy) = tree.force_at_with(pos, theta, strategy).unwrap();
                assert_relative_eq!(fx, rx, epsilon = 1e-9, max_relative = 1e-9);
                assert_relative_eq!(fy, ry, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }
}

#[test]
fn test_strategies_agree_on_degenerate_tree() {
    // Co-located bodies exercise the depth-limit leaf in each traversal.
    let bodies: Vec<Body> = (0..4)
        .map(|i| Body::new(i as u32, 0.3, 0.3, 1.0).unwrap())
        .collect();
    let tree = build_tree(&bodies);

    let pos = (0.9, 0.9);
    let (rx, ry) = tree.force_at_with(pos, 0.5, Traversal::Recursive).unwrap();
    for strategy in ALL_STRATEGIES {
        let (fx, fy) = tree.force_at_with(pos, 0.5, strategy).unwrap();
        assert_relative_eq!(fx, rx, max_relative = 1e-12);
        assert_relative_eq!(fy, ry, max_relative = 1e-12);
    }
}

#[test]
fn test_bounded_stack_is_lifo() {
    let mut stack = BoundedStack::new();
    stack.push(1).unwrap();
    stack.push(2).unwrap();
    stack.push(3).unwrap();

    assert_eq!(stack.pop(), Some(3));
    assert_eq!(stack.pop(), Some(2));
    assert_eq!(stack.pop(), Some(1));
    assert_eq!(stack.pop(), None);
}

#[test]
fn test_bounded_stack_overflow_is_fatal() {
    let mut stack = BoundedStack::new();
    for id in 0..TRAVERSAL_STACK_CAPACITY {
        stack.push(id).unwrap();
    }

    // One past capacity fails loudly instead of truncating.
    assert_eq!(
        stack.push(usize::MAX),
        Err(QuadtreeError::TraversalCapacityExceeded {
            capacity: TRAVERSAL_STACK_CAPACITY
        })
    );

    // The stack is still intact after the rejected push.
    assert_eq!(stack.pop(), Some(TRAVERSAL_STACK_CAPACITY - 1));
}
