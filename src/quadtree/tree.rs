use log::{debug, warn};
use rayon::prelude::*;

use crate::errors::QuadtreeError;
use crate::quadtree::{Body, Cell, CellContent, CellId, Quad, Traversal};

/// Maximum depth a split may reach. Bodies at numerically identical (or
/// unseparably close) positions would otherwise force unbounded splitting;
/// once a leaf sits at this level, further bodies are co-located in it as a
/// deliberate approximation. Their mutual force never matters because
/// self-interaction is excluded, and their combined contribution to other
/// positions is summed normally.
pub const MAX_DEPTH: usize = 64;

pub(crate) const ROOT: CellId = 0;

/// An adaptive quadtree over a fixed square domain, used to approximate
/// net inverse-square-law forces with the Barnes-Hut criterion.
///
/// Usage is strictly three-phase: insert every body with
/// [`add_particle`], finalize with [`compute_aggregates`], then query with
/// [`force_at`] (any number of times, optionally in parallel via
/// [`forces_at`]). Inserting again invalidates the aggregates and queries
/// fail fast until the tree is re-aggregated.
///
/// The tree owns all of its cells in an index-based arena; bodies stay
/// owned by the caller and are only referenced.
///
/// # Examples
///
/// ```
/// use quadgrav::quadtree::{Body, QuadTree};
///
/// let bodies = vec![
///     Body::new(0, 0.2, 0.2, 1.0).unwrap(),
///     Body::new(1, 0.8, 0.8, 1.0).unwrap(),
/// ];
///
/// let mut tree = QuadTree::unit_square();
/// for body in &bodies {
///     tree.add_particle(body).unwrap();
/// }
/// tree.compute_aggregates();
///
/// let (fx, fy) = tree.force_at((0.5, 0.2), 0.5).unwrap();
/// assert!(fx.is_finite() && fy.is_finite());
/// ```
///
/// [`add_particle`]: QuadTree::add_particle
/// [`compute_aggregates`]: QuadTree::compute_aggregates
/// [`force_at`]: QuadTree::force_at
/// [`forces_at`]: QuadTree::forces_at
#[derive(Debug)]
pub struct QuadTree<'a> {
    pub(crate) cells: Vec<Cell<'a>>,
    num_particles: usize,
    depth: usize,
    pub(crate) aggregated: bool,
}

impl<'a> QuadTree<'a> {
    /// Creates an empty tree bound to the given square domain.
    pub fn new(domain: Quad) -> Self {
        QuadTree {
            cells: vec![Cell::new(domain, 0)],
            num_particles: 0,
            depth: 0,
            aggregated: false,
        }
    }

    /// Creates an empty tree over the unit square `[0, 1) x [0, 1)`.
    pub fn unit_square() -> Self {
        Self::new(Quad { cx: 0.5, cy: 0.5, half_size: 0.5 })
    }

    /// The domain square this tree covers.
    pub fn domain(&self) -> Quad {
        self.cells[ROOT].quad
    }

    /// The root cell.
    pub fn root(&self) -> &Cell<'a> {
        &self.cells[ROOT]
    }

    /// Number of bodies inserted so far.
    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    /// Maximum depth level reached by any split, root at level 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of cells allocated in the arena.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the aggregates are current and the tree may be
    /// queried.
    pub fn is_aggregated(&self) -> bool {
        self.aggregated
    }

    /// Inserts one body into the tree.
    ///
    /// Invalidates any previously computed aggregates, so
    /// [`compute_aggregates`](QuadTree::compute_aggregates) must run again
    /// before the next force query.
    ///
    /// # Errors
    ///
    /// Returns [`QuadtreeError::OutOfDomain`] if the body's position lies
    /// outside the tree's domain square.
    pub fn add_particle(&mut self, body: &'a Body) -> Result<(), QuadtreeError> {
        let domain = self.cells[ROOT].quad;
        if !domain.contains(body.x, body.y) {
            return Err(QuadtreeError::OutOfDomain { x: body.x, y: body.y });
        }

        self.aggregated = false;
        self.num_particles += 1;
        self.insert_at(ROOT, body);
        Ok(())
    }

    /// Walks down from `id` until the body lands in a leaf, splitting
    /// occupied leaves along the way.
    fn insert_at(&mut self, mut id: CellId, body: &'a Body) {
        loop {
            let quad = self.cells[id].quad;
            let level = self.cells[id].level;
            let content = &mut self.cells[id].content;

            match content {
                CellContent::Empty => {
                    *content = CellContent::Body(body);
                    return;
                }
                CellContent::Colocated(bodies) => {
                    bodies.push(body);
                    return;
                }
                CellContent::Children(children) => {
                    id = children[quad.quadrant_of(body.x, body.y)];
                }
                CellContent::Body(existing) => {
                    let existing: &'a Body = *existing;
                    if level >= MAX_DEPTH {
                        warn!(
                            "depth limit {} reached at ({}, {}); co-locating bodies {} and {} in one leaf",
                            MAX_DEPTH, body.x, body.y, existing.id, body.id
                        );
                        *content = CellContent::Colocated(vec![existing, body]);
                        return;
                    }

                    // Split: push the held body down one level (the target
                    // child is freshly empty, so one hop suffices), then
                    // keep walking with the new body.
                    let children = self.split(id);
                    let occupied = children[quad.quadrant_of(existing.x, existing.y)];
                    self.cells[occupied].content = CellContent::Body(existing);
                    id = children[quad.quadrant_of(body.x, body.y)];
                }
            }
        }
    }

    /// Allocates four empty children for the leaf at `id` and turns it into
    /// an internal cell. Updates the tree's depth diagnostic.
    fn split(&mut self, id: CellId) -> [CellId; 4] {
        let quad = self.cells[id].quad;
        let level = self.cells[id].level;

        let base = self.cells.len();
        for child_quad in quad.subdivide() {
            self.cells.push(Cell::new(child_quad, level + 1));
        }
        let children = [base, base + 1, base + 2, base + 3];

        self.cells[id].content = CellContent::Children(children);
        self.depth = self.depth.max(level + 1);
        children
    }

    /// Computes total mass and weighted position sums for every cell,
    /// bottom-up, and marks the tree ready for force queries.
    ///
    /// Children are always allocated after their parent, so iterating the
    /// arena in reverse index order visits every child before its parent.
    /// Recomputing from scratch each call makes the pass idempotent.
    pub fn compute_aggregates(&mut self) {
        for id in (0..self.cells.len()).rev() {
            let (mass, wx, wy) = match &self.cells[id].content {
                CellContent::Empty => (0.0, 0.0, 0.0),
                CellContent::Body(b) => (b.mass, b.x * b.mass, b.y * b.mass),
                CellContent::Colocated(bodies) => {
                    bodies.iter().fold((0.0, 0.0, 0.0), |(m, wx, wy), b| {
                        (m + b.mass, wx + b.x * b.mass, wy + b.y * b.mass)
                    })
                }
                CellContent::Children(children) => {
                    let mut sum = (0.0, 0.0, 0.0);
                    for &child in children {
                        let cell = &self.cells[child];
                        sum.0 += cell.mass;
                        sum.1 += cell.weighted.0;
                        sum.2 += cell.weighted.1;
                    }
                    sum
                }
            };

            let cell = &mut self.cells[id];
            cell.mass = mass;
            cell.weighted = (wx, wy);
        }

        self.aggregated = true;
        debug!(
            "aggregated {} cells ({} particles, depth {})",
            self.cells.len(),
            self.num_particles,
            self.depth
        );
    }

    /// Approximate net force per unit mass at `pos` from all inserted
    /// bodies, using the default (recursive) traversal.
    ///
    /// `theta` is the Barnes-Hut opening-angle parameter: an internal cell
    /// whose side-to-distance ratio falls below `theta` is accepted as a
    /// single aggregate source instead of being descended. Larger values
    /// trade accuracy for speed; as `theta` approaches zero the result
    /// converges to the exact pairwise sum.
    ///
    /// # Errors
    ///
    /// Fails with [`QuadtreeError::NotAggregated`] if
    /// [`compute_aggregates`](QuadTree::compute_aggregates) has not run
    /// since the last insertion, or [`QuadtreeError::InvalidTheta`] if
    /// `theta` is not a positive number.
    pub fn force_at(&self, pos: (f64, f64), theta: f64) -> Result<(f64, f64), QuadtreeError> {
        self.force_at_with(pos, theta, Traversal::Recursive)
    }

    /// Like [`force_at`](QuadTree::force_at), with an explicit traversal
    /// strategy. All strategies implement the same acceptance rule and
    /// produce the same force up to floating-point summation order.
    pub fn force_at_with(
        &self,
        pos: (f64, f64),
        theta: f64,
        strategy: Traversal,
    ) -> Result<(f64, f64), QuadtreeError> {
        if !self.aggregated {
            return Err(QuadtreeError::NotAggregated);
        }
        if !(theta > 0.0) {
            return Err(QuadtreeError::InvalidTheta(theta));
        }
        self.evaluate(pos, theta, strategy)
    }

    /// Evaluates force queries for many positions in parallel.
    ///
    /// Once aggregated the tree is read-only and every query is independent
    /// and side-effect-free, so the positions fan out across the rayon
    /// thread pool with no shared mutable state; each worker carries its own
    /// traversal scratch.
    pub fn forces_at(
        &self,
        positions: &[(f64, f64)],
        theta: f64,
    ) -> Result<Vec<(f64, f64)>, QuadtreeError> {
        positions
            .par_iter()
            .map(|&pos| self.force_at(pos, theta))
            .collect()
    }
}
