//! Force-evaluation traversals.
//!
//! The Barnes-Hut acceptance rule is implemented once; the non-recursive
//! strategies differ only in the work-list backing that feeds it (LIFO
//! vector, FIFO queue, or a fixed-capacity array stack). They all visit the
//! same set of cells and produce the same force up to floating-point
//! summation order.

use std::collections::VecDeque;

use crate::errors::QuadtreeError;
use crate::kernel::{kernel, SOFTENING};
use crate::quadtree::tree::ROOT;
use crate::quadtree::{Body, Cell, CellContent, CellId, QuadTree};

/// Capacity of the fixed array stack used by
/// [`Traversal::BoundedDepthFirst`]. Generously sized: with the depth limit
/// in place a traversal never holds more than a few hundred cells, so
/// overflow indicates a logic error and is reported, never truncated.
pub const TRAVERSAL_STACK_CAPACITY: usize = 1024;

/// Selects how [`QuadTree::force_at_with`] walks the tree.
///
/// The strategies exist to compare recursion against explicit stacks and
/// queues; they are interchangeable implementations of one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Post-order recursion over child cells.
    Recursive,
    /// Queue-backed iteration, visiting cells level by level.
    BreadthFirst,
    /// Growable stack-backed iteration.
    DepthFirst,
    /// Fixed-capacity array stack; overflow is a fatal capacity error.
    BoundedDepthFirst,
}

/// Push/pop abstraction over the pending-cell collection, so the acceptance
/// logic is written once and the backing structure is swappable.
pub(crate) trait WorkList {
    fn push(&mut self, id: CellId) -> Result<(), QuadtreeError>;
    fn pop(&mut self) -> Option<CellId>;
}

#[derive(Default)]
struct LifoList(Vec<CellId>);

impl WorkList for LifoList {
    fn push(&mut self, id: CellId) -> Result<(), QuadtreeError> {
        self.0.push(id);
        Ok(())
    }

    fn pop(&mut self) -> Option<CellId> {
        self.0.pop()
    }
}

#[derive(Default)]
struct FifoList(VecDeque<CellId>);

impl WorkList for FifoList {
    fn push(&mut self, id: CellId) -> Result<(), QuadtreeError> {
        self.0.push_back(id);
        Ok(())
    }

    fn pop(&mut self) -> Option<CellId> {
        self.0.pop_front()
    }
}

pub(crate) struct BoundedStack {
    slots: [CellId; TRAVERSAL_STACK_CAPACITY],
    len: usize,
}

impl BoundedStack {
    pub(crate) fn new() -> Self {
        BoundedStack {
            slots: [0; TRAVERSAL_STACK_CAPACITY],
            len: 0,
        }
    }
}

impl WorkList for BoundedStack {
    fn push(&mut self, id: CellId) -> Result<(), QuadtreeError> {
        if self.len == TRAVERSAL_STACK_CAPACITY {
            return Err(QuadtreeError::TraversalCapacityExceeded {
                capacity: TRAVERSAL_STACK_CAPACITY,
            });
        }
        self.slots[self.len] = id;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<CellId> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.slots[self.len])
    }
}

/// Direct contribution of one body at the query position, with
/// self-interaction excluded before the kernel is invoked (the softening
/// term alone would not make it zero).
fn direct(pos: (f64, f64), body: &Body) -> (f64, f64) {
    if body.x == pos.0 && body.y == pos.1 {
        return (0.0, 0.0);
    }
    let (kx, ky) = kernel(pos, (body.x, body.y));
    (body.mass * kx, body.mass * ky)
}

/// The multipole-acceptance criterion: treat the cell as a single source
/// when its side-to-distance ratio falls below theta. The distance to the
/// center of mass is softened with the kernel's convention so a query at
/// the center of mass itself cannot divide by zero.
fn accept(cell: &Cell, pos: (f64, f64), theta: f64) -> Result<bool, QuadtreeError> {
    let (cx, cy) = cell.center_of_mass()?;
    let dx = cx - pos.0;
    let dy = cy - pos.1;
    let dist = (dx * dx + dy * dy + SOFTENING).sqrt();
    Ok(cell.quad.side() / dist < theta)
}

/// Aggregate contribution of an accepted cell: the kernel evaluated at its
/// center of mass, scaled by its total mass.
fn estimate(cell: &Cell, pos: (f64, f64)) -> Result<(f64, f64), QuadtreeError> {
    let com = cell.center_of_mass()?;
    let (kx, ky) = kernel(pos, com);
    Ok((cell.total_mass() * kx, cell.total_mass() * ky))
}

impl<'a> QuadTree<'a> {
    /// Dispatches an already-validated force query to the selected
    /// traversal. Callers guarantee the tree is aggregated and theta is
    /// positive.
    pub(crate) fn evaluate(
        &self,
        pos: (f64, f64),
        theta: f64,
        strategy: Traversal,
    ) -> Result<(f64, f64), QuadtreeError> {
        match strategy {
            Traversal::Recursive => self.force_recursive(ROOT, pos, theta),
            Traversal::BreadthFirst => self.force_iterative(pos, theta, &mut FifoList::default()),
            Traversal::DepthFirst => self.force_iterative(pos, theta, &mut LifoList::default()),
            Traversal::BoundedDepthFirst => {
                self.force_iterative(pos, theta, &mut BoundedStack::new())
            }
        }
    }

    fn force_recursive(
        &self,
        id: CellId,
        pos: (f64, f64),
        theta: f64,
    ) -> Result<(f64, f64), QuadtreeError> {
        let cell = &self.cells[id];
        match &cell.content {
            CellContent::Empty => Ok((0.0, 0.0)),
            CellContent::Body(body) => Ok(direct(pos, body)),
            CellContent::Colocated(bodies) => Ok(bodies.iter().fold((0.0, 0.0), |(fx, fy), b| {
                let (bx, by) = direct(pos, b);
                (fx + bx, fy + by)
            })),
            CellContent::Children(children) => {
                // A massless subtree contributes nothing and has no defined
                // center of mass, so it is not descended.
                if cell.total_mass() == 0.0 {
                    return Ok((0.0, 0.0));
                }
                if accept(cell, pos, theta)? {
                    return estimate(cell, pos);
                }
                let mut force = (0.0, 0.0);
                for &child in children {
                    if self.cells[child].is_empty() {
                        continue;
                    }
                    let (fx, fy) = self.force_recursive(child, pos, theta)?;
                    force.0 += fx;
                    force.1 += fy;
                }
                Ok(force)
            }
        }
    }

    fn force_iterative<W: WorkList>(
        &self,
        pos: (f64, f64),
        theta: f64,
        pending: &mut W,
    ) -> Result<(f64, f64), QuadtreeError> {
        let mut force = (0.0, 0.0);
        pending.push(ROOT)?;

        while let Some(id) = pending.pop() {
            let cell = &self.cells[id];
            match &cell.content {
                CellContent::Empty => {}
                CellContent::Body(body) => {
                    let (fx, fy) = direct(pos, body);
                    force.0 += fx;
                    force.1 += fy;
                }
                CellContent::Colocated(bodies) => {
                    for body in bodies {
                        let (fx, fy) = direct(pos, body);
                        force.0 += fx;
                        force.1 += fy;
                    }
                }
                CellContent::Children(children) => {
                    if cell.total_mass() == 0.0 {
                        continue;
                    }
                    if accept(cell, pos, theta)? {
                        let (fx, fy) = estimate(cell, pos)?;
                        force.0 += fx;
                        force.1 += fy;
                    } else {
                        for &child in children {
                            if self.cells[child].is_empty() {
                                continue;
                            }
                            pending.push(child)?;
                        }
                    }
                }
            }
        }

        Ok(force)
    }
}
