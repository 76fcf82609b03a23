use crate::errors::QuadtreeError;
use crate::quadtree::Body;

/// Index of a cell in the tree's arena.
pub type CellId = usize;

/// Quadrant indices into a cell's child array.
pub const NW: usize = 0;
pub const NE: usize = 1;
pub const SW: usize = 2;
pub const SE: usize = 3;

/// Represents a square region in 2D space.
///
/// Each `Quad` has a center position (cx, cy) and a half-size, which is half
/// the length of one side of the square.
///
/// # Examples
///
/// ```
/// use quadgrav::quadtree::Quad;
///
/// let quad = Quad { cx: 0.5, cy: 0.5, half_size: 0.5 };
/// assert!(quad.contains(0.25, 0.75));
/// assert!(!quad.contains(1.5, 0.5)); // outside the square
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub cx: f64,        // center x-coordinate
    pub cy: f64,        // center y-coordinate
    pub half_size: f64, // half the length of one side
}

impl Quad {
    /// Full side length of the square.
    #[inline]
    pub fn side(&self) -> f64 {
        self.half_size * 2.0
    }

    /// Returns true if the point (x, y) is inside this quad.
    ///
    /// The boundary is inclusive on the lower bounds and exclusive on the
    /// upper bounds, so a point on a shared edge belongs to exactly one quad.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.cx - self.half_size &&
            x <  self.cx + self.half_size &&
            y >= self.cy - self.half_size &&
            y <  self.cy + self.half_size
    }

    /// Subdivides the quad into four child quads, indexed NW, NE, SW, SE.
    ///
    /// Children have half the side length and are centered at
    /// `center ± half_size / 2` on each axis, so the four tile the parent
    /// square without gaps or overlaps.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadgrav::quadtree::{Quad, NW, SE};
    ///
    /// let quad = Quad { cx: 0.0, cy: 0.0, half_size: 1.0 };
    /// let children = quad.subdivide();
    ///
    /// assert_eq!(children[NW].cx, -0.5);
    /// assert_eq!(children[NW].cy, 0.5);
    /// assert_eq!(children[NW].half_size, 0.5);
    /// assert!(children[SE].contains(0.25, -0.25));
    /// ```
    pub fn subdivide(&self) -> [Quad; 4] {
        let hs = self.half_size / 2.0;
        [
            Quad { cx: self.cx - hs, cy: self.cy + hs, half_size: hs }, // NW
            Quad { cx: self.cx + hs, cy: self.cy + hs, half_size: hs }, // NE
            Quad { cx: self.cx - hs, cy: self.cy - hs, half_size: hs }, // SW
            Quad { cx: self.cx + hs, cy: self.cy - hs, half_size: hs }, // SE
        ]
    }

    /// Determines which child quadrant the point (x, y) belongs to.
    ///
    /// Ties are broken with the same half-open convention as [`contains`]:
    /// `x >= cx` selects the eastern half, `y >= cy` the northern half, so
    /// no position is ambiguous.
    ///
    /// [`contains`]: Quad::contains
    pub fn quadrant_of(&self, x: f64, y: f64) -> usize {
        let is_east = x >= self.cx;
        let is_north = y >= self.cy;

        match (is_north, is_east) {
            (true, false) => NW,
            (true, true) => NE,
            (false, false) => SW,
            (false, true) => SE,
        }
    }
}

/// The content of a cell: exactly one of empty, a single body, co-located
/// bodies at the depth limit, or four children.
///
/// Making the leaf/internal distinction a tagged variant keeps the tree
/// shape invariant a type-level guarantee rather than a runtime convention.
#[derive(Debug, Clone)]
pub enum CellContent<'a> {
    /// An empty leaf.
    Empty,
    /// A leaf holding exactly one body.
    Body(&'a Body),
    /// A leaf at the maximum depth holding two or more bodies whose
    /// positions could not be separated by further splitting.
    Colocated(Vec<&'a Body>),
    /// An internal cell with four children covering the NW, NE, SW, SE
    /// quadrants of its bounding square.
    Children([CellId; 4]),
}

/// A node of the quadtree: one square region plus its aggregated mass data.
///
/// The aggregated fields (`total_mass`, weighted position sum) are only
/// meaningful after the tree-wide aggregation pass has run.
#[derive(Debug, Clone)]
pub struct Cell<'a> {
    /// Depth level, with the root at level 0.
    pub level: usize,
    /// Bounding square of this cell.
    pub quad: Quad,
    /// What this cell directly holds.
    pub content: CellContent<'a>,
    /// Total mass of all bodies in the subtree rooted here.
    pub(crate) mass: f64,
    /// Sum of `position * mass` over the subtree; divide by `mass` to get
    /// the center of mass.
    pub(crate) weighted: (f64, f64),
}

impl<'a> Cell<'a> {
    pub(crate) fn new(quad: Quad, level: usize) -> Self {
        Cell {
            level,
            quad,
            content: CellContent::Empty,
            mass: 0.0,
            weighted: (0.0, 0.0),
        }
    }

    /// Returns true if this cell holds no children (it may still hold a body).
    pub fn is_leaf(&self) -> bool {
        !matches!(self.content, CellContent::Children(_))
    }

    /// Returns true if this cell is a leaf holding no body at all.
    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// Total mass of the subtree rooted here; valid after aggregation.
    pub fn total_mass(&self) -> f64 {
        self.mass
    }

    /// Center of mass of the subtree rooted here; valid after aggregation.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtree's total mass is zero, in which case
    /// the center of mass is mathematically undefined.
    pub fn center_of_mass(&self) -> Result<(f64, f64), QuadtreeError> {
        if self.mass == 0.0 {
            return Err(QuadtreeError::EmptyRegionCenterOfMass);
        }
        Ok((self.weighted.0 / self.mass, self.weighted.1 / self.mass))
    }
}
