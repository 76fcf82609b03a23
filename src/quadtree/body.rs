use crate::errors::QuadtreeError;

/// A point mass in 2D space.
///
/// Bodies are owned by the caller and are immutable once created; the tree
/// only holds references to them.
///
/// # Examples
///
/// ```
/// use quadgrav::quadtree::Body;
///
/// let body = Body::new(0, 0.25, 0.75, 2.0).expect("valid body");
/// assert_eq!(body.mass, 2.0);
///
/// // Negative masses are rejected.
/// assert!(Body::new(1, 0.0, 0.0, -1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Caller-assigned identifier.
    pub id: u32,
    /// X coordinate of the position.
    pub x: f64,
    /// Y coordinate of the position.
    pub y: f64,
    /// Scalar mass, non-negative.
    pub mass: f64,
}

impl Body {
    /// Creates a new body.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass` is negative or non-finite, or if either
    /// coordinate is non-finite.
    pub fn new(id: u32, x: f64, y: f64, mass: f64) -> Result<Self, QuadtreeError> {
        if !mass.is_finite() || mass < 0.0 {
            return Err(QuadtreeError::InvalidMass(mass));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(QuadtreeError::NonFiniteCoordinate { x, y });
        }
        Ok(Body { id, x, y, mass })
    }

    /// Position as an `(x, y)` pair.
    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
