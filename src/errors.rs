use std::error::Error;
use std::fmt;

/// Represents errors that can occur while building or querying the quadtree.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadtreeError {
    /// Indicates an invalid mass value (negative or non-finite).
    InvalidMass(f64),
    /// Indicates a non-finite position coordinate.
    NonFiniteCoordinate { x: f64, y: f64 },
    /// Indicates a particle position outside the tree's domain square.
    OutOfDomain { x: f64, y: f64 },
    /// Indicates a force query against a tree whose aggregates are stale
    /// (never computed, or invalidated by a later insertion).
    NotAggregated,
    /// Indicates a center-of-mass request on a cell with zero total mass.
    EmptyRegionCenterOfMass,
    /// Indicates that the fixed-capacity traversal stack overflowed.
    TraversalCapacityExceeded { capacity: usize },
    /// Indicates a non-positive (or NaN) opening-angle parameter.
    InvalidTheta(f64),
}

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuadtreeError::InvalidMass(m) => write!(f, "Invalid mass value: {}", m),
            QuadtreeError::NonFiniteCoordinate { x, y } => {
                write!(f, "Non-finite position coordinate: ({}, {})", x, y)
            }
            QuadtreeError::OutOfDomain { x, y } => {
                write!(f, "Particle position ({}, {}) lies outside the tree domain", x, y)
            }
            QuadtreeError::NotAggregated => {
                write!(f, "Tree aggregates are stale; call compute_aggregates() before querying")
            }
            QuadtreeError::EmptyRegionCenterOfMass => {
                write!(f, "Center of mass is undefined for a region with zero total mass")
            }
            QuadtreeError::TraversalCapacityExceeded { capacity } => {
                write!(f, "Traversal stack exceeded its fixed capacity of {}", capacity)
            }
            QuadtreeError::InvalidTheta(theta) => {
                write!(f, "Opening-angle parameter must be positive, got {}", theta)
            }
        }
    }
}

impl Error for QuadtreeError {}
