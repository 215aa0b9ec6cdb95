//! Geometric utility functions for distance calculations and bounds tests.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};

/// Euclidean distance between two points.
pub fn distance(a: &Point<f32>, b: &Point<f32>) -> f32 {
    Euclidean.distance(*a, *b)
}

/// Checks whether a point lies strictly inside `(0, width) × (0, height)`.
///
/// Touching an edge counts as outside.
pub fn inside_open_box(p: &Point<f32>, width: f32, height: f32) -> bool {
    p.x() > 0.0 && p.x() < width && p.y() > 0.0 && p.y() < height
}
