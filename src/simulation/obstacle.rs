//! Rectangular obstacles that kill agents and stop vision rays.

use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle.
///
/// Constructed from any two opposite corners; the corners are normalized so
/// `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Corners", into = "Corners")]
pub struct Obstacle {
    rect: Rect<f32>,
}

impl Obstacle {
    /// Creates an obstacle spanning two opposite corners.
    pub fn from_corners(a: Point<f32>, b: Point<f32>) -> Self {
        Self {
            rect: Rect::new(a, b),
        }
    }

    /// Corner with the smallest coordinates.
    pub fn min(&self) -> Point<f32> {
        self.rect.min().into()
    }

    /// Corner with the largest coordinates.
    pub fn max(&self) -> Point<f32> {
        self.rect.max().into()
    }

    /// Width along x.
    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    /// Height along y.
    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    /// Checks whether `p` is strictly between both corners on both axes.
    ///
    /// Points on an edge are outside.
    #[inline]
    pub fn contains(&self, p: &Point<f32>) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        min.x < p.x() && p.x() < max.x && min.y < p.y() && p.y() < max.y
    }
}

/// Checks whether `p` is inside any obstacle.
pub fn hits_any(obstacles: &[Obstacle], p: &Point<f32>) -> bool {
    obstacles.iter().any(|obstacle| obstacle.contains(p))
}

/// Serialized form: two corners, in any order.
#[derive(Serialize, Deserialize)]
struct Corners {
    min: Point<f32>,
    max: Point<f32>,
}

impl From<Corners> for Obstacle {
    fn from(corners: Corners) -> Self {
        Self::from_corners(corners.min, corners.max)
    }
}

impl From<Obstacle> for Corners {
    fn from(obstacle: Obstacle) -> Self {
        Self {
            min: obstacle.min(),
            max: obstacle.max(),
        }
    }
}
