//! The arena: bounds, goal and obstacles shared by every agent of a run.

use geo::Point;

use super::geometric_utils::inside_open_box;
use super::obstacle::{self, Obstacle};
use super::params::Params;

/// Field the population navigates.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Width of the field along x.
    pub width: f32,
    /// Height of the field along y.
    pub height: f32,
    /// Point every agent is steered towards.
    pub goal: Point<f32>,
    /// Obstacles, fixed for the whole run.
    pub obstacles: Vec<Obstacle>,
}

impl Field {
    /// Creates an empty field.
    pub fn new(width: f32, height: f32, goal: Point<f32>) -> Self {
        Self {
            width,
            height,
            goal,
            obstacles: Vec::new(),
        }
    }

    /// Creates the field described by `params`.
    pub fn from_params(params: &Params) -> Self {
        Self {
            width: params.width,
            height: params.height,
            goal: params.goal,
            obstacles: params.obstacles.clone(),
        }
    }

    /// Adds an obstacle spanning two opposite corners.
    pub fn add_obstacle(&mut self, a: Point<f32>, b: Point<f32>) {
        self.obstacles.push(Obstacle::from_corners(a, b));
    }

    /// Checks whether `p` is strictly inside the field bounds.
    pub fn in_bounds(&self, p: &Point<f32>) -> bool {
        inside_open_box(p, self.width, self.height)
    }

    /// Checks whether `p` is strictly inside any obstacle.
    pub fn collides(&self, p: &Point<f32>) -> bool {
        obstacle::hits_any(&self.obstacles, p)
    }
}
