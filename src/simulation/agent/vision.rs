//! Vision sense - lets agents measure free space ahead.
//!
//! Vision marches three rays from the agent through the field in fixed
//! steps until each ray enters an obstacle or leaves the field. A smaller
//! step gives more precise distances at a proportionally higher cost.

use std::f32::consts::{FRAC_PI_2, PI};

use geo::{Point, point};
use log::trace;
use ndarray::Array1;

use super::super::field::Field;
use super::super::geometric_utils::distance;
use super::Agent;
use super::sense::Sense;

/// Default distance along the marching axis covered by one ray step.
pub const DEFAULT_RAY_STEP: f32 = 0.5;

/// A ray to march, described by its per-step advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ray {
    /// Advances `step` along x and `slope * step` along y.
    Sloped {
        /// Rise over run.
        slope: f32,
        /// Signed advance along x.
        step: f32,
    },
    /// Advances `step` along y only.
    Vertical {
        /// Signed advance along y.
        step: f32,
    },
}

impl Ray {
    fn advance(self) -> (f32, f32) {
        match self {
            Ray::Sloped { slope, step } => (step, slope * step),
            Ray::Vertical { step } => (0.0, step),
        }
    }
}

/// Marches `ray` from `origin` and returns the first point that is inside an
/// obstacle or outside the open field.
///
/// The origin itself is tested first, so an origin that is already blocked
/// is returned unchanged.
pub fn cast_ray(origin: Point<f32>, ray: Ray, field: &Field) -> Point<f32> {
    let (dx, dy) = ray.advance();
    let mut current = origin;
    while field.in_bounds(&current) && !field.collides(&current) {
        let next = point! { x: current.x() + dx, y: current.y() + dy };
        if next == current {
            // Step below float resolution at this coordinate.
            break;
        }
        current = next;
    }
    current
}

/// Vision sense casting a left, center and right ray around the heading.
///
/// Outputs, in order, the distance from the agent to the hit point of the
/// left, center and right ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vision {
    /// Magnitude of one march step.
    pub ray_step: f32,
    /// Angle between the center ray and each side ray.
    pub half_angle: f32,
}

impl Vision {
    /// Creates a vision sense.
    pub fn new(ray_step: f32, half_angle: f32) -> Self {
        Self {
            ray_step,
            half_angle,
        }
    }

    /// Builds the left, center and right rays for the agent's velocity.
    ///
    /// The heading is `atan(vy / vx)` and all rays march along the sign of
    /// `vx`. A side slope is mirrored when its angle crosses ±π/2 so it stays
    /// on the agent's side of the vertical. With `vx == 0` the heading is
    /// ±π/2 following the sign of `vy`, the center ray is vertical and the
    /// side rays march towards positive x, matching the `vx -> 0+` limit.
    pub fn rays(&self, agent: &Agent) -> [Ray; 3] {
        let (vx, vy) = (agent.velocity.x, agent.velocity.y);
        let step = if vx >= 0.0 { self.ray_step } else { -self.ray_step };

        let (heading, center) = if vx == 0.0 {
            let up = vy >= 0.0;
            (
                if up { FRAC_PI_2 } else { -FRAC_PI_2 },
                Ray::Vertical {
                    step: if up { self.ray_step } else { -self.ray_step },
                },
            )
        } else {
            let slope = vy / vx;
            (slope.atan(), Ray::Sloped { slope, step })
        };

        let mut left = (heading - self.half_angle).tan();
        if heading - self.half_angle < -FRAC_PI_2 {
            left = -left;
        }
        let mut right = (heading + self.half_angle).tan();
        if heading + self.half_angle > FRAC_PI_2 {
            right = -right;
        }

        [
            Ray::Sloped { slope: left, step },
            center,
            Ray::Sloped { slope: right, step },
        ]
    }

    /// Hit points of the left, center and right rays.
    pub fn hit_points(&self, agent: &Agent, field: &Field) -> [Point<f32>; 3] {
        self.rays(agent)
            .map(|ray| cast_ray(agent.position, ray, field))
    }
}

impl Default for Vision {
    fn default() -> Self {
        Self::new(DEFAULT_RAY_STEP, PI / 8.0)
    }
}

impl Sense for Vision {
    fn sense(&self, agent: &Agent, field: &Field) -> Array1<f32> {
        let distances = self
            .hit_points(agent, field)
            .map(|hit| distance(&agent.position, &hit));
        trace!("agent {} ray distances {:?}", agent.id, distances);
        Array1::from_vec(distances.to_vec())
    }

    fn input_size(&self) -> usize {
        3
    }

    fn name(&self) -> &'static str {
        "Vision"
    }
}
