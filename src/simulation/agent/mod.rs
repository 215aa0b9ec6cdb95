//! Agent module containing agent behavior and perception systems.

mod agent;
mod goal;
mod perception;
mod sense;
mod vision;

pub use agent::*;

pub use goal::GoalOffset;
pub use perception::Perception;
pub use sense::Sense;
pub use vision::{DEFAULT_RAY_STEP, Ray, Vision, cast_ray};
