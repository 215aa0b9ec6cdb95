//! Goal sense - per-axis offset between the agent and the goal.

use ndarray::Array1;

use super::super::field::Field;
use super::Agent;
use super::sense::Sense;

/// Outputs `|goal.x - x|` and `|goal.y - y|`.
///
/// The two axes are reported separately rather than as one Euclidean
/// distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalOffset;

impl GoalOffset {
    /// Creates a new goal sense.
    pub fn new() -> Self {
        Self
    }
}

impl Sense for GoalOffset {
    fn sense(&self, agent: &Agent, field: &Field) -> Array1<f32> {
        Array1::from_vec(vec![
            (field.goal.x() - agent.position.x()).abs(),
            (field.goal.y() - agent.position.y()).abs(),
        ])
    }

    fn input_size(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "GoalOffset"
    }
}
