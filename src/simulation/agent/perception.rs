//! Perception system that combines multiple senses into brain inputs.

use ndarray::Array1;

use super::super::field::Field;
use super::super::params::Params;
use super::Agent;
use super::goal::GoalOffset;
use super::sense::Sense;
use super::vision::Vision;

/// Manages multiple senses and combines them into brain inputs.
///
/// The perception system:
/// 1. Queries each sense for its outputs
/// 2. Concatenates all sensory outputs in order
/// 3. Returns a single input vector for the brain
pub struct Perception {
    /// Ordered list of senses that contribute to perception
    senses: Vec<Box<dyn Sense>>,
}

impl Perception {
    /// Creates a new perception system that queries `senses` in order.
    pub fn new(senses: Vec<Box<dyn Sense>>) -> Self {
        Self { senses }
    }

    /// Vision followed by the goal offset, configured from `params`.
    pub fn from_params(params: &Params) -> Self {
        Self::new(vec![
            Box::new(Vision::new(params.ray_step, params.fov_half_angle)),
            Box::new(GoalOffset::new()),
        ])
    }

    /// Process all senses and return combined brain inputs.
    pub fn perceive(&self, agent: &Agent, field: &Field) -> Array1<f32> {
        let mut combined_inputs = Vec::with_capacity(self.total_input_size());
        for sense in &self.senses {
            combined_inputs.extend(sense.sense(agent, field).iter().copied());
        }
        Array1::from_vec(combined_inputs)
    }

    /// Returns the total number of brain inputs produced by all senses.
    pub fn total_input_size(&self) -> usize {
        self.senses.iter().map(|s| s.input_size()).sum()
    }

    /// Returns a reference to the senses in this perception system.
    pub fn senses(&self) -> &[Box<dyn Sense>] {
        &self.senses
    }
}

impl Default for Perception {
    fn default() -> Self {
        Self::new(vec![Box::new(Vision::default()), Box::new(GoalOffset::new())])
    }
}
