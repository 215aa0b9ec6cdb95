//! Abstract sense trait for agent perception.
//!
//! Senses collect information from the field and convert it into
//! neural network inputs for the agent's brain.

use ndarray::Array1;

use super::super::field::Field;
use super::Agent;

/// Trait for the sensory modalities an agent perceives its field with.
///
/// Each sense returns raw, unsquashed values; squashing happens in
/// [`Agent::decide`].
pub trait Sense {
    /// Process sensory information and return neural network inputs.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent doing the sensing
    /// * `field` - Bounds, goal and obstacles of the run
    ///
    /// # Returns
    ///
    /// A 1D array of length [`Sense::input_size`].
    fn sense(&self, agent: &Agent, field: &Field) -> Array1<f32>;

    /// Returns the number of neural network inputs this sense produces.
    fn input_size(&self) -> usize;

    /// Returns a human-readable name for this sense.
    fn name(&self) -> &str;
}
