//! Feed-forward neural network steering each agent.
//!
//! The network is a fixed-topology stack of fully connected layers without
//! internal nonlinearity. Every neuron of the output layer carries one extra
//! weight that scales its accumulator on the way out. Offspring networks are
//! produced by a half/half positional splice of two parents followed by a
//! fixed number of multiplicative mutation events.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimulationError;

pub mod dense;

pub use dense::Dense;

/// Range of freshly drawn weights, `[-INIT_SCALE, INIT_SCALE]`.
pub const INIT_SCALE: f32 = 1.0;

/// Logistic function with an explicit overflow guard.
///
/// When `e^-x` would overflow `f32` the element saturates to `1.0` instead of
/// producing an infinity.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    if -x > f32::MAX.ln() {
        return 1.0;
    }
    1.0 / (1.0 + (-x).exp())
}

/// Applies [`sigmoid`] element-wise.
pub fn squash(values: &Array1<f32>) -> Array1<f32> {
    values.mapv(sigmoid)
}

/// Address of one weight: layer, neuron within the layer, weight on the neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightSlot {
    /// Layer index.
    pub layer: usize,
    /// Neuron index within the layer.
    pub neuron: usize,
    /// Weight index on the neuron (target index, or 0 for an output scale).
    pub index: usize,
}

/// Mutation applied after every crossover.
///
/// A fixed number of events, not a per-weight probability: each event picks a
/// layer, then a neuron, then one of its weights, each uniformly, and
/// multiplies that weight by a uniform factor in `[-max_factor, max_factor]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Number of mutation events per offspring.
    pub events: usize,
    /// Bound of the multiplicative factor.
    pub max_factor: f32,
}

impl Default for Mutation {
    fn default() -> Self {
        Self {
            events: 3,
            max_factor: 2.0,
        }
    }
}

/// Fully connected feed-forward network.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    /// Neuron count per layer.
    layer_definition: Vec<usize>,
    /// Connections from layer `i` to layer `i + 1`.
    connections: Vec<Dense>,
    /// Post-activation scale of each output neuron.
    output_scale: Array1<f32>,
}

impl NeuralNetwork {
    /// Creates a network with independent uniform weights in `[-1, 1]`.
    ///
    /// `layer_count` must equal `layer_sizes.len()` and every layer needs at
    /// least one neuron.
    pub fn new_random<R: Rng + ?Sized>(
        layer_count: usize,
        layer_sizes: &[usize],
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        check_definition(layer_count, layer_sizes)?;

        let connections = layer_sizes
            .windows(2)
            .map(|pair| Dense::new_random(pair[0], pair[1], INIT_SCALE, rng))
            .collect();
        let outputs = layer_sizes[layer_count - 1];
        let output_scale =
            Array1::from_shape_simple_fn(outputs, || rng.random_range(-INIT_SCALE..=INIT_SCALE));

        Ok(Self {
            layer_definition: layer_sizes.to_vec(),
            connections,
            output_scale,
        })
    }

    /// Builds a network from explicit weights.
    ///
    /// `connections[i]` must be `layer_sizes[i]` × `layer_sizes[i + 1]` and
    /// `output_scale` must match the last layer.
    pub fn from_weights(
        layer_sizes: &[usize],
        connections: Vec<Array2<f32>>,
        output_scale: Array1<f32>,
    ) -> Result<Self, SimulationError> {
        check_definition(layer_sizes.len(), layer_sizes)?;

        let shapes_match = connections.len() + 1 == layer_sizes.len()
            && connections
                .iter()
                .zip(layer_sizes.windows(2))
                .all(|(weights, pair)| weights.dim() == (pair[0], pair[1]))
            && output_scale.len() == layer_sizes[layer_sizes.len() - 1];
        if !shapes_match {
            return Err(SimulationError::InvalidTopology {
                layer_count: layer_sizes.len(),
                layer_sizes: layer_sizes.to_vec(),
                reason: "weight shapes do not match the layer sizes",
            });
        }

        Ok(Self {
            layer_definition: layer_sizes.to_vec(),
            connections: connections
                .into_iter()
                // Re-layout so logical iteration order is the slot order.
                .map(|weights| Dense {
                    weights: weights.as_standard_layout().into_owned(),
                })
                .collect(),
            output_scale,
        })
    }

    /// Neuron count per layer.
    pub fn layer_definition(&self) -> &[usize] {
        &self.layer_definition
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layer_definition.len()
    }

    /// Size of the first layer.
    pub fn input_size(&self) -> usize {
        self.layer_definition[0]
    }

    /// Size of the last layer.
    pub fn output_size(&self) -> usize {
        self.layer_definition[self.layer_count() - 1]
    }

    /// Number of weights held by each neuron of `layer`.
    pub fn weights_per_neuron(&self, layer: usize) -> usize {
        if layer + 1 < self.layer_count() {
            self.layer_definition[layer + 1]
        } else {
            1
        }
    }

    /// Total number of weight slots.
    pub fn weight_count(&self) -> usize {
        (0..self.layer_count())
            .map(|layer| self.layer_definition[layer] * self.weights_per_neuron(layer))
            .sum()
    }

    /// Returns the weight stored in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is outside the topology.
    pub fn weight(&self, slot: WeightSlot) -> f32 {
        if slot.layer + 1 < self.layer_count() {
            self.connections[slot.layer].weights[[slot.neuron, slot.index]]
        } else {
            assert_eq!(slot.index, 0, "output neurons hold a single scale weight");
            self.output_scale[slot.neuron]
        }
    }

    fn weight_mut(&mut self, slot: WeightSlot) -> &mut f32 {
        if slot.layer + 1 < self.layer_count() {
            &mut self.connections[slot.layer].weights[[slot.neuron, slot.index]]
        } else {
            &mut self.output_scale[slot.neuron]
        }
    }

    /// Flattens all weights in slot order: layers in order, neurons in order,
    /// outgoing weights by target index, output scales last.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.weight_count());
        for block in &self.connections {
            flat.extend(block.weights.iter().copied());
        }
        flat.extend(self.output_scale.iter().copied());
        flat
    }

    /// Runs one forward pass.
    ///
    /// The input is loaded into the first layer, and every layer is fully
    /// summed before it feeds the next one. Returns the accumulator of each
    /// output neuron multiplied by its scale weight.
    pub fn activate(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, SimulationError> {
        if inputs.len() != self.input_size() {
            return Err(SimulationError::InputSizeMismatch {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }

        let mut accumulators = inputs.clone();
        for block in &self.connections {
            accumulators = block.forward(&accumulators);
        }
        Ok(accumulators * &self.output_scale)
    }

    /// Positional splice of two parents without mutation.
    ///
    /// With `T` weight slots, slot `c` (0-based, in [`Self::to_flat_vector`]
    /// order) is copied from `parent_b` while `c <= T / 2` and from `parent_a`
    /// afterwards.
    pub fn splice(parent_a: &Self, parent_b: &Self) -> Result<Self, SimulationError> {
        if parent_a.layer_definition != parent_b.layer_definition {
            return Err(SimulationError::TopologyMismatch {
                left: parent_a.layer_definition.clone(),
                right: parent_b.layer_definition.clone(),
            });
        }

        let total = parent_a.weight_count();
        let mut slot = 0usize;
        let mut pick = |from_a: f32, from_b: f32| {
            let value = if 2 * slot <= total { from_b } else { from_a };
            slot += 1;
            value
        };

        let mut child = parent_a.clone();
        for ((block, block_a), block_b) in child
            .connections
            .iter_mut()
            .zip(&parent_a.connections)
            .zip(&parent_b.connections)
        {
            for ((weight, &a), &b) in block
                .weights
                .iter_mut()
                .zip(block_a.weights.iter())
                .zip(block_b.weights.iter())
            {
                *weight = pick(a, b);
            }
        }
        for ((scale, &a), &b) in child
            .output_scale
            .iter_mut()
            .zip(parent_a.output_scale.iter())
            .zip(parent_b.output_scale.iter())
        {
            *scale = pick(a, b);
        }

        Ok(child)
    }

    /// Creates an offspring network: [`Self::splice`] followed by [`Self::mutate`].
    pub fn crossover<R: Rng + ?Sized>(
        parent_a: &Self,
        parent_b: &Self,
        mutation: &Mutation,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let mut child = Self::splice(parent_a, parent_b)?;
        child.mutate(mutation, rng);
        Ok(child)
    }

    /// Applies `mutation.events` multiplicative mutation events.
    pub fn mutate<R: Rng + ?Sized>(&mut self, mutation: &Mutation, rng: &mut R) {
        for _ in 0..mutation.events {
            let layer = rng.random_range(0..self.layer_count());
            let neuron = rng.random_range(0..self.layer_definition[layer]);
            let index = rng.random_range(0..self.weights_per_neuron(layer));
            let factor = rng.random_range(-mutation.max_factor..=mutation.max_factor);
            *self.weight_mut(WeightSlot {
                layer,
                neuron,
                index,
            }) *= factor;
        }
    }

    /// Euclidean distance between the weights of two same-shaped networks.
    ///
    /// Returns `f32::MAX` for different topologies.
    pub fn distance(net1: &Self, net2: &Self) -> f32 {
        if net1.layer_definition != net2.layer_definition {
            return f32::MAX;
        }
        net1.to_flat_vector()
            .iter()
            .zip(net2.to_flat_vector())
            .map(|(w1, w2)| (w1 - w2).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

fn check_definition(layer_count: usize, layer_sizes: &[usize]) -> Result<(), SimulationError> {
    let reason = if layer_count == 0 {
        "at least one layer is required"
    } else if layer_sizes.len() != layer_count {
        "layer count does not match the number of layer sizes"
    } else if layer_sizes.contains(&0) {
        "every layer needs at least one neuron"
    } else {
        return Ok(());
    };
    Err(SimulationError::InvalidTopology {
        layer_count,
        layer_sizes: layer_sizes.to_vec(),
        reason,
    })
}
