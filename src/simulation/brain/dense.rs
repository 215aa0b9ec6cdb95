//! Fully connected block between two adjacent layers.

use ndarray::{Array1, Array2};
use rand::Rng;

/// Outgoing weights of every neuron in one layer.
///
/// Row `j` holds the weights of source neuron `j`, one per target neuron of
/// the next layer, so iterating the matrix in logical order visits
/// (neuron, weight-index) pairs in the order crossover relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    /// Weight matrix (`input_size` × `output_size`).
    pub weights: Array2<f32>,
}

impl Dense {
    /// Creates a block with independent uniform weights in `[-scale, scale]`.
    pub fn new_random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            weights: Array2::from_shape_simple_fn((input_size, output_size), || {
                rng.random_range(-scale..=scale)
            }),
        }
    }

    /// Number of source neurons.
    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of target neurons.
    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Feeds fully summed source accumulators into the next layer.
    ///
    /// Each target receives `sum_j weight[j][k] * accumulator[j]`. No
    /// activation is applied.
    #[inline]
    pub fn forward(&self, accumulators: &Array1<f32>) -> Array1<f32> {
        self.weights.t().dot(accumulators)
    }
}
