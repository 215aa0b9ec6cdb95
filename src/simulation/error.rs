//! Error type shared by the simulation, the network and the configuration layer.

/// Errors raised when a precondition of the simulation is violated.
///
/// Agent deaths and numeric saturation are not errors; they are recorded as
/// agent state or degraded locally.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A layer definition that cannot describe a network.
    #[error("invalid topology {layer_sizes:?} for {layer_count} layers: {reason}")]
    InvalidTopology {
        /// Requested number of layers.
        layer_count: usize,
        /// Requested neuron count per layer.
        layer_sizes: Vec<usize>,
        /// What is wrong with the request.
        reason: &'static str,
    },
    /// Two networks with different layer definitions were crossed.
    #[error("cannot cross networks with layer definitions {left:?} and {right:?}")]
    TopologyMismatch {
        /// Layer definition of the first parent.
        left: Vec<usize>,
        /// Layer definition of the second parent.
        right: Vec<usize>,
    },
    /// An input vector whose length differs from the first layer.
    #[error("network expects {expected} inputs, got {actual}")]
    InputSizeMismatch {
        /// Size of the first layer.
        expected: usize,
        /// Length of the supplied input.
        actual: usize,
    },
    /// A network whose output cannot drive an agent.
    #[error("agent control needs {expected} network outputs, got {actual}")]
    OutputSizeMismatch {
        /// Outputs consumed by the agent.
        expected: usize,
        /// Size of the network's last layer.
        actual: usize,
    },
    /// Parameters rejected by [`crate::simulation::params::Params::validate`].
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A configuration or history file could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
