use std::path::Path;
use std::time::Duration;

use geo::{Point, point};
use serde::{Deserialize, Serialize};

use super::agent::{ACTION_SIZE, Perception};
use super::brain::Mutation;
use super::error::SimulationError;
use super::obstacle::Obstacle;

/// Simulation parameters that control a run.
///
/// Missing fields in a JSON file fall back to [`Params::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Field width.
    pub width: f32,
    /// Field height.
    pub height: f32,
    /// Point agents are scored against.
    pub goal: Point<f32>,
    /// Obstacles present from the start of the run.
    pub obstacles: Vec<Obstacle>,
    /// Size of the first, randomly initialized population.
    pub n_agents: usize,
    /// Neural network layer dimensions.
    pub layer_sizes: Vec<usize>,
    /// Number of agents kept for breeding after each epoch.
    pub survivors: usize,
    /// Maximum number of offspring per generation.
    pub max_offspring: usize,
    /// Wall-clock length of one epoch in seconds.
    pub epoch_seconds: f32,
    /// Position every new agent starts at.
    pub spawn_position: Point<f32>,
    /// Velocity every new agent starts with.
    pub spawn_velocity: Point<f32>,
    /// Acceleration every new agent starts with.
    pub spawn_acceleration: Point<f32>,
    /// Fitness added to agents that are dead at the end of the epoch.
    pub death_penalty: f32,
    /// Distance along x covered by one ray-march step.
    pub ray_step: f32,
    /// Angle between the center ray and each side ray, in radians.
    pub fov_half_angle: f32,
    /// Mutation events applied to every offspring.
    pub mutation_events: usize,
    /// Bound of the multiplicative mutation factor.
    pub mutation_factor: f32,
    /// Seed for all randomness of the run. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 700.0,
            goal: point! { x: 550.0, y: 450.0 },
            obstacles: Vec::new(),
            n_agents: 30,
            layer_sizes: vec![5, 4, 4, 4, 2],
            survivors: 10,
            max_offspring: 50,
            epoch_seconds: 10.0,
            spawn_position: point! { x: 50.0, y: 50.0 },
            spawn_velocity: point! { x: 0.01, y: 0.01 },
            spawn_acceleration: point! { x: 0.01, y: 0.01 },
            death_penalty: 1000.0,
            ray_step: 0.5,
            fov_half_angle: std::f32::consts::PI / 8.0,
            mutation_events: 3,
            mutation_factor: 2.0,
            seed: None,
        }
    }
}

impl Params {
    /// Mutation settings for offspring networks.
    pub fn mutation(&self) -> Mutation {
        Mutation {
            events: self.mutation_events,
            max_factor: self.mutation_factor,
        }
    }

    /// Wall-clock length of one epoch.
    ///
    /// Lengths [`Self::validate`] rejects saturate to zero or [`Duration::MAX`].
    pub fn epoch_length(&self) -> Duration {
        let saturated = if self.epoch_seconds > 0.0 {
            Duration::MAX
        } else {
            Duration::ZERO
        };
        Duration::try_from_secs_f32(self.epoch_seconds).unwrap_or(saturated)
    }

    /// Checks that the parameters describe a runnable simulation.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |msg: String| -> Result<(), SimulationError> {
            Err(SimulationError::InvalidParams(msg))
        };

        if self.width <= 0.0 || self.height <= 0.0 {
            return invalid(format!(
                "field must have a positive size, got {}x{}",
                self.width, self.height
            ));
        }
        if !(0.0..=self.width).contains(&self.goal.x())
            || !(0.0..=self.height).contains(&self.goal.y())
        {
            return invalid(format!("goal {:?} lies outside the field", self.goal.x_y()));
        }
        if self.layer_sizes.is_empty() || self.layer_sizes.contains(&0) {
            return invalid(format!(
                "layer sizes {:?} must be non-empty and positive",
                self.layer_sizes
            ));
        }
        let inputs = Perception::default().total_input_size();
        if self.layer_sizes[0] != inputs {
            return invalid(format!(
                "first layer must have {inputs} neurons, got {}",
                self.layer_sizes[0]
            ));
        }
        let outputs = self.layer_sizes[self.layer_sizes.len() - 1];
        if outputs != ACTION_SIZE {
            return invalid(format!(
                "last layer must have {ACTION_SIZE} neurons, got {outputs}"
            ));
        }
        if self.n_agents == 0 || self.survivors == 0 || self.max_offspring == 0 {
            return invalid("population, survivor and offspring counts must be positive".into());
        }
        if self.ray_step <= 0.0 || self.epoch_seconds <= 0.0 {
            return invalid("ray step and epoch length must be positive".into());
        }
        if let Err(e) = Duration::try_from_secs_f32(self.epoch_seconds) {
            return invalid(format!("epoch length {} s: {e}", self.epoch_seconds));
        }
        if self.mutation_factor < 0.0 {
            return invalid("mutation factor must not be negative".into());
        }
        Ok(())
    }

    /// Parses and validates parameters from JSON.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads and validates parameters from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Pretty-printed JSON, suitable as an example configuration.
    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
