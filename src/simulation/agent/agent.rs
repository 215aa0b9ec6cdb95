//! Agent state, decision and kinematics.

use geo::{Coord, Point};
use log::trace;
use ndarray::Array1;
use rand::Rng;

use super::super::brain::{self, NeuralNetwork};
use super::super::error::SimulationError;
use super::super::field::Field;
use super::super::geometric_utils;
use super::super::obstacle::{self, Obstacle};
use super::super::params::Params;
use super::perception::Perception;

/// Number of network outputs an agent consumes: acceleration deltas along x and y.
pub const ACTION_SIZE: usize = 2;

/// A point agent steered by a neural network.
///
/// Once `dead` is set the agent no longer moves or senses for the rest of
/// the epoch, but it is still scored.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Index of the agent within its generation.
    pub id: usize,
    /// Position in the field.
    pub position: Point<f32>,
    /// Velocity, added to the position every step.
    pub velocity: Coord<f32>,
    /// Acceleration, added to the velocity every step.
    pub acceleration: Coord<f32>,
    /// Set on leaving the field or entering an obstacle.
    pub dead: bool,
    /// Network that controls the acceleration.
    pub network: NeuralNetwork,
}

impl Agent {
    /// Creates a live agent with explicit kinematic state.
    pub fn new(
        id: usize,
        position: Point<f32>,
        velocity: Coord<f32>,
        acceleration: Coord<f32>,
        network: NeuralNetwork,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration,
            dead: false,
            network,
        }
    }

    /// Creates an agent at the spawn state described by `params`.
    pub fn spawn(id: usize, params: &Params, network: NeuralNetwork) -> Self {
        Self::new(
            id,
            params.spawn_position,
            params.spawn_velocity.0,
            params.spawn_acceleration.0,
            network,
        )
    }

    /// Creates an agent at the spawn state with a freshly drawn network.
    pub fn new_random<R: Rng + ?Sized>(
        id: usize,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let network = NeuralNetwork::new_random(params.layer_sizes.len(), &params.layer_sizes, rng)?;
        Ok(Self::spawn(id, params, network))
    }

    /// Checks if the agent is still moving.
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Marks the agent as dead, freezing its state.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Applies the network's reaction to raw sensory `inputs`.
    ///
    /// Inputs are squashed with a sigmoid, fed through the network, squashed
    /// again and shifted by `-0.5`. The two results are added to the current
    /// acceleration.
    pub fn decide(&mut self, inputs: &Array1<f32>) -> Result<(), SimulationError> {
        let outputs = self.network.activate(&brain::squash(inputs))?;
        if outputs.len() != ACTION_SIZE {
            return Err(SimulationError::OutputSizeMismatch {
                expected: ACTION_SIZE,
                actual: outputs.len(),
            });
        }

        let delta = brain::squash(&outputs) - 0.5;
        self.acceleration.x += delta[0];
        self.acceleration.y += delta[1];
        Ok(())
    }

    /// Integrates one step and kills the agent if it left the open field.
    ///
    /// Velocity is updated before position. Dead agents do not move.
    pub fn step(&mut self, width: f32, height: f32) {
        if self.dead {
            return;
        }
        self.velocity = self.velocity + self.acceleration;
        self.position = Point(self.position.0 + self.velocity);

        if !geometric_utils::inside_open_box(&self.position, width, height) {
            trace!("agent {} left the field at {:?}", self.id, self.position.x_y());
            self.dead = true;
        }
    }

    /// Kills the agent if it is strictly inside an obstacle.
    ///
    /// Returns whether a collision was detected.
    pub fn check_collision(&mut self, obstacles: &[Obstacle]) -> bool {
        let collided = obstacle::hits_any(obstacles, &self.position);
        if collided {
            trace!("agent {} hit an obstacle at {:?}", self.id, self.position.x_y());
            self.dead = true;
        }
        collided
    }

    /// Runs one tick: sense, decide, move, check for collisions.
    ///
    /// Does nothing for dead agents.
    pub fn update(&mut self, field: &Field, perception: &Perception) -> Result<(), SimulationError> {
        if self.dead {
            return Ok(());
        }
        let inputs = perception.perceive(self, field);
        self.decide(&inputs)?;
        self.step(field.width, field.height);
        self.check_collision(&field.obstacles);
        Ok(())
    }

    /// Distance to `goal`, plus `death_penalty` if the agent is dead.
    ///
    /// Lower is better.
    pub fn fitness(&self, goal: &Point<f32>, death_penalty: f32) -> f32 {
        let penalty = if self.dead { death_penalty } else { 0.0 };
        geometric_utils::distance(&self.position, goal) + penalty
    }

    /// Direction of travel in radians.
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    /// Speed (length of the velocity vector).
    pub fn speed(&self) -> f32 {
        self.velocity.x.hypot(self.velocity.y)
    }
}
