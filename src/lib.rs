//! # Evo-Nav - Evolved Navigators
//!
//! A population of point agents crosses a 2D field towards a goal while
//! avoiding rectangular obstacles. Every agent is steered by a small
//! feed-forward neural network whose weights evolve between generations.
//!
//! ## Features
//!
//! - Ray-marched vision (left, center and right of the heading)
//! - Fixed-topology feed-forward networks with positional crossover and
//!   multiplicative mutation
//! - Symplectic-Euler kinematics with out-of-bounds and obstacle deaths
//! - Truncation selection and all-pairs breeding
//! - Seedable, reproducible runs with tick-bounded epochs
//! - Real-time visualization with macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::agent`] - Agent state, senses and decisions
//! - [`simulation::epoch`] - Bounded simulation epochs
//! - [`simulation::evolution`] - Selection, breeding and the generation loop

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent state, perception and kinematics.
    pub mod agent;
    /// Neural network implementation for agent brains.
    pub mod brain;
    /// Epoch loop and epoch budgets.
    pub mod epoch;
    /// Error type of the crate.
    pub mod error;
    /// Ranking, selection, breeding and the run controller.
    pub mod evolution;
    /// Field bounds, goal and obstacles.
    pub mod field;
    /// Geometric utility functions for distance calculations.
    pub mod geometric_utils;
    /// Per-generation statistics.
    pub mod history;
    /// Rectangular obstacles.
    pub mod obstacle;
    /// Simulation parameters.
    pub mod params;
}
