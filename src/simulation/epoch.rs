//! One bounded simulation epoch over a population.
//!
//! An epoch ends when every agent is dead or when its [`EpochBudget`]
//! expires. The budget is polled once per tick, so a wall-clock budget is a
//! coarse bound rather than a precise deadline.

use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, Perception};
use super::error::SimulationError;
use super::field::Field;

/// Decides when a running epoch has used up its time.
pub trait EpochBudget {
    /// Returns `true` once the epoch must stop. Polled before every tick.
    fn expired(&mut self) -> bool;
}

/// Wall-clock budget: expires once a fixed duration has passed.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    /// `None` when the limit lies beyond what [`Instant`] can represent.
    deadline: Option<Instant>,
}

impl WallClock {
    /// Starts a budget of `limit` from now.
    pub fn starting_now(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
        }
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.map_or(Duration::MAX, |deadline| {
            deadline.saturating_duration_since(Instant::now())
        })
    }
}

impl EpochBudget for WallClock {
    fn expired(&mut self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Tick-count budget: expires after a fixed number of ticks.
///
/// Reproducible, so tests and seeded runs use it instead of [`WallClock`].
#[derive(Debug, Clone, Copy)]
pub struct TickLimit {
    remaining: u64,
}

impl TickLimit {
    /// Allows `ticks` ticks.
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }
}

impl EpochBudget for TickLimit {
    fn expired(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Why an epoch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochEnd {
    /// Every agent died.
    AllDead,
    /// The budget expired with agents still alive.
    BudgetExpired,
}

/// Result of [`run_epoch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochOutcome {
    /// Ticks executed.
    pub ticks: u64,
    /// Agents alive when the epoch stopped.
    pub alive: usize,
    /// Why the epoch stopped.
    pub end: EpochEnd,
}

/// Updates every live agent once, in order.
///
/// Returns the number of agents still alive afterwards.
pub fn tick(
    agents: &mut [Agent],
    field: &Field,
    perception: &Perception,
) -> Result<usize, SimulationError> {
    for agent in agents.iter_mut() {
        agent.update(field, perception)?;
    }
    Ok(agents.iter().filter(|agent| agent.is_alive()).count())
}

/// Ticks the population until everyone is dead or `budget` expires.
pub fn run_epoch<B: EpochBudget + ?Sized>(
    agents: &mut [Agent],
    field: &Field,
    perception: &Perception,
    budget: &mut B,
) -> Result<EpochOutcome, SimulationError> {
    let mut alive = agents.iter().filter(|agent| agent.is_alive()).count();
    let mut ticks = 0;

    while alive > 0 {
        if budget.expired() {
            debug!("epoch budget expired after {ticks} ticks with {alive} agents alive");
            return Ok(EpochOutcome {
                ticks,
                alive,
                end: EpochEnd::BudgetExpired,
            });
        }
        alive = tick(agents, field, perception)?;
        ticks += 1;
    }

    debug!("all agents dead after {ticks} ticks");
    Ok(EpochOutcome {
        ticks,
        alive,
        end: EpochEnd::AllDead,
    })
}
