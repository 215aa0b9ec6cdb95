//! Selection, breeding and the generation loop.
//!
//! After every epoch the population is ranked by fitness (distance to the
//! goal plus a death penalty, lower is better), the best `k` survive, and
//! the next generation is bred from every ordered survivor pair.

use geo::Point;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::agent::{Agent, Perception};
use super::brain::NeuralNetwork;
use super::epoch::{self, EpochBudget, EpochEnd, EpochOutcome};
use super::error::SimulationError;
use super::field::Field;
use super::history::{GenerationSummary, History};
use super::params::Params;

/// An agent paired with its end-of-epoch fitness.
#[derive(Debug, Clone)]
pub struct Ranked {
    /// The scored agent.
    pub agent: Agent,
    /// Distance to the goal plus the death penalty.
    pub fitness: f32,
}

/// Scores every agent and sorts ascending by fitness.
///
/// The sort is stable: agents with equal fitness keep their order.
pub fn rank(agents: Vec<Agent>, goal: &Point<f32>, death_penalty: f32) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = agents
        .into_iter()
        .map(|agent| {
            let fitness = agent.fitness(goal, death_penalty);
            Ranked { agent, fitness }
        })
        .collect();
    ranked.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    ranked
}

/// Returns the `k` fittest agents, best first.
///
/// Returns the whole population when it has fewer than `k` agents.
pub fn select_top(
    agents: Vec<Agent>,
    goal: &Point<f32>,
    death_penalty: f32,
    k: usize,
) -> Vec<Ranked> {
    let mut ranked = rank(agents, goal, death_penalty);
    ranked.truncate(k);
    ranked
}

/// Parent index pairs in breeding order for `m` survivors.
///
/// For each `a`: every `(a, b)` with `b` in `0..m`, self-pair included,
/// then one extra `(a, a)`. Yields `m * m + m` pairs.
pub fn breeding_pairs(m: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..m).flat_map(move |a| (0..m).map(move |b| (a, b)).chain(std::iter::once((a, a))))
}

/// Breeds up to `max_offspring` agents from `survivors`.
///
/// Offspring follow [`breeding_pairs`] order; pairs past `max_offspring` are
/// not bred. Every offspring starts from the spawn state in `params`.
pub fn breed<R: Rng + ?Sized>(
    survivors: &[Agent],
    max_offspring: usize,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Agent>, SimulationError> {
    let mutation = params.mutation();
    let offspring = breeding_pairs(survivors.len())
        .take(max_offspring)
        .enumerate()
        .map(|(id, (a, b))| -> Result<Agent, SimulationError> {
            let network = NeuralNetwork::crossover(
                &survivors[a].network,
                &survivors[b].network,
                &mutation,
                &mut *rng,
            )?;
            Ok(Agent::spawn(id, params, network))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if offspring.len() < max_offspring {
        warn!(
            "{} survivors only yield {} of {} requested offspring",
            survivors.len(),
            offspring.len(),
            max_offspring
        );
    }
    Ok(offspring)
}

/// When [`EvolutionRunner::run`] stops.
///
/// The run stops as soon as any configured condition holds. A generation
/// limit is always required, since a fitness target alone may never be
/// reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StopCondition {
    /// Stop after this many generations.
    pub max_generations: Option<u32>,
    /// Stop once a generation's best fitness is at or below this value.
    pub target_fitness: Option<f32>,
}

impl StopCondition {
    /// Stops after `n` generations.
    pub fn generations(n: u32) -> Self {
        Self {
            max_generations: Some(n),
            target_fitness: None,
        }
    }

    /// Adds a fitness target to the condition.
    #[must_use]
    pub fn or_fitness(mut self, target: f32) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Whether the condition guarantees termination, i.e. a generation
    /// limit is set.
    pub fn is_bounded(&self) -> bool {
        self.max_generations.is_some()
    }

    /// Checks the condition after `completed` generations.
    pub fn should_stop(&self, completed: u32, latest: Option<&GenerationSummary>) -> bool {
        let generations_done = self.max_generations.is_some_and(|max| completed >= max);
        let target_reached = match (self.target_fitness, latest) {
            (Some(target), Some(summary)) => summary.best_fitness <= target,
            _ => false,
        };
        generations_done || target_reached
    }
}

/// Owns a whole evolution run: field, population, randomness and history.
pub struct EvolutionRunner {
    params: Params,
    field: Field,
    perception: Perception,
    agents: Vec<Agent>,
    generation: u32,
    seed: u64,
    rng: StdRng,
    history: History,
}

impl EvolutionRunner {
    /// Creates a run on the field described by `params`.
    pub fn new(params: Params) -> Result<Self, SimulationError> {
        let field = Field::from_params(&params);
        Self::with_field(params, field)
    }

    /// Creates a run on an explicit field, e.g. one with obstacles placed
    /// interactively.
    pub fn with_field(params: Params, field: Field) -> Result<Self, SimulationError> {
        params.validate()?;

        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let agents = (0..params.n_agents)
            .map(|id| Agent::new_random(id, &params, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "starting run: seed {seed}, {} agents, topology {:?}, {} obstacles",
            agents.len(),
            params.layer_sizes,
            field.obstacles.len()
        );

        Ok(Self {
            perception: Perception::from_params(&params),
            params,
            field,
            agents,
            generation: 0,
            seed,
            rng,
            history: History::default(),
        })
    }

    /// Parameters of the run.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Field of the run.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Current population.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Index of the generation currently running.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Seed every random draw of the run derives from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Statistics of finished generations.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Agents of the current population still alive.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_alive()).count()
    }

    /// Outcome of an epoch driven tick by tick from outside, as the
    /// interactive viewer does, after `ticks` ticks.
    pub fn outcome_after(&self, ticks: u64) -> EpochOutcome {
        let alive = self.alive_count();
        EpochOutcome {
            ticks,
            alive,
            end: if alive == 0 {
                EpochEnd::AllDead
            } else {
                EpochEnd::BudgetExpired
            },
        }
    }

    /// Advances every live agent by one tick; returns the number still alive.
    pub fn tick(&mut self) -> Result<usize, SimulationError> {
        epoch::tick(&mut self.agents, &self.field, &self.perception)
    }

    /// Runs the current population until all are dead or `budget` expires.
    pub fn run_epoch<B: EpochBudget + ?Sized>(
        &mut self,
        budget: &mut B,
    ) -> Result<EpochOutcome, SimulationError> {
        epoch::run_epoch(&mut self.agents, &self.field, &self.perception, budget)
    }

    /// Scores the finished epoch, selects survivors and replaces the
    /// population with their offspring.
    pub fn evolve(&mut self, outcome: &EpochOutcome) -> Result<GenerationSummary, SimulationError> {
        let agents = std::mem::take(&mut self.agents);
        let population = agents.len();
        let alive = agents.iter().filter(|agent| agent.is_alive()).count();

        let mut ranked = rank(agents, &self.field.goal, self.params.death_penalty);
        let (best_fitness, worst_fitness) = match (ranked.first(), ranked.last()) {
            (Some(best), Some(worst)) => (best.fitness, worst.fitness),
            _ => (f32::NAN, f32::NAN),
        };
        let mean_fitness = ranked.iter().map(|r| r.fitness).sum::<f32>() / population.max(1) as f32;

        ranked.truncate(self.params.survivors);
        let survivors: Vec<Agent> = ranked.into_iter().map(|r| r.agent).collect();
        let survivor_spread = spread(&survivors);

        let offspring = breed(
            &survivors,
            self.params.max_offspring,
            &self.params,
            &mut self.rng,
        )?;
        debug!(
            "generation {}: bred {} offspring from {} survivors",
            self.generation,
            offspring.len(),
            survivors.len()
        );

        let summary = GenerationSummary {
            generation: self.generation,
            population,
            alive,
            ticks: outcome.ticks,
            end: outcome.end,
            best_fitness,
            mean_fitness,
            worst_fitness,
            survivor_spread,
            offspring: offspring.len(),
        };
        info!(
            "generation {}: best {:.1} mean {:.1} worst {:.1}, {}/{} alive after {} ticks ({:?})",
            summary.generation,
            summary.best_fitness,
            summary.mean_fitness,
            summary.worst_fitness,
            summary.alive,
            summary.population,
            summary.ticks,
            summary.end
        );

        self.agents = offspring;
        self.generation += 1;
        self.history.record(summary);
        Ok(summary)
    }

    /// Runs one epoch under `budget` and evolves the population.
    pub fn run_generation<B: EpochBudget + ?Sized>(
        &mut self,
        budget: &mut B,
    ) -> Result<GenerationSummary, SimulationError> {
        let outcome = self.run_epoch(budget)?;
        self.evolve(&outcome)
    }

    /// Runs generations until `stop` holds, with a fresh budget from
    /// `make_budget` for every epoch.
    pub fn run<B, F>(
        &mut self,
        stop: &StopCondition,
        mut make_budget: F,
    ) -> Result<&History, SimulationError>
    where
        B: EpochBudget,
        F: FnMut() -> B,
    {
        if !stop.is_bounded() {
            return Err(SimulationError::InvalidParams(
                "stop condition needs a generation limit".into(),
            ));
        }

        let mut completed = 0;
        while !stop.should_stop(completed, self.history.latest()) {
            let mut budget = make_budget();
            self.run_generation(&mut budget)?;
            completed += 1;
        }
        Ok(&self.history)
    }
}

/// Mean weight distance from the first survivor to each of the others.
fn spread(survivors: &[Agent]) -> f32 {
    match survivors.split_first() {
        Some((best, rest)) if !rest.is_empty() => {
            rest.iter()
                .map(|other| NeuralNetwork::distance(&best.network, &other.network))
                .sum::<f32>()
                / rest.len() as f32
        }
        _ => 0.0,
    }
}
