//! Per-generation statistics of a run.
//!
//! Only fitness statistics are kept. Networks are never written out.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::epoch::EpochEnd;
use super::error::SimulationError;

/// Statistics of one finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation index, starting at 0.
    pub generation: u32,
    /// Number of agents that ran the epoch.
    pub population: usize,
    /// Agents still alive at the end of the epoch.
    pub alive: usize,
    /// Ticks executed by the epoch.
    pub ticks: u64,
    /// Why the epoch stopped.
    pub end: EpochEnd,
    /// Lowest (best) fitness.
    pub best_fitness: f32,
    /// Mean fitness.
    pub mean_fitness: f32,
    /// Highest (worst) fitness.
    pub worst_fitness: f32,
    /// Mean weight distance from the best survivor to the other survivors.
    pub survivor_spread: f32,
    /// Offspring bred for the next generation.
    pub offspring: usize,
}

/// Bounded record of recent generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// Recent generations, oldest first.
    pub summaries: VecDeque<GenerationSummary>,
    /// Maximum number of generations to keep.
    pub max_history: usize,
    /// Generation with the lowest best fitness seen so far, retained even
    /// after it drops out of the window.
    pub best_ever: Option<GenerationSummary>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    /// Creates an empty history keeping the last `max_history` generations.
    pub fn new(max_history: usize) -> Self {
        Self {
            summaries: VecDeque::with_capacity(max_history),
            max_history,
            best_ever: None,
        }
    }

    /// Records a finished generation.
    pub fn record(&mut self, summary: GenerationSummary) {
        if self
            .best_ever
            .is_none_or(|best| summary.best_fitness < best.best_fitness)
        {
            self.best_ever = Some(summary);
        }

        self.summaries.push_back(summary);
        while self.summaries.len() > self.max_history {
            self.summaries.pop_front();
        }
    }

    /// Most recent generation.
    pub fn latest(&self) -> Option<&GenerationSummary> {
        self.summaries.back()
    }

    /// Number of generations in the window.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether no generation has been recorded in the window.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Average best fitness over the window.
    pub fn avg_best_fitness(&self) -> f32 {
        if self.summaries.is_empty() {
            0.0
        } else {
            self.summaries.iter().map(|s| s.best_fitness).sum::<f32>() / self.summaries.len() as f32
        }
    }

    /// Average fraction of agents alive at epoch end over the window.
    pub fn avg_survival_rate(&self) -> f32 {
        if self.summaries.is_empty() {
            0.0
        } else {
            self.summaries
                .iter()
                .map(|s| s.alive as f32 / s.population.max(1) as f32)
                .sum::<f32>()
                / self.summaries.len() as f32
        }
    }

    /// Writes the history as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimulationError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
