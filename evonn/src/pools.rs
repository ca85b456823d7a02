//! A Pool is a population of agents sharing one topology,
//! evolved by weight-level crossover and mutation.
mod leaderboard;

pub use leaderboard::Leaderboard;

use crate::{Agent, EvolutionError, FitnessFunction};

use rayon::prelude::*;

use std::cmp::Ordering;
use std::mem;

/// Orders agents by fitness, best first.
pub(crate) fn by_fitness_descending(a: &Agent, b: &Agent) -> Ordering {
    b.fitness().total_cmp(&a.fitness())
}

/// A population of agents, double-buffered: the live buffer
/// holds the generation being ranked, while the next generation
/// is assembled in the other buffer. Swapping the two reuses
/// both allocations.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    live: Vec<Agent>,
    next_gen: Vec<Agent>,
}

impl Pool {
    /// Creates an empty pool with room for `capacity` agents
    /// in each buffer.
    pub fn with_capacity(capacity: usize) -> Pool {
        Pool {
            live: Vec::with_capacity(capacity),
            next_gen: Vec::with_capacity(capacity),
        }
    }

    /// Creates a pool whose live generation is `agents`.
    pub fn from_agents(agents: Vec<Agent>) -> Pool {
        let next_gen = Vec::with_capacity(agents.len());
        Pool {
            live: agents,
            next_gen,
        }
    }

    /// The live generation, best first if sorted.
    pub fn live(&self) -> &[Agent] {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut [Agent] {
        &mut self.live
    }

    /// Adds an agent directly to the live generation.
    pub fn push_live(&mut self, agent: Agent) {
        self.live.push(agent);
    }

    /// The generation under construction.
    pub fn next_gen(&self) -> &[Agent] {
        &self.next_gen
    }

    /// Returns the live agent with the highest fitness.
    pub fn champion(&self) -> Option<&Agent> {
        self.live
            .iter()
            .min_by(|a, b| by_fitness_descending(a, b))
    }

    /// Fitness of the [`champion`](Self::champion), or
    /// negative infinity for an empty pool.
    pub fn best_fitness(&self) -> f64 {
        self.champion().map_or(f64::NEG_INFINITY, Agent::fitness)
    }

    /// Sorts the live generation by fitness, best first.
    /// Agents with equal fitness keep their order.
    pub fn sort_by_fitness(&mut self) {
        self.live.sort_by(by_fitness_descending);
    }

    /// Empties the next-generation buffer.
    pub fn prepare_for_next_gen(&mut self) {
        self.next_gen.clear();
    }

    pub fn add_to_next_gen(&mut self, agent: Agent) {
        self.next_gen.push(agent);
    }

    /// Moves the first `count` live agents into the next
    /// generation, one generation older and with their
    /// fitness cleared. Call after sorting.
    pub fn carry_over_elites(&mut self, count: usize) {
        let count = count.min(self.live.len());
        for mut elite in self.live.drain(..count) {
            elite.grow_older();
            elite.set_fitness(0.0);
            self.next_gen.push(elite);
        }
    }

    /// Makes the next generation live. The old live buffer
    /// becomes the scratch buffer for the following generation.
    pub fn make_next_gen_live(&mut self) {
        mem::swap(&mut self.live, &mut self.next_gen);
    }

    /// Scores every live agent with `fitness`, optionally
    /// spreading the work over rayon's thread pool.
    ///
    /// # Errors
    /// Returns [`EvolutionError::InvalidFitness`] if any score is NaN.
    pub fn evaluate<F: FitnessFunction>(
        &mut self,
        fitness: &F,
        parallel: bool,
    ) -> Result<(), EvolutionError> {
        let score = |agent: &mut Agent| {
            let value = fitness.evaluate(agent.network_mut());
            if value.is_nan() {
                return Err(EvolutionError::InvalidFitness {
                    network: agent.network().id(),
                });
            }
            agent.set_fitness(value);
            Ok(())
        };
        if parallel {
            self.live.par_iter_mut().try_for_each(score)
        } else {
            self.live.iter_mut().try_for_each(score)
        }
    }
}
