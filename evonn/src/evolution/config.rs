use super::EvolutionError;

use evonn_nn::mutation::{MutationConfig, MutationWeights};

use serde::{Deserialize, Serialize};

/// Configuration data for an evolution run.
///
/// Use [`EvolutionConfig::new`] for the standard defaults,
/// then override fields as needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Input count of every network, bias excluded.
    pub num_inputs: usize,
    /// Output count of every network.
    pub num_outputs: usize,
    /// The run stops once the best fitness seen reaches this.
    pub desired_fitness: f64,
    /// Ceiling on the number of pools alive at once.
    pub max_pool_count: usize,
    /// Size of the all-time leaderboard.
    pub best_agent_count: usize,
    /// Agents per newly created pool.
    pub pool_size: usize,
    /// Top agents carried over unchanged into each generation.
    pub next_gen_num_to_preserve: usize,
    /// Crossover children added to each generation.
    pub next_gen_num_to_breed: usize,
    /// Weight-mutated copies added to each generation.
    pub next_gen_num_to_mutate_simple: usize,
    /// Pools with new topologies created every cycle.
    pub num_new_pools_to_create: usize,
    /// Generations each pool goes through per cycle.
    pub num_generation_iterations: usize,
    /// Relative chances of each mutation type.
    /// Topology diversification only uses the structural ones.
    pub mutation_weights: MutationWeights,
    /// Parameters of the mutation operators.
    pub mutation: MutationConfig,
    /// Verify the connectivity of every network produced by
    /// crossover or mutation. Expensive.
    pub enable_network_verifications: bool,
    /// Evaluate each pool's agents in parallel.
    #[serde(default)]
    pub parallel_evaluation: bool,
    /// Stop after this many cycles even if the desired
    /// fitness hasn't been reached.
    #[serde(default)]
    pub max_cycles: Option<usize>,
    /// Seed for the run's random source. Entropy-seeded if absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EvolutionConfig {
    /// Returns the default configuration for networks with
    /// the given input and output counts.
    ///
    /// # Examples
    /// ```
    /// use evonn::EvolutionConfig;
    ///
    /// let config = EvolutionConfig {
    ///     pool_size: 50,
    ///     next_gen_num_to_breed: 40,
    ///     ..EvolutionConfig::new(2, 1)
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(num_inputs: usize, num_outputs: usize) -> EvolutionConfig {
        EvolutionConfig {
            num_inputs,
            num_outputs,
            desired_fitness: 0.80,
            max_pool_count: 500,
            best_agent_count: 100,
            pool_size: 25,
            next_gen_num_to_preserve: 5,
            next_gen_num_to_breed: 15,
            next_gen_num_to_mutate_simple: 5,
            num_new_pools_to_create: 10,
            num_generation_iterations: 100,
            mutation_weights: MutationWeights::default(),
            mutation: MutationConfig::default(),
            enable_network_verifications: true,
            parallel_evaluation: false,
            max_cycles: None,
            seed: None,
        }
    }

    /// Number of agents in every generation after the first.
    pub fn next_gen_size(&self) -> usize {
        self.next_gen_num_to_preserve
            + self.next_gen_num_to_breed
            + self.next_gen_num_to_mutate_simple
    }

    /// Checks that the configuration describes a run that
    /// can make progress.
    ///
    /// # Errors
    /// Returns [`EvolutionError::InvalidConfig`] naming the
    /// first problem found.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        let problem = if self.num_inputs == 0 || self.num_outputs == 0 {
            Some("networks need at least one input and one output".to_string())
        } else if self.pool_size == 0 {
            Some("pool_size must be positive".to_string())
        } else if self.next_gen_num_to_preserve > self.pool_size {
            Some(format!(
                "cannot preserve {} agents from pools of {}",
                self.next_gen_num_to_preserve, self.pool_size
            ))
        } else if self.next_gen_size() == 0 {
            Some("generations after the first would be empty".to_string())
        } else if self.best_agent_count == 0 {
            Some("best_agent_count must be positive".to_string())
        } else if self.max_pool_count <= self.num_new_pools_to_create {
            Some(format!(
                "max_pool_count ({}) must exceed num_new_pools_to_create ({})",
                self.max_pool_count, self.num_new_pools_to_create
            ))
        } else if self.num_new_pools_to_create > 0
            && self.mutation_weights.structural_total() == 0
        {
            Some("new pools need at least one non-zero structural mutation weight".to_string())
        } else if !self.desired_fitness.is_finite() {
            Some(format!("desired_fitness must be finite, got {}", self.desired_fitness))
        } else {
            self.mutation.validate().err()
        };

        match problem {
            Some(message) => Err(EvolutionError::InvalidConfig(message)),
            None => Ok(()),
        }
    }
}
