//! The evolution driver grows a set of pools of agents until
//! one of them scores the desired fitness.
//!
//! Each outer cycle runs every pool through a number of
//! generations of elitism, crossover and weight mutation, then
//! culls the weakest pools and seeds new ones from structurally
//! mutated copies of existing pool champions.
mod config;
mod errors;
pub mod logging;

pub use config::EvolutionConfig;
pub use errors::EvolutionError;

use crate::{Agent, Leaderboard, Pool};

use evonn_nn::networks::{Network, NetworkIdAllocator};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use std::time::{Duration, Instant};

/// Scores a network. Higher is better.
///
/// Implemented for every `Fn(&mut Network) -> f64` closure that
/// can be shared between threads. The network is mutable because
/// computing activations updates its state; it must not be
/// retained past the call.
pub trait FitnessFunction: Sync {
    fn evaluate(&self, network: &mut Network) -> f64;
}

impl<F> FitnessFunction for F
where
    F: Fn(&mut Network) -> f64 + Sync,
{
    fn evaluate(&self, network: &mut Network) -> f64 {
        self(network)
    }
}

/// Outcome of [`EvolutionDriver::run`].
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Outer cycles completed over the driver's lifetime.
    pub cycles: usize,
    /// Best fitness ever seen.
    pub best_fitness: f64,
    /// Whether the desired fitness was reached.
    pub reached_target: bool,
    /// Time spent in this call.
    pub elapsed: Duration,
    /// A copy of the best agent ever seen.
    pub champion: Option<Agent>,
}

/// Runs the pool-based evolution loop.
pub struct EvolutionDriver<F> {
    config: EvolutionConfig,
    fitness: F,
    pools: Vec<Pool>,
    leaderboard: Leaderboard,
    ids: NetworkIdAllocator,
    rng: StdRng,
    cycle: usize,
}

impl<F: FitnessFunction> EvolutionDriver<F> {
    /// Creates a driver with one pool of minimal networks
    /// with randomized weights.
    ///
    /// # Errors
    /// Returns [`EvolutionError::InvalidConfig`] if the
    /// configuration doesn't [`validate`](EvolutionConfig::validate).
    ///
    /// # Examples
    /// ```
    /// use evonn::{EvolutionConfig, EvolutionDriver};
    /// use evonn_nn::networks::Network;
    ///
    /// let config = EvolutionConfig {
    ///     desired_fitness: 0.6,
    ///     num_generation_iterations: 5,
    ///     max_cycles: Some(20),
    ///     ..EvolutionConfig::new(1, 1)
    /// };
    /// // Reward networks whose output is high for a high input.
    /// let fitness = |network: &mut Network| network.compute_activation(&[1.0]).unwrap()[0];
    ///
    /// let mut driver = EvolutionDriver::new(config, fitness).unwrap();
    /// let summary = driver.run().unwrap();
    /// assert!(summary.reached_target);
    /// ```
    pub fn new(config: EvolutionConfig, fitness: F) -> Result<EvolutionDriver<F>, EvolutionError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ids = NetworkIdAllocator::new();

        let mut pool = Pool::with_capacity(config.pool_size.max(config.next_gen_size()));
        for _ in 0..config.pool_size {
            let mut network =
                Network::minimal(ids.next_id(), config.num_inputs, config.num_outputs, &mut rng);
            network.randomize_weights(&mut rng);
            pool.push_live(Agent::new(network));
        }

        Ok(EvolutionDriver {
            leaderboard: Leaderboard::new(config.best_agent_count),
            pools: vec![pool],
            config,
            fitness,
            ids,
            rng,
            cycle: 0,
        })
    }

    /// Runs outer cycles until the best fitness seen reaches
    /// [`desired_fitness`](EvolutionConfig::desired_fitness), or
    /// until [`max_cycles`](EvolutionConfig::max_cycles) cycles
    /// have completed.
    ///
    /// # Errors
    /// Stops at the first error; the driver should not be used
    /// afterwards if it is a [consistency fault].
    ///
    /// [consistency fault]: EvolutionError::is_consistency_fault
    pub fn run(&mut self) -> Result<RunSummary, EvolutionError> {
        let start = Instant::now();
        let mut best_fitness = self.leaderboard.best_fitness();
        while best_fitness < self.config.desired_fitness {
            if self.config.max_cycles.map_or(false, |max| self.cycle >= max) {
                info!(cycles = self.cycle, best_fitness, "cycle limit reached");
                break;
            }
            best_fitness = self.step_cycle()?;
        }

        Ok(RunSummary {
            cycles: self.cycle,
            best_fitness,
            reached_target: best_fitness >= self.config.desired_fitness,
            elapsed: start.elapsed(),
            champion: self.leaderboard.best().cloned(),
        })
    }

    /// Runs a single outer cycle and returns the best fitness
    /// seen so far.
    pub fn step_cycle(&mut self) -> Result<f64, EvolutionError> {
        let start = Instant::now();
        for index in 0..self.pools.len() {
            for _ in 0..self.config.num_generation_iterations {
                self.evaluate_pool(index)?;
                self.create_next_generation(index)?;
            }
            self.evaluate_pool(index)?;
            self.pools[index].sort_by_fitness();
            debug!(
                cycle = self.cycle,
                pool = index,
                champion = self.pools[index].best_fitness(),
                "pool finished its generations"
            );
        }

        let best_fitness = self.leaderboard.best_fitness();
        self.eliminate_worst_pools();
        self.create_pools_with_new_topologies()?;
        self.cycle += 1;

        info!(
            cycle = self.cycle,
            pools = self.pools.len(),
            best_fitness,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "finished evolution cycle"
        );
        Ok(best_fitness)
    }

    /// Scores a pool and offers each agent to the leaderboard,
    /// in pool order.
    fn evaluate_pool(&mut self, index: usize) -> Result<(), EvolutionError> {
        let pool = &mut self.pools[index];
        pool.evaluate(&self.fitness, self.config.parallel_evaluation)?;
        for agent in pool.live() {
            self.leaderboard.offer(agent, &self.ids);
        }
        Ok(())
    }

    /// Replaces a pool's live generation with crossover children,
    /// weight-mutated copies and the previous generation's elites.
    fn create_next_generation(&mut self, index: usize) -> Result<(), EvolutionError> {
        let Self {
            config,
            pools,
            ids,
            rng,
            ..
        } = self;
        let pool = &mut pools[index];
        let live_count = pool.live().len();
        if live_count == 0 {
            return Ok(());
        }
        pool.sort_by_fitness();
        pool.prepare_for_next_gen();

        for _ in 0..config.next_gen_num_to_breed {
            let first = &pool.live()[rng.gen_range(0..live_count)];
            let second = &pool.live()[rng.gen_range(0..live_count)];
            let child = Agent::crossover(first, second, ids, rng)?;
            verify(config, &child)?;
            pool.add_to_next_gen(child);
        }

        for _ in 0..config.next_gen_num_to_mutate_simple {
            let mut mutant = pool.live()[rng.gen_range(0..live_count)].deep_copy(ids);
            mutant.network_mut().mutate_weights(&config.mutation, rng)?;
            mutant.set_fitness(0.0);
            verify(config, &mutant)?;
            pool.add_to_next_gen(mutant);
        }

        pool.carry_over_elites(config.next_gen_num_to_preserve);
        pool.make_next_gen_live();
        Ok(())
    }

    /// Culls the lowest-ranked pools so that adding the new
    /// pools keeps the count below the ceiling.
    fn eliminate_worst_pools(&mut self) {
        let limit = self.config.max_pool_count - self.config.num_new_pools_to_create + 1;
        if self.pools.len() >= limit {
            let before = self.pools.len();
            self.pools
                .sort_by(|a, b| b.best_fitness().total_cmp(&a.best_fitness()));
            self.pools.truncate(limit - 1);
            debug!(
                cycle = self.cycle,
                eliminated = before - self.pools.len(),
                "eliminated worst pools"
            );
        }
    }

    /// Adds pools seeded from structurally mutated copies of
    /// randomly chosen existing pool champions.
    fn create_pools_with_new_topologies(&mut self) -> Result<(), EvolutionError> {
        let mut new_pools = Vec::with_capacity(self.config.num_new_pools_to_create);
        for _ in 0..self.config.num_new_pools_to_create {
            let mut template = match self
                .pools
                .choose(&mut self.rng)
                .and_then(Pool::champion)
            {
                Some(champion) => champion.deep_copy(&self.ids),
                None => break,
            };
            let mutation = self.config.mutation_weights.choose_structural(&mut self.rng);
            if let Some(mutation) = mutation {
                template
                    .network_mut()
                    .mutate(mutation, &self.config.mutation, &mut self.rng)?;
            }
            verify(&self.config, &template)?;

            let capacity = self.config.pool_size.max(self.config.next_gen_size());
            let mut pool = Pool::with_capacity(capacity);
            for _ in 0..self.config.pool_size {
                let mut agent = template.deep_copy(&self.ids);
                if self.rng.gen_bool(0.5) {
                    agent
                        .network_mut()
                        .mutate_weights(&self.config.mutation, &mut self.rng)?;
                } else {
                    agent.network_mut().randomize_weights(&mut self.rng);
                }
                pool.push_live(agent);
            }
            debug!(
                cycle = self.cycle,
                template = template.network().id(),
                ?mutation,
                "created pool"
            );
            new_pools.push(pool);
        }
        self.pools.extend(new_pools);
        Ok(())
    }

    /// Best fitness ever seen, or negative infinity
    /// before the first evaluation.
    pub fn best_fitness(&self) -> f64 {
        self.leaderboard.best_fitness()
    }

    /// The all-time best agents, best first.
    pub fn best_agents(&self) -> &[Agent] {
        self.leaderboard.agents()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Outer cycles completed.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}

/// Checks an agent's network if verification is enabled.
fn verify(config: &EvolutionConfig, agent: &Agent) -> Result<(), EvolutionError> {
    if config.enable_network_verifications {
        agent.network().verify_connectivity()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evonn_nn::mutation::{MutationConfig, MutationWeights, WeightMutationBreadth};

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            pool_size: 6,
            next_gen_num_to_preserve: 2,
            next_gen_num_to_breed: 3,
            next_gen_num_to_mutate_simple: 1,
            num_new_pools_to_create: 2,
            max_pool_count: 5,
            num_generation_iterations: 3,
            best_agent_count: 4,
            seed: Some(2024),
            ..EvolutionConfig::new(2, 1)
        }
    }

    fn output_fitness(network: &mut Network) -> f64 {
        network.compute_activation(&[1.0, 0.0]).unwrap()[0]
    }

    #[test]
    fn initial_pool_is_minimal() {
        let driver = EvolutionDriver::new(small_config(), output_fitness).unwrap();
        assert_eq!(driver.pools().len(), 1);
        let pool = &driver.pools()[0];
        assert_eq!(pool.live().len(), 6);
        for agent in pool.live() {
            assert_eq!(agent.network().node_count(), 4);
            assert_eq!(agent.network().link_count(), 3);
        }
        assert_eq!(driver.best_fitness(), f64::NEG_INFINITY);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EvolutionConfig {
            pool_size: 0,
            ..small_config()
        };
        assert!(matches!(
            EvolutionDriver::new(config, output_fitness),
            Err(EvolutionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn generations_keep_their_size() {
        let mut driver = EvolutionDriver::new(small_config(), output_fitness).unwrap();
        driver.evaluate_pool(0).unwrap();
        driver.create_next_generation(0).unwrap();

        let pool = &driver.pools()[0];
        assert_eq!(pool.live().len(), 6);
        let elites: Vec<&Agent> = pool.live().iter().filter(|a| a.age() == 1).collect();
        assert_eq!(elites.len(), 2);
        assert!(pool.live().iter().all(|a| a.fitness() == 0.0));
        assert!(driver.leaderboard().len() <= 4);
    }

    #[test]
    fn pool_count_stays_under_ceiling() {
        let mut driver = EvolutionDriver::new(small_config(), output_fitness).unwrap();
        let mut counts = vec![];
        for _ in 0..4 {
            driver.step_cycle().unwrap();
            counts.push(driver.pools().len());
        }
        // 1 + 2, 3 + 2, then culled to 3 before adding 2.
        assert_eq!(counts, vec![3, 5, 5, 5]);
        assert_eq!(driver.cycle(), 4);

        let shapes: Vec<usize> = driver.pools()[3..]
            .iter()
            .map(|p| p.live().len())
            .collect();
        assert_eq!(shapes, vec![6, 6]);
        for pool in driver.pools() {
            let links = pool.live()[0].network().link_ids();
            assert!(pool.live().iter().all(|a| a.network().link_ids() == links));
        }
    }

    type Driver = EvolutionDriver<fn(&mut Network) -> f64>;

    /// Replaces the driver's pools with single-agent pools
    /// of the given fitness.
    fn pools_with_champions(driver: &mut Driver, fitness: &[f64]) {
        let template = driver.pools[0].live()[0].clone();
        driver.pools = fitness
            .iter()
            .map(|fitness| {
                let mut agent = template.clone();
                agent.set_fitness(*fitness);
                Pool::from_agents(vec![agent])
            })
            .collect();
    }

    #[test]
    fn elimination_keeps_the_fittest_pools() {
        let fitness = output_fitness as fn(&mut Network) -> f64;
        let mut driver: Driver = EvolutionDriver::new(small_config(), fitness).unwrap();

        // Room for two new pools under a ceiling of 5 leaves 3.
        pools_with_champions(&mut driver, &[0.3, 0.9, 0.1, 0.7, 0.5]);
        driver.eliminate_worst_pools();
        let kept: Vec<f64> = driver.pools().iter().map(Pool::best_fitness).collect();
        assert_eq!(kept, vec![0.9, 0.7, 0.5]);

        pools_with_champions(&mut driver, &[0.2, 0.8, 0.4]);
        driver.eliminate_worst_pools();
        let kept: Vec<f64> = driver.pools().iter().map(Pool::best_fitness).collect();
        assert_eq!(kept, vec![0.2, 0.8, 0.4]);
    }

    #[test]
    fn new_pool_copies_are_mutated_or_randomized() {
        let config = EvolutionConfig {
            pool_size: 20,
            mutation_weights: MutationWeights {
                add_node: 1,
                ..MutationWeights::zero()
            },
            // Weight mutation leaves every weight unchanged.
            mutation: MutationConfig {
                weight_mutation_breadth: WeightMutationBreadth::AllLinks,
                weight_bound: 8.0,
                ..MutationConfig::zero()
            },
            ..small_config()
        };
        let mut driver = EvolutionDriver::new(config, output_fitness).unwrap();
        driver.evaluate_pool(0).unwrap();
        driver.create_pools_with_new_topologies().unwrap();
        assert_eq!(driver.pools().len(), 3);

        // The split link into the new node has weight 1, which
        // a randomized weight in [-1, 1) never reproduces.
        let mut kept_split_weight = vec![];
        for pool in &driver.pools()[1..] {
            assert_eq!(pool.live().len(), 20);
            for agent in pool.live() {
                assert_eq!(agent.network().hidden().len(), 1);
                kept_split_weight.push(agent.network().links().any(|l| l.weight() == 1.0));
            }
        }
        assert!(kept_split_weight.contains(&true));
        assert!(kept_split_weight.contains(&false));
    }

    #[test]
    fn leaderboard_tracks_best() {
        let mut driver = EvolutionDriver::new(small_config(), output_fitness).unwrap();
        let best = driver.step_cycle().unwrap();
        assert_eq!(best, driver.best_fitness());
        let board: Vec<f64> = driver.best_agents().iter().map(Agent::fitness).collect();
        assert_eq!(board.len(), 4);
        assert!(board.windows(2).all(|w| w[0] >= w[1]));
        assert!(driver.pools().iter().all(|p| p.best_fitness() <= best));
    }

    #[test]
    fn seeded_runs_repeat() {
        let history = |parallel: bool| {
            let config = EvolutionConfig {
                parallel_evaluation: parallel,
                ..small_config()
            };
            let mut driver = EvolutionDriver::new(config, output_fitness).unwrap();
            (0..3)
                .map(|_| driver.step_cycle().unwrap())
                .collect::<Vec<f64>>()
        };
        assert_eq!(history(false), history(false));
        assert_eq!(history(false), history(true));
    }

    #[test]
    fn run_stops_at_cycle_limit() {
        let config = EvolutionConfig {
            desired_fitness: 2.0,
            max_cycles: Some(2),
            ..small_config()
        };
        let mut driver = EvolutionDriver::new(config, output_fitness).unwrap();
        let summary = driver.run().unwrap();
        assert_eq!(summary.cycles, 2);
        assert!(!summary.reached_target);
        assert!(summary.champion.is_some());
        assert!(summary.best_fitness < 1.0);
    }

    #[test]
    fn nan_fitness_aborts_run() {
        let mut driver =
            EvolutionDriver::new(small_config(), |_: &mut Network| f64::NAN).unwrap();
        assert!(matches!(
            driver.run(),
            Err(EvolutionError::InvalidFitness { .. })
        ));
    }
}
