//! # EvoNN
//! A neuroevolution engine that grows recurrent neural networks
//! from minimal topologies.
//!
//! Networks (provided by [`EvoNN-NN`](evonn_nn)) are wrapped in
//! [`Agent`]s and evolved in [`Pool`]s of identical topology, using
//! elitism, weight-level crossover and weight mutation. Every cycle
//! the [`EvolutionDriver`] culls the weakest pools and seeds new ones
//! from structurally mutated pool champions, recording the best
//! agents ever seen in a [`Leaderboard`].
//!
//! Fitness is supplied by the caller as any `Fn(&mut Network) -> f64`
//! closure, and may be evaluated in parallel with rayon.
//! Progress is reported through `tracing` events, and snapshots can
//! be kept with an [`EvolutionLogger`](logging::EvolutionLogger).
//!
//! # Example usage: Evolution of XOR function approximator
//! ```
//! use evonn::{EvolutionConfig, EvolutionDriver};
//! use evonn_nn::networks::Network;
//!
//! fn evaluate_xor(network: &mut Network) -> f64 {
//!     let cases = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 1.0),
//!         ([1.0, 0.0], 1.0),
//!         ([1.0, 1.0], 0.0),
//!     ];
//!     let mut error = 0.0;
//!     for (input, expected) in &cases {
//!         network.reset_state();
//!         error += (network.compute_activation(input).unwrap()[0] - expected).abs();
//!     }
//!     1.0 - error / 4.0
//! }
//!
//! let config = EvolutionConfig {
//!     desired_fitness: 0.6,
//!     num_generation_iterations: 10,
//!     max_pool_count: 20,
//!     num_new_pools_to_create: 4,
//!     max_cycles: Some(10),
//!     seed: Some(7),
//!     ..EvolutionConfig::new(2, 1)
//! };
//!
//! let mut driver = EvolutionDriver::new(config, evaluate_xor).unwrap();
//! let summary = driver.run().unwrap();
//! if let Some(champion) = summary.champion {
//!     println!("Best network: {}\n{}", champion, champion.network());
//! }
//! ```

mod agents;
mod evolution;
mod pools;

pub use agents::Agent;
pub use evolution::*;
pub use pools::{Leaderboard, Pool};
