//! # EvoNN-NN
//! Recurrent neural network graphs for the [`EvoNN`](../evonn/index.html)
//! neuroevolution engine.
//!
//! Provides a [`Network`] type whose topology can grow and shrink at run
//! time, the mutation operators that change it, and a plain-text format
//! for storing networks:
//! - [`networks`]: the network graph, its nodes and links, and recursive
//!   activation with one-step-delayed recurrent connections.
//! - [`mutation`]: weight perturbation and the four structural mutations
//!   (add link, add node, delete link, delete node).
//! - [`io`]: saving and loading networks as text records.
//! - [`math`] and [`rng`]: activation functions and random draws.
//!
//! [`Network`]: crate::networks::Network
//!
//! # Example usage: growing and evaluating a network
//! ```
//! use evonn_nn::{
//!     io,
//!     mutation::{MutationConfig, MutationType},
//!     networks::Network,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let config = MutationConfig::default();
//!
//! let mut network = Network::minimal(0, 2, 1, &mut rng);
//! network.mutate(MutationType::AddNode, &config, &mut rng).unwrap();
//! network.mutate(MutationType::AddLink, &config, &mut rng).unwrap();
//! assert!(network.verify_connectivity().is_ok());
//!
//! let output = network.compute_activation(&[1.0, 0.0]).unwrap();
//! assert!(output[0] > 0.0 && output[0] < 1.0);
//!
//! let restored = io::parse_network(&io::to_text(&network)).unwrap();
//! assert_eq!(restored.to_string(), network.to_string());
//! ```

pub mod io;
pub mod math;
pub mod mutation;
pub mod networks;
pub mod rng;

/// Identifier of a node, unique within its network.
pub type NodeId = usize;
/// Identifier of a link, unique within its network.
pub type LinkId = usize;
/// Identifier of a network, unique within one
/// [`NetworkIdAllocator`](crate::networks::NetworkIdAllocator).
pub type NetworkId = usize;
