use evonn_nn::networks::NetworkError;
use evonn_nn::NetworkId;

use thiserror::Error;

/// Errors raised while configuring or running an evolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    /// The configuration can't describe a working run.
    #[error("invalid evolution configuration: {0}")]
    InvalidConfig(String),
    /// Crossover needs both parents to hold the same links.
    #[error("networks {first} and {second} do not share a topology")]
    IncompatibleParents { first: NetworkId, second: NetworkId },
    /// The fitness function returned NaN.
    #[error("fitness function returned NaN for network {network}")]
    InvalidFitness { network: NetworkId },
    /// A network operation failed.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl EvolutionError {
    /// Returns `true` if the error reports a corrupted network,
    /// as opposed to a caller mistake.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_consistency_fault())
    }
}
