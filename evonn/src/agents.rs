use crate::EvolutionError;

use evonn_nn::mutation::{MutationConfig, MutationType, MutationWeights};
use evonn_nn::networks::{Network, NetworkIdAllocator};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// One evaluated individual: a network, the number of
/// generations it has survived unchanged, and its latest
/// fitness score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    network: Network,
    age: usize,
    fitness: f64,
}

impl Agent {
    /// Wraps a network in a fresh agent, with age and
    /// fitness both zero.
    pub fn new(network: Network) -> Agent {
        Agent {
            network,
            age: 0,
            fitness: 0.0,
        }
    }

    /// Returns the agent's network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the agent's network for evaluation or mutation.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Unwraps the agent's network.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Generations survived as an elite.
    pub fn age(&self) -> usize {
        self.age
    }

    pub(crate) fn grow_older(&mut self) {
        self.age += 1;
    }

    /// Latest fitness score.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Returns a copy with an independent network (under a
    /// new network id) and the same fitness. The copy's age
    /// starts over.
    ///
    /// # Examples
    /// ```
    /// use evonn::Agent;
    /// use evonn_nn::networks::{Network, NetworkIdAllocator};
    ///
    /// let ids = NetworkIdAllocator::new();
    /// let mut agent = Agent::new(Network::minimal(ids.next_id(), 2, 1, &mut rand::thread_rng()));
    /// agent.set_fitness(0.75);
    ///
    /// let copy = agent.deep_copy(&ids);
    /// assert_eq!(copy.fitness(), 0.75);
    /// assert_eq!(copy.age(), 0);
    /// assert_ne!(copy.network().id(), agent.network().id());
    /// ```
    pub fn deep_copy(&self, ids: &NetworkIdAllocator) -> Agent {
        Agent {
            network: self.network.deep_copy(ids),
            age: 0,
            fitness: self.fitness,
        }
    }

    /// Breeds a child from two parents with identical topologies.
    ///
    /// The child's network is a copy of `first`'s in which every
    /// link independently takes its weight from either parent,
    /// with equal chance. The child starts with zero age and
    /// fitness.
    ///
    /// # Errors
    /// Returns [`EvolutionError::IncompatibleParents`] if the
    /// parents' link ids or endpoints differ.
    pub fn crossover<R: Rng + ?Sized>(
        first: &Agent,
        second: &Agent,
        ids: &NetworkIdAllocator,
        rng: &mut R,
    ) -> Result<Agent, EvolutionError> {
        if !first.network.shares_topology_with(&second.network) {
            return Err(EvolutionError::IncompatibleParents {
                first: first.network.id(),
                second: second.network.id(),
            });
        }

        let mut network = first.network.deep_copy(ids);
        for id in network.link_ids() {
            if rng.gen_bool(0.5) {
                if let Some(link) = second.network.link(id) {
                    network.set_link_weight(id, link.weight())?;
                }
            }
        }
        Ok(Agent::new(network))
    }

    /// Applies one mutation chosen at random by `weights`,
    /// returning its type, or `None` if every weight is zero.
    pub fn mutate_weighted<R: Rng + ?Sized>(
        &mut self,
        weights: &MutationWeights,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<Option<MutationType>, EvolutionError> {
        match weights.choose(rng) {
            Some(mutation) => {
                self.network.mutate(mutation, config, rng)?;
                Ok(Some(mutation))
            }
            None => Ok(None),
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id#{}, F={}", self.network.id(), self.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn agent(ids: &NetworkIdAllocator, rng: &mut StdRng) -> Agent {
        Agent::new(Network::minimal(ids.next_id(), 3, 2, rng))
    }

    #[test]
    fn crossover_mixes_parent_weights() {
        let mut rng = StdRng::seed_from_u64(11);
        let ids = NetworkIdAllocator::new();
        let (first, second) = (agent(&ids, &mut rng), agent(&ids, &mut rng));

        let mut from_first = 0;
        let mut from_second = 0;
        for _ in 0..20 {
            let child = Agent::crossover(&first, &second, &ids, &mut rng).unwrap();
            assert_eq!(child.network().link_ids(), first.network().link_ids());
            assert_eq!(child.fitness(), 0.0);
            assert!(child.network().verify_connectivity().is_ok());
            for link in child.network().links() {
                let a = first.network().link(link.id()).unwrap();
                let b = second.network().link(link.id()).unwrap();
                assert_eq!(link.endpoints(), a.endpoints());
                if link.weight() == a.weight() {
                    from_first += 1;
                } else {
                    assert_eq!(link.weight(), b.weight());
                    from_second += 1;
                }
            }
        }
        assert!(from_first > 0 && from_second > 0);
    }

    #[test]
    fn crossover_rejects_different_topologies() {
        let mut rng = StdRng::seed_from_u64(12);
        let ids = NetworkIdAllocator::new();
        let first = agent(&ids, &mut rng);
        let mut second = agent(&ids, &mut rng);
        second.network_mut().mutate_new_node(&mut rng).unwrap();

        assert_eq!(
            Agent::crossover(&first, &second, &ids, &mut rng).unwrap_err(),
            EvolutionError::IncompatibleParents {
                first: first.network().id(),
                second: second.network().id(),
            }
        );
    }

    #[test]
    fn deep_copy_resets_age() {
        let mut rng = StdRng::seed_from_u64(13);
        let ids = NetworkIdAllocator::new();
        let mut original = agent(&ids, &mut rng);
        original.grow_older();
        original.grow_older();
        original.set_fitness(-3.5);

        let mut copy = original.deep_copy(&ids);
        assert_eq!(copy.age(), 0);
        assert_eq!(copy.fitness(), -3.5);
        copy.network_mut().randomize_weights(&mut rng);
        assert_eq!(original.age(), 2);
        assert!(original
            .network()
            .links()
            .any(|l| copy.network().link(l.id()).unwrap().weight() != l.weight()));
    }

    #[test]
    fn weighted_mutation_follows_weights() {
        let mut rng = StdRng::seed_from_u64(14);
        let ids = NetworkIdAllocator::new();
        let mut agent = agent(&ids, &mut rng);
        let only_nodes = MutationWeights {
            add_node: 1,
            ..MutationWeights::zero()
        };
        let config = MutationConfig::default();

        assert_eq!(
            agent.mutate_weighted(&only_nodes, &config, &mut rng).unwrap(),
            Some(MutationType::AddNode)
        );
        assert_eq!(agent.network().hidden().len(), 1);
        assert_eq!(
            agent
                .mutate_weighted(&MutationWeights::zero(), &config, &mut rng)
                .unwrap(),
            None
        );
    }

    #[test]
    fn display() {
        let mut agent = Agent::new(Network::minimal(17, 1, 1, &mut rand::thread_rng()));
        agent.set_fitness(0.5);
        assert_eq!(agent.to_string(), "Id#17, F=0.5");
    }
}
