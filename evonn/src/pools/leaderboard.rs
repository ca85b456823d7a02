use super::by_fitness_descending;
use crate::Agent;

use evonn_nn::networks::NetworkIdAllocator;

/// The best agents ever evaluated, kept as independent
/// copies and sorted best first.
///
/// Entries are never fed back into pools.
#[derive(Clone, Debug)]
pub struct Leaderboard {
    capacity: usize,
    agents: Vec<Agent>,
}

impl Leaderboard {
    /// Creates an empty leaderboard holding at most `capacity` agents.
    pub fn new(capacity: usize) -> Leaderboard {
        Leaderboard {
            capacity,
            agents: Vec::with_capacity(capacity),
        }
    }

    /// Offers an agent a place on the leaderboard, storing a copy
    /// if it is admitted. Returns whether it was.
    ///
    /// Agents are admitted while the leaderboard has room, and
    /// afterwards only if they are strictly fitter than the worst
    /// entry, which they replace.
    ///
    /// # Examples
    /// ```
    /// use evonn::{Agent, Leaderboard};
    /// use evonn_nn::networks::{Network, NetworkIdAllocator};
    ///
    /// let ids = NetworkIdAllocator::new();
    /// let mut leaderboard = Leaderboard::new(1);
    /// let mut agent = Agent::new(Network::minimal(ids.next_id(), 1, 1, &mut rand::thread_rng()));
    ///
    /// agent.set_fitness(0.5);
    /// assert!(leaderboard.offer(&agent, &ids));
    /// assert!(!leaderboard.offer(&agent, &ids));
    /// agent.set_fitness(0.6);
    /// assert!(leaderboard.offer(&agent, &ids));
    /// assert_eq!(leaderboard.best_fitness(), 0.6);
    /// ```
    pub fn offer(&mut self, candidate: &Agent, ids: &NetworkIdAllocator) -> bool {
        if self.agents.len() < self.capacity {
            self.agents.push(candidate.deep_copy(ids));
        } else {
            match self.agents.last() {
                Some(worst) if candidate.fitness() > worst.fitness() => {
                    self.agents.pop();
                    self.agents.push(candidate.deep_copy(ids));
                }
                _ => return false,
            }
        }
        self.agents.sort_by(by_fitness_descending);
        true
    }

    /// Fitness of the best entry, or negative infinity
    /// while the leaderboard is empty.
    pub fn best_fitness(&self) -> f64 {
        self.best().map_or(f64::NEG_INFINITY, Agent::fitness)
    }

    pub fn best(&self) -> Option<&Agent> {
        self.agents.first()
    }

    /// Entries, best first.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evonn_nn::networks::Network;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn keeps_top_three() {
        let ids = NetworkIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(31);
        let mut leaderboard = Leaderboard::new(3);
        assert_eq!(leaderboard.best_fitness(), f64::NEG_INFINITY);

        for fitness in [0.1, 0.9, 0.5, 0.2, 0.99] {
            let mut agent = Agent::new(Network::minimal(ids.next_id(), 2, 1, &mut rng));
            agent.set_fitness(fitness);
            leaderboard.offer(&agent, &ids);
        }

        let kept: Vec<f64> = leaderboard.agents().iter().map(Agent::fitness).collect();
        assert_eq!(kept, vec![0.99, 0.9, 0.5]);
        assert_eq!(leaderboard.best_fitness(), 0.99);
        assert_eq!(leaderboard.len(), 3);
    }

    #[test]
    fn ties_with_the_worst_are_rejected() {
        let ids = NetworkIdAllocator::new();
        let mut leaderboard = Leaderboard::new(2);
        let mut agent = Agent::new(Network::minimal(ids.next_id(), 1, 1, &mut rand::thread_rng()));
        for fitness in [0.4, 0.7] {
            agent.set_fitness(fitness);
            assert!(leaderboard.offer(&agent, &ids));
        }
        agent.set_fitness(0.4);
        assert!(!leaderboard.offer(&agent, &ids));
    }

    #[test]
    fn entries_are_independent_copies() {
        let ids = NetworkIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(32);
        let mut leaderboard = Leaderboard::new(4);
        let mut agent = Agent::new(Network::minimal(ids.next_id(), 2, 2, &mut rng));
        agent.set_fitness(1.0);
        leaderboard.offer(&agent, &ids);

        agent.network_mut().randomize_weights(&mut rng);
        let entry = &leaderboard.agents()[0];
        assert_ne!(entry.network().id(), agent.network().id());
        assert!(entry
            .network()
            .links()
            .any(|l| agent.network().link(l.id()).unwrap().weight() != l.weight()));
    }
}
