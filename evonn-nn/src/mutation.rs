//! Weight and structural mutation operators for [`Network`]s.
//!
//! Structural operators that find nothing to act on (no
//! unconnected node pair, no hidden node, no link) leave the
//! network untouched and return `Ok(None)`. Errors are only
//! returned when the network turns out to be corrupt.
mod config;

pub use config::{MutationConfig, MutationType, MutationWeights, WeightMutationBreadth};

use crate::networks::{Link, Network, NetworkError, Node};
use crate::rng::RandomDraws;
use crate::{LinkId, NodeId};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use std::collections::HashSet;

impl Network {
    /// Perturbs link weights as configured, returning how many
    /// links were touched.
    ///
    /// Each touched link has a [`weight_reset_chance`] of being
    /// redrawn from `[-1, 1)`; otherwise it is nudged by up to
    /// [`weight_mutation_power`] and clamped to [`weight_bound`].
    ///
    /// [`weight_reset_chance`]: MutationConfig::weight_reset_chance
    /// [`weight_mutation_power`]: MutationConfig::weight_mutation_power
    /// [`weight_bound`]: MutationConfig::weight_bound
    pub fn mutate_weights<R: Rng + ?Sized>(
        &mut self,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<usize, NetworkError> {
        let ids = self.link_ids();
        let touched: Vec<LinkId> = match config.weight_mutation_breadth {
            WeightMutationBreadth::AllLinks => ids,
            WeightMutationBreadth::SingleLink => ids.choose(rng).copied().into_iter().collect(),
        };

        for id in &touched {
            if rng.draw_unit() < config.weight_reset_chance {
                self.randomize_link_weight(*id, rng)?;
            } else {
                let weight = self.link(*id).ok_or(NetworkError::UnknownLink(*id))?.weight();
                let nudge = rng.draw_between(
                    -config.weight_mutation_power,
                    config.weight_mutation_power,
                );
                self.set_link_weight(
                    *id,
                    (weight + nudge).clamp(-config.weight_bound, config.weight_bound),
                )?;
            }
        }
        Ok(touched.len())
    }

    /// Links a uniformly chosen pair of unconnected nodes with a
    /// randomized weight, returning the new link's id.
    ///
    /// The target is never an input or the bias, and the two
    /// nodes differ. Unless [`allow_recurrent_links`] is set,
    /// pairs whose link would close a directed cycle are skipped.
    ///
    /// [`allow_recurrent_links`]: MutationConfig::allow_recurrent_links
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::mutation::MutationConfig;
    /// use evonn_nn::networks::Network;
    ///
    /// let mut rng = rand::thread_rng();
    /// let config = MutationConfig::default();
    /// let mut network = Network::minimal(0, 2, 1, &mut rng);
    ///
    /// // Minimal networks are saturated.
    /// assert_eq!(network.mutate_new_link(&config, &mut rng).unwrap(), None);
    ///
    /// network.mutate_new_node(&mut rng).unwrap();
    /// assert!(network.mutate_new_link(&config, &mut rng).unwrap().is_some());
    /// ```
    pub fn mutate_new_link<R: Rng + ?Sized>(
        &mut self,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<Option<LinkId>, NetworkError> {
        let candidates = self.unconnected_pairs(config.allow_recurrent_links)?;
        match candidates.choose(rng) {
            Some((source, target)) => {
                let link = self.create_link_between(*source, *target, rng)?;
                trace!(network = self.id(), link, source, target, "added link");
                Ok(Some(link))
            }
            None => {
                trace!(network = self.id(), "no node pair left to link");
                Ok(None)
            }
        }
    }

    /// Splits a uniformly chosen link in two with a new hidden
    /// node, returning the node's id.
    ///
    /// The link into the new node has weight 1 and the link out
    /// of it inherits the split link's weight, so the network's
    /// behaviour changes as little as possible.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::Network;
    ///
    /// let mut rng = rand::thread_rng();
    /// let mut network = Network::minimal(0, 1, 1, &mut rng);
    /// let node = network.mutate_new_node(&mut rng).unwrap().unwrap();
    ///
    /// assert_eq!(network.hidden(), &[node]);
    /// assert_eq!(network.link_count(), 3);
    /// assert!(network.verify_connectivity().is_ok());
    /// ```
    pub fn mutate_new_node<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<NodeId>, NetworkError> {
        let split = match self.link_ids().choose(rng) {
            Some(id) => self.delete_link(*id)?,
            None => {
                trace!(network = self.id(), "no link to split");
                return Ok(None);
            }
        };
        let node = self.add_hidden_node();
        self.add_link(split.source(), node, 1.0)?;
        self.add_link(node, split.target(), split.weight())?;
        trace!(network = self.id(), node, split = split.id(), "added node");
        Ok(Some(node))
    }

    /// Deletes a uniformly chosen link, returning it.
    pub fn mutate_delete_link<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<Link>, NetworkError> {
        match self.link_ids().choose(rng) {
            Some(id) => {
                let link = self.delete_link(*id)?;
                trace!(network = self.id(), link = link.id(), "deleted link");
                Ok(Some(link))
            }
            None => {
                trace!(network = self.id(), "no link to delete");
                Ok(None)
            }
        }
    }

    /// Deletes a uniformly chosen hidden node and every link
    /// touching it, returning the node and its links.
    pub fn mutate_delete_node<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<(Node, Vec<Link>)>, NetworkError> {
        match self.hidden().choose(rng).copied() {
            Some(id) => {
                let (node, links) = self.delete_hidden_node(id)?;
                trace!(network = self.id(), node = id, links = links.len(), "deleted node");
                Ok(Some((node, links)))
            }
            None => {
                trace!(network = self.id(), "no hidden node to delete");
                Ok(None)
            }
        }
    }

    /// Applies one mutation of the given type. Returns whether
    /// the network changed.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        mutation: MutationType,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<bool, NetworkError> {
        Ok(match mutation {
            MutationType::ModifyWeight => self.mutate_weights(config, rng)? > 0,
            MutationType::AddLink => self.mutate_new_link(config, rng)?.is_some(),
            MutationType::AddNode => self.mutate_new_node(rng)?.is_some(),
            MutationType::DeleteLink => self.mutate_delete_link(rng)?.is_some(),
            MutationType::DeleteNode => self.mutate_delete_node(rng)?.is_some(),
        })
    }

    /// Every `(source, target)` pair that a new link could join,
    /// in ascending id order.
    fn unconnected_pairs(
        &self,
        allow_recurrent: bool,
    ) -> Result<Vec<(NodeId, NodeId)>, NetworkError> {
        let ids = self.node_ids();
        let mut pairs = vec![];
        for source in &ids {
            for target in &ids {
                if source == target
                    || self.node(*target)?.role().is_sensor()
                    || self.are_nodes_connected(*source, *target)?
                {
                    continue;
                }
                if !allow_recurrent && self.reaches(*target, *source)? {
                    continue;
                }
                pairs.push((*source, *target));
            }
        }
        Ok(pairs)
    }

    /// Returns whether a directed path leads from `from` to `to`.
    fn reaches(&self, from: NodeId, to: NodeId) -> Result<bool, NetworkError> {
        let mut seen = HashSet::new();
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if id == to {
                return Ok(true);
            }
            if seen.insert(id) {
                pending.extend(self.node(id)?.outgoing_links().map(|(target, _)| target));
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::NodeRole;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn mutate_weights_reset() {
        let config = MutationConfig {
            weight_mutation_breadth: WeightMutationBreadth::AllLinks,
            weight_reset_chance: 1.0,
            ..MutationConfig::zero()
        };
        let mut rng = rng();
        let mut network = Network::minimal(0, 3, 2, &mut rng);
        for id in network.link_ids() {
            network.set_link_weight(id, 5.0).unwrap();
        }
        assert_eq!(network.mutate_weights(&config, &mut rng).unwrap(), 8);
        assert!(network.links().all(|l| (-1.0..1.0).contains(&l.weight())));
    }

    #[test]
    fn mutate_weights_nudge() {
        let config = MutationConfig {
            weight_mutation_breadth: WeightMutationBreadth::SingleLink,
            weight_mutation_power: 3.0,
            weight_bound: 2.0,
            ..MutationConfig::zero()
        };
        let mut rng = rng();
        let mut network = Network::minimal(0, 3, 2, &mut rng);
        let before: Vec<f64> = network
            .link_ids()
            .iter()
            .map(|id| network.link(*id).unwrap().weight())
            .collect();

        assert_eq!(network.mutate_weights(&config, &mut rng).unwrap(), 1);
        let after: Vec<f64> = network
            .link_ids()
            .iter()
            .map(|id| network.link(*id).unwrap().weight())
            .collect();
        let changed = before.iter().zip(&after).filter(|(b, a)| b != a).count();
        assert!(changed <= 1);
        assert!(after.iter().all(|w| w.abs() <= 2.0));
    }

    #[test]
    fn mutate_weights_none() {
        let config = MutationConfig {
            weight_mutation_breadth: WeightMutationBreadth::AllLinks,
            weight_bound: 5.0,
            ..MutationConfig::zero()
        };
        let mut rng = rng();
        let mut network = Network::minimal(0, 2, 2, &mut rng);
        let before: Vec<Link> = network
            .link_ids()
            .iter()
            .map(|id| *network.link(*id).unwrap())
            .collect();
        assert_eq!(network.mutate_weights(&config, &mut rng).unwrap(), 6);
        for link in before {
            assert_eq!(network.link(link.id()), Some(&link));
        }
    }

    #[test]
    fn new_node_splits_link() {
        let mut rng = rng();
        let mut network = Network::minimal(0, 1, 1, &mut rng);
        network.delete_link(0).unwrap();
        let split = *network.link(1).unwrap();

        let node = network.mutate_new_node(&mut rng).unwrap().unwrap();
        assert!(network.link(1).is_none());
        assert_eq!(network.node(node).unwrap().role(), NodeRole::Hidden);

        let into = network.link(2).unwrap();
        let out_of = network.link(3).unwrap();
        assert_eq!(into.endpoints(), (split.source(), node));
        assert_eq!(into.weight(), 1.0);
        assert_eq!(out_of.endpoints(), (node, split.target()));
        assert_eq!(out_of.weight(), split.weight());
        assert!(network.verify_connectivity().is_ok());
    }

    #[test]
    fn structural_no_ops() {
        let mut rng = rng();
        let config = MutationConfig::default();
        let mut network = Network::minimal(0, 2, 2, &mut rng);

        assert_eq!(network.mutate_new_link(&config, &mut rng).unwrap(), None);
        assert!(network.mutate_delete_node(&mut rng).unwrap().is_none());

        for _ in 0..6 {
            assert!(network.mutate_delete_link(&mut rng).unwrap().is_some());
        }
        assert!(network.mutate_delete_link(&mut rng).unwrap().is_none());
        assert!(network.mutate_new_node(&mut rng).unwrap().is_none());
        assert!(!network.mutate(MutationType::ModifyWeight, &config, &mut rng).unwrap());
        assert!(network.verify_connectivity().is_ok());
    }

    #[test]
    fn delete_node_removes_touching_links() {
        let mut rng = rng();
        let mut network = Network::minimal(0, 2, 1, &mut rng);
        let node = network.mutate_new_node(&mut rng).unwrap().unwrap();
        let links_before = network.link_count();

        let (deleted, links) = network.mutate_delete_node(&mut rng).unwrap().unwrap();
        assert_eq!(deleted.id(), node);
        assert_eq!(links.len(), 2);
        assert_eq!(network.link_count(), links_before - 2);
        assert!(network.verify_connectivity().is_ok());
    }

    #[test]
    fn feed_forward_links_stay_acyclic() {
        let mut rng = rng();
        let config = MutationConfig {
            allow_recurrent_links: false,
            ..MutationConfig::default()
        };
        let mut network = Network::minimal(0, 2, 2, &mut rng);
        for _ in 0..4 {
            network.mutate_new_node(&mut rng).unwrap();
        }
        while network.mutate_new_link(&config, &mut rng).unwrap().is_some() {}

        for id in network.node_ids() {
            for (target, _) in network.node(id).unwrap().outgoing_links() {
                assert!(!network.reaches(target, id).unwrap());
            }
        }
        let first = network.compute_activation(&[0.3, 0.9]).unwrap();
        assert_eq!(network.compute_activation(&[0.3, 0.9]).unwrap(), first);
    }

    #[test]
    fn recurrent_links_saturate_graph() {
        let mut rng = rng();
        let config = MutationConfig::default();
        let mut network = Network::minimal(0, 1, 1, &mut rng);
        network.mutate_new_node(&mut rng).unwrap();
        while network.mutate_new_link(&config, &mut rng).unwrap().is_some() {}

        // bias, input -> {hidden, output}; hidden <-> output.
        assert_eq!(network.link_count(), 6);
        assert!(network.verify_connectivity().is_ok());
    }

    #[test]
    fn random_mutation_sequences_stay_consistent() {
        let mut rng = rng();
        let config = MutationConfig::default();
        let weights = MutationWeights {
            modify_weight: 2,
            add_link: 4,
            add_node: 3,
            delete_link: 2,
            delete_node: 2,
        };
        for trial in 0..20 {
            let mut network = Network::minimal(trial, 3, 2, &mut rng);
            for _ in 0..60 {
                let mutation = weights.choose(&mut rng).unwrap();
                network.mutate(mutation, &config, &mut rng).unwrap();
                assert!(
                    network.verify_connectivity().is_ok(),
                    "{:?} broke network {}",
                    mutation,
                    network
                );
            }
            assert_eq!(network.inputs().len(), 3);
            assert_eq!(network.outputs().len(), 2);
            assert!(network.compute_activation(&[0.0, 0.5, 1.0]).is_ok());
        }
    }
}
