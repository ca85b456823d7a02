//! A Network is a mutable, possibly recurrent, directed graph
//! of nodes and weighted links.
//!
//! Nodes and links live in id-keyed registries owned by the
//! network; nodes refer to their links (and links to their
//! endpoints) only by id. Three views of every link must agree:
//! the link registry, the source node's outgoing map and the
//! target node's incoming map. [`Network::verify_connectivity`]
//! checks this.
//!
//! Activation is computed by recursing backwards from each
//! output node. A node met again while it is still being
//! resolved closes a cycle, and contributes its activation from
//! the previous evaluation instead, so recurrent networks keep
//! state from one call to the next.
mod errors;
mod ids;
mod links;
mod nodes;

pub use errors::{ConsistencyFault, NetworkError};
pub use ids::NetworkIdAllocator;
pub use links::{Link, LINK_WEIGHT_INIT_MAX, LINK_WEIGHT_INIT_MIN};
pub use nodes::{Node, NodeRole};

use crate::math::sigmoid;
use crate::rng::RandomDraws;
use crate::{LinkId, NetworkId, NodeId};

use ahash::RandomState;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// One complete neural network topology, with its weights
/// and activation state.
///
/// Supports Serde for convenient network saving and loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Network {
    id: NetworkId,
    nodes: HashMap<NodeId, Node, RandomState>,
    links: HashMap<LinkId, Link, RandomState>,
    inputs: Vec<NodeId>,
    bias: NodeId,
    inputs_and_bias: Vec<NodeId>,
    hidden: Vec<NodeId>,
    outputs: Vec<NodeId>,
    next_node_id: NodeId,
    next_link_id: LinkId,
}

impl Network {
    /// Creates a network with no nodes besides its bias.
    fn with_bias(id: NetworkId, bias: NodeId) -> Network {
        let mut network = Network {
            id,
            nodes: HashMap::default(),
            links: HashMap::default(),
            inputs: vec![],
            bias,
            inputs_and_bias: vec![],
            hidden: vec![],
            outputs: vec![],
            next_node_id: bias + 1,
            next_link_id: 0,
        };
        network.insert_node(Node::new(bias, NodeRole::Bias));
        network
    }

    /// Creates a fully-connected minimal network: one bias node,
    /// `input_count` input nodes and `output_count` output nodes,
    /// with a link from every input (and the bias) to every output.
    /// Weights are drawn uniformly from `[-1, 1)`.
    ///
    /// Node ids are assigned bias first, then inputs, then outputs.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::Network;
    ///
    /// let network = Network::minimal(0, 3, 2, &mut rand::thread_rng());
    ///
    /// assert_eq!(network.node_count(), 3 + 2 + 1);
    /// assert_eq!(network.link_count(), (3 + 1) * 2);
    /// assert!(network.hidden().is_empty());
    /// assert!(network.verify_connectivity().is_ok());
    /// ```
    pub fn minimal<R: Rng + ?Sized>(
        id: NetworkId,
        input_count: usize,
        output_count: usize,
        rng: &mut R,
    ) -> Network {
        let mut network = Network::with_bias(id, 0);
        for _ in 0..input_count {
            network.add_node(NodeRole::Input);
        }
        for _ in 0..output_count {
            network.add_node(NodeRole::Output);
        }

        for source in network.inputs_and_bias.clone() {
            for target in network.outputs.clone() {
                let weight = rng.draw_between(LINK_WEIGHT_INIT_MIN, LINK_WEIGHT_INIT_MAX);
                network.register_link(Link::new(network.next_link_id, source, target, weight));
                network.next_link_id += 1;
            }
        }

        network
    }

    /// Rebuilds a network from plain node and link records,
    /// as produced by the persisted text format.
    ///
    /// Role lists are ordered by node id, and the node and link
    /// id generators resume past the largest ids present.
    ///
    /// # Errors
    /// Returns an error if there isn't exactly one bias node,
    /// if ids are duplicated, or if a link is invalid (unknown
    /// or sensor target, self-loop, parallel edge).
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::{Network, NodeRole};
    ///
    /// let network = Network::from_records(
    ///     12,
    ///     [(0, NodeRole::Bias), (1, NodeRole::Input), (2, NodeRole::Output)],
    ///     [(0, 0, 2, 0.5), (1, 1, 2, -0.5)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(network.id(), 12);
    /// assert_eq!(network.link(1).unwrap().weight(), -0.5);
    /// ```
    pub fn from_records<N, L>(id: NetworkId, nodes: N, links: L) -> Result<Network, NetworkError>
    where
        N: IntoIterator<Item = (NodeId, NodeRole)>,
        L: IntoIterator<Item = (LinkId, NodeId, NodeId, f64)>,
    {
        let mut nodes: Vec<(NodeId, NodeRole)> = nodes.into_iter().collect();
        nodes.sort_unstable_by_key(|(id, _)| *id);

        let biases: Vec<NodeId> = nodes
            .iter()
            .filter(|(_, role)| *role == NodeRole::Bias)
            .map(|(id, _)| *id)
            .collect();
        if biases.len() != 1 {
            return Err(NetworkError::BiasCount(biases.len()));
        }

        let mut network = Network::with_bias(id, biases[0]);
        for (node_id, role) in nodes.into_iter().filter(|(_, r)| *r != NodeRole::Bias) {
            if network.nodes.contains_key(&node_id) {
                return Err(NetworkError::DuplicateNode(node_id));
            }
            network.insert_node(Node::new(node_id, role));
        }
        network.next_node_id = network.nodes.keys().max().map_or(0, |max| max + 1);

        for (link_id, source, target, weight) in links {
            network.insert_link(Link::new(link_id, source, target, weight))?;
        }
        network.next_link_id = network.links.keys().max().map_or(0, |max| max + 1);

        Ok(network)
    }

    /// Adds a node with a fresh id, returning the id.
    fn add_node(&mut self, role: NodeRole) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.insert_node(Node::new(id, role));
        id
    }

    /// Registers a node and files it under its role.
    fn insert_node(&mut self, node: Node) {
        let id = node.id();
        match node.role() {
            NodeRole::Input => {
                self.inputs.push(id);
                self.inputs_and_bias.push(id);
            }
            NodeRole::Bias => {
                self.bias = id;
                self.inputs_and_bias.push(id);
            }
            NodeRole::Hidden => self.hidden.push(id),
            NodeRole::Output => self.outputs.push(id),
        }
        self.nodes.insert(id, node);
    }

    /// Adds an unconnected hidden node, returning its id.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::{Network, NodeRole};
    ///
    /// let mut network = Network::minimal(0, 1, 1, &mut rand::thread_rng());
    /// let hidden = network.add_hidden_node();
    ///
    /// assert_eq!(network.hidden(), &[hidden]);
    /// assert_eq!(network.node(hidden).unwrap().role(), NodeRole::Hidden);
    /// ```
    pub fn add_hidden_node(&mut self) -> NodeId {
        self.add_node(NodeRole::Hidden)
    }

    /// Adds a link with a fresh id from `source` to `target`.
    ///
    /// # Errors
    /// Returns an error if either node is unknown, if the link
    /// would be a self-loop or feed an input or bias node, or
    /// if the two nodes are already connected in that direction.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::Network;
    ///
    /// let mut network = Network::minimal(0, 1, 1, &mut rand::thread_rng());
    /// let hidden = network.add_hidden_node();
    /// let input = network.inputs()[0];
    ///
    /// let link = network.add_link(input, hidden, 0.75).unwrap();
    /// assert_eq!(network.link(link).unwrap().endpoints(), (input, hidden));
    ///
    /// // Parallel links are rejected.
    /// assert!(network.add_link(input, hidden, 0.1).is_err());
    /// ```
    pub fn add_link(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: f64,
    ) -> Result<LinkId, NetworkError> {
        let id = self.insert_link(Link::new(self.next_link_id, source, target, weight))?;
        self.next_link_id += 1;
        Ok(id)
    }

    /// Adds a link between two existing nodes with a
    /// randomized weight in `[-1, 1)`.
    ///
    /// # Errors
    /// As for [`add_link`](Self::add_link).
    pub fn create_link_between<R: Rng + ?Sized>(
        &mut self,
        source: NodeId,
        target: NodeId,
        rng: &mut R,
    ) -> Result<LinkId, NetworkError> {
        let weight = rng.draw_between(LINK_WEIGHT_INIT_MIN, LINK_WEIGHT_INIT_MAX);
        self.add_link(source, target, weight)
    }

    /// Validates and registers a link under its own id.
    fn insert_link(&mut self, link: Link) -> Result<LinkId, NetworkError> {
        let (source, target) = link.endpoints();
        if self.links.contains_key(&link.id()) || self.are_nodes_connected(source, target)? {
            return Err(NetworkError::DuplicateLink {
                link: link.id(),
                from: source,
                to: target,
            });
        }
        if source == target || self.nodes[&target].role().is_sensor() {
            return Err(NetworkError::InvalidLinkEndpoint {
                link: link.id(),
                from: source,
                to: target,
            });
        }
        Ok(self.register_link(link))
    }

    /// Records a link in the registry and on both endpoints.
    /// Assumes both endpoints exist.
    fn register_link(&mut self, link: Link) -> LinkId {
        let (id, (source, target)) = (link.id(), link.endpoints());
        if let Some(node) = self.nodes.get_mut(&source) {
            node.outgoing.insert(target, id);
        }
        if let Some(node) = self.nodes.get_mut(&target) {
            node.incoming.insert(source, id);
        }
        self.links.insert(id, link);
        id
    }

    /// Removes a hidden node from the registry and the hidden list.
    ///
    /// Links touching the node are *not* detached; callers must
    /// remove them first or the network will fail verification.
    /// Use [`delete_hidden_node`](Self::delete_hidden_node) to do both.
    pub(crate) fn remove_hidden_node(&mut self, id: NodeId) -> Result<Node, NetworkError> {
        match self.nodes.get(&id).map(Node::role) {
            Some(NodeRole::Hidden) => {
                self.hidden.retain(|h| *h != id);
                self.nodes
                    .remove(&id)
                    .ok_or(NetworkError::UnknownNode(id))
            }
            Some(_) => Err(NetworkError::NotHidden(id)),
            None => Err(NetworkError::UnknownNode(id)),
        }
    }

    /// Removes a link from the registry only. Its endpoints
    /// must be detached separately with [`detach_link`](Self::detach_link).
    pub(crate) fn remove_link(&mut self, id: LinkId) -> Result<Link, NetworkError> {
        self.links.remove(&id).ok_or(NetworkError::UnknownLink(id))
    }

    /// Removes a link from its endpoints' adjacency maps,
    /// leaving the registry untouched.
    pub(crate) fn detach_link(&mut self, id: LinkId) -> Result<(), NetworkError> {
        let (source, target) = self
            .links
            .get(&id)
            .map(Link::endpoints)
            .ok_or(NetworkError::UnknownLink(id))?;
        if let Some(node) = self.nodes.get_mut(&source) {
            node.outgoing.remove(&target);
        }
        if let Some(node) = self.nodes.get_mut(&target) {
            node.incoming.remove(&source);
        }
        Ok(())
    }

    /// Removes a link from the registry and from both endpoints.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::Network;
    ///
    /// let mut network = Network::minimal(0, 2, 1, &mut rand::thread_rng());
    /// let removed = network.delete_link(0).unwrap();
    ///
    /// assert_eq!(network.link_count(), 2);
    /// assert!(!network.are_nodes_connected(removed.source(), removed.target()).unwrap());
    /// assert!(network.verify_connectivity().is_ok());
    /// ```
    pub fn delete_link(&mut self, id: LinkId) -> Result<Link, NetworkError> {
        self.detach_link(id)?;
        self.remove_link(id)
    }

    /// Removes a hidden node together with every link touching it.
    /// Returns the node and its removed links, incoming links first.
    ///
    /// # Errors
    /// Returns an error if the node is unknown or isn't hidden.
    pub fn delete_hidden_node(&mut self, id: NodeId) -> Result<(Node, Vec<Link>), NetworkError> {
        let node = self.node(id)?;
        if node.role() != NodeRole::Hidden {
            return Err(NetworkError::NotHidden(id));
        }
        let mut touching: Vec<LinkId> = node.incoming.values().copied().collect();
        touching.sort_unstable();
        let mut outgoing: Vec<LinkId> = node.outgoing.values().copied().collect();
        outgoing.sort_unstable();
        // A link can't be both: self-loops are never created.
        touching.extend(outgoing);

        let links = touching
            .into_iter()
            .map(|link| self.delete_link(link))
            .collect::<Result<Vec<_>, _>>()?;
        let node = self.remove_hidden_node(id)?;
        Ok((node, links))
    }

    /// Returns whether `source` links to `target`.
    ///
    /// # Errors
    /// Returns [`NetworkError::UnknownNode`] if either node is
    /// unknown, and a [`ConsistencyFault::ConnectionMismatch`] if
    /// only one of the two nodes records the link.
    pub fn are_nodes_connected(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> Result<bool, NetworkError> {
        let source_node = self.node(source)?;
        let target_node = self.node(target)?;
        let forward = source_node.outgoing.contains_key(&target);
        let backward = target_node.incoming.contains_key(&source);
        if forward != backward {
            return Err(ConsistencyFault::ConnectionMismatch {
                from: source,
                to: target,
            }
            .into());
        }
        Ok(forward)
    }

    /// Checks every invariant tying nodes and links together:
    /// both endpoints of each node pair agree on their connection,
    /// every link's endpoints exist and record the link, and the
    /// adjacency maps hold exactly two entries per link.
    ///
    /// This is `O(n²)` in the node count; it is a diagnostic.
    ///
    /// # Errors
    /// Returns the first [`ConsistencyFault`] found.
    pub fn verify_connectivity(&self) -> Result<(), NetworkError> {
        for source in self.nodes.keys() {
            for target in self.nodes.keys() {
                self.are_nodes_connected(*source, *target)?;
            }
        }

        for link in self.links.values() {
            let (source, target) = link.endpoints();
            for endpoint in [source, target] {
                if !self.nodes.contains_key(&endpoint) {
                    return Err(ConsistencyFault::DanglingLink {
                        link: link.id(),
                        node: endpoint,
                    }
                    .into());
                }
            }
            let recorded = self.nodes[&source].outgoing.get(&target) == Some(&link.id())
                && self.nodes[&target].incoming.get(&source) == Some(&link.id());
            if !self.are_nodes_connected(source, target)? || !recorded {
                return Err(ConsistencyFault::DetachedLink {
                    link: link.id(),
                    from: source,
                    to: target,
                }
                .into());
            }
        }

        let referenced: usize = self.nodes.values().map(Node::degree).sum();
        if referenced != self.links.len() * 2 {
            return Err(ConsistencyFault::LinkCountMismatch {
                registered: self.links.len(),
                referenced,
            }
            .into());
        }
        Ok(())
    }

    /// Computes the network's output for the given input vector
    /// (one value per input node, bias excluded).
    ///
    /// Feed-forward networks return the same outputs for the same
    /// inputs every time. Recurrent networks read the previous
    /// activation of nodes that close a cycle, so their outputs
    /// depend on earlier calls. An output is not on its own
    /// resolution stack: a cycle back into it resolves it once
    /// more before it is resolved as the root.
    ///
    /// # Errors
    /// Returns [`NetworkError::InputLengthMismatch`] for a wrong-sized
    /// input vector, or a consistency fault if the graph is corrupt.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::Network;
    ///
    /// let mut network = Network::minimal(0, 2, 1, &mut rand::thread_rng());
    /// for link in [0, 1, 2] {
    ///     network.set_link_weight(link, 0.0).unwrap();
    /// }
    ///
    /// assert_eq!(network.compute_activation(&[0.0, 0.0]).unwrap(), vec![0.5]);
    /// assert!(network.compute_activation(&[0.0]).is_err());
    /// ```
    pub fn compute_activation(&mut self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if inputs.len() != self.inputs.len() {
            return Err(NetworkError::InputLengthMismatch {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        self.update_input_activation(inputs)?;

        let mut resolving = Vec::new();
        for index in 0..self.outputs.len() {
            let output = self.outputs[index];
            resolving.clear();
            self.resolve_activation(output, &mut resolving)?;
        }

        self.outputs
            .iter()
            .map(|id| self.registered(*id).map(Node::activation))
            .collect()
    }

    /// Shifts each input node's activation into its previous
    /// activation and loads the new input value. The bias
    /// node is permanently at 1 and is left alone.
    fn update_input_activation(&mut self, inputs: &[f64]) -> Result<(), NetworkError> {
        for (id, value) in self.inputs.iter().zip(inputs) {
            let node = self
                .nodes
                .get_mut(id)
                .ok_or(ConsistencyFault::UnregisteredNode(*id))?;
            node.previous_activation = node.activation;
            node.activation = *value;
        }
        Ok(())
    }

    /// Recomputes the activation of `id` from its incoming links,
    /// recursing into sources not already on the `resolving` stack.
    fn resolve_activation(
        &mut self,
        id: NodeId,
        resolving: &mut Vec<NodeId>,
    ) -> Result<(), NetworkError> {
        let node = self.registered(id)?;
        if node.role().is_sensor() {
            return Ok(());
        }
        let mut incoming: Vec<(NodeId, LinkId)> = node.incoming_links().collect();
        // Resolution order decides which cycle member reads stale state.
        incoming.sort_unstable();

        let mut activity = 0.0;
        for (source, link) in incoming {
            let weight = self
                .links
                .get(&link)
                .ok_or(ConsistencyFault::UnregisteredLink { node: id, link })?
                .weight();
            let contribution = if resolving.contains(&source) {
                // Cycle: use last step's value rather than recursing.
                self.registered(source)?.previous_activation()
            } else {
                resolving.push(source);
                self.resolve_activation(source, resolving)?;
                resolving.pop();
                self.registered(source)?.activation()
            };
            activity += weight * contribution;
        }

        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(ConsistencyFault::UnregisteredNode(id))?;
        node.incoming_activity = activity;
        node.previous_activation = node.activation;
        node.activation = sigmoid(activity);
        Ok(())
    }

    /// Returns every non-bias node to rest, discarding
    /// recurrent state.
    pub fn reset_state(&mut self) {
        for node in self.nodes.values_mut() {
            if node.role() != NodeRole::Bias {
                node.activation = 0.0;
                node.previous_activation = 0.0;
                node.incoming_activity = 0.0;
            }
        }
    }

    /// Returns an independent copy of the network under a new
    /// network id. Node ids, link ids, weights and the node and
    /// link id generators are all preserved. The copy starts at
    /// rest, with no recurrent state carried over.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::{Network, NetworkIdAllocator};
    ///
    /// let ids = NetworkIdAllocator::new();
    /// let mut rng = rand::thread_rng();
    /// let original = Network::minimal(ids.next_id(), 2, 2, &mut rng);
    /// let mut copy = original.deep_copy(&ids);
    ///
    /// assert_ne!(copy.id(), original.id());
    /// assert!(copy.verify_connectivity().is_ok());
    ///
    /// copy.set_link_weight(0, 42.0).unwrap();
    /// assert_ne!(original.link(0).unwrap().weight(), 42.0);
    /// ```
    pub fn deep_copy(&self, ids: &NetworkIdAllocator) -> Network {
        let mut copy = Network {
            id: ids.next_id(),
            ..self.clone()
        };
        copy.reset_state();
        copy
    }

    /// Redraws every link weight uniformly from `[-1, 1)`.
    pub fn randomize_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut ids: Vec<LinkId> = self.links.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(link) = self.links.get_mut(&id) {
                link.weight = rng.draw_between(LINK_WEIGHT_INIT_MIN, LINK_WEIGHT_INIT_MAX);
            }
        }
    }

    /// Redraws one link's weight uniformly from `[-1, 1)`.
    ///
    /// # Errors
    /// Returns an error if the link doesn't exist.
    pub fn randomize_link_weight<R: Rng + ?Sized>(
        &mut self,
        id: LinkId,
        rng: &mut R,
    ) -> Result<(), NetworkError> {
        self.set_link_weight(
            id,
            rng.draw_between(LINK_WEIGHT_INIT_MIN, LINK_WEIGHT_INIT_MAX),
        )
    }

    /// Sets one link's weight.
    ///
    /// # Errors
    /// Returns an error if the link doesn't exist.
    pub fn set_link_weight(&mut self, id: LinkId, weight: f64) -> Result<(), NetworkError> {
        self.links
            .get_mut(&id)
            .map(|link| link.weight = weight)
            .ok_or(NetworkError::UnknownLink(id))
    }

    /// Returns whether both networks hold the same link ids
    /// between the same endpoints, which is what weight-level
    /// crossover requires.
    pub fn shares_topology_with(&self, other: &Network) -> bool {
        self.links.len() == other.links.len()
            && self.links.values().all(|link| {
                other
                    .links
                    .get(&link.id())
                    .map_or(false, |o| o.endpoints() == link.endpoints())
            })
    }

    /// Returns the network's id.
    pub fn id(&self) -> NetworkId {
        self.id
    }

    /// Looks up a node.
    ///
    /// # Errors
    /// Returns [`NetworkError::UnknownNode`] if absent.
    pub fn node(&self, id: NodeId) -> Result<&Node, NetworkError> {
        self.nodes.get(&id).ok_or(NetworkError::UnknownNode(id))
    }

    /// Looks up a node the network's own bookkeeping refers to;
    /// absence means the graph is corrupt.
    fn registered(&self, id: NodeId) -> Result<&Node, NetworkError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| ConsistencyFault::UnregisteredNode(id).into())
    }

    /// Looks up a link.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Iterates over all nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates over all links, in no particular order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Returns all node ids in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns all link ids in ascending order.
    pub fn link_ids(&self) -> Vec<LinkId> {
        let mut ids: Vec<LinkId> = self.links.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Input node ids, bias excluded, in input-vector order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// The bias node's id.
    pub fn bias(&self) -> NodeId {
        self.bias
    }

    /// The bias and input node ids, in creation order.
    pub fn inputs_and_bias(&self) -> &[NodeId] {
        &self.inputs_and_bias
    }

    /// Hidden node ids, in creation order.
    pub fn hidden(&self) -> &[NodeId] {
        &self.hidden
    }

    /// Output node ids, in output-vector order.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }
}

/// Renders the network in the persisted text format,
/// nodes and links in ascending id order.
impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network #{}", self.id)?;
        writeln!(f, "Node Count: {}", self.nodes.len())?;
        for id in self.node_ids() {
            writeln!(f, "{}", self.nodes[&id])?;
        }
        writeln!(f, "Link Count: {}", self.links.len())?;
        for id in self.link_ids() {
            writeln!(f, "{}", self.links[&id])?;
        }
        Ok(())
    }
}
