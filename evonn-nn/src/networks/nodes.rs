use crate::{LinkId, NodeId};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The function a node performs in its network.
/// Fixed when the node is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// Activation comes from the input vector.
    Input,
    /// Activation is always 1.
    Bias,
    /// Created by mutation; the only removable role.
    Hidden,
    /// Activation is part of the network's result.
    Output,
}

impl NodeRole {
    /// Name used by the persisted text format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Bias => "BIAS",
            Self::Hidden => "HIDDEN",
            Self::Output => "OUTPUT",
        }
    }

    /// Input and bias nodes are never computed, only set.
    pub fn is_sensor(&self) -> bool {
        matches!(self, Self::Input | Self::Bias)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "INPUT" => Ok(Self::Input),
            "BIAS" => Ok(Self::Bias),
            "HIDDEN" => Ok(Self::Hidden),
            "OUTPUT" => Ok(Self::Output),
            other => Err(format!("unknown node role {:?}", other)),
        }
    }
}

/// A single neuron.
///
/// Adjacency is stored as link ids: incoming links are
/// keyed by their source node, outgoing links by their
/// target node. The owning [`Network`] keeps both sides
/// of every link in agreement.
///
/// [`Network`]: crate::networks::Network
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    role: NodeRole,
    pub(super) activation: f64,
    pub(super) previous_activation: f64,
    pub(super) incoming_activity: f64,
    pub(super) incoming: HashMap<NodeId, LinkId, RandomState>,
    pub(super) outgoing: HashMap<NodeId, LinkId, RandomState>,
}

impl Node {
    /// Creates an unconnected node. Bias nodes start (and stay)
    /// fully activated; everything else starts at rest.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::{Node, NodeRole};
    ///
    /// let bias = Node::new(0, NodeRole::Bias);
    /// assert_eq!(bias.activation(), 1.0);
    /// assert_eq!(bias.previous_activation(), 1.0);
    ///
    /// let hidden = Node::new(4, NodeRole::Hidden);
    /// assert_eq!(hidden.activation(), 0.0);
    /// ```
    pub fn new(id: NodeId, role: NodeRole) -> Node {
        let resting = if role == NodeRole::Bias { 1.0 } else { 0.0 };
        Node {
            id,
            role,
            activation: resting,
            previous_activation: resting,
            incoming_activity: 0.0,
            incoming: HashMap::default(),
            outgoing: HashMap::default(),
        }
    }

    /// Returns the node's id, unique within its network.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's role.
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Returns the activation computed by the latest evaluation.
    pub fn activation(&self) -> f64 {
        self.activation
    }

    /// Returns the activation held before the latest evaluation.
    pub fn previous_activation(&self) -> f64 {
        self.previous_activation
    }

    /// Returns the weighted sum of inputs from the latest evaluation.
    pub fn incoming_activity(&self) -> f64 {
        self.incoming_activity
    }

    /// Iterates over `(source node, link)` pairs feeding this node.
    pub fn incoming_links(&self) -> impl Iterator<Item = (NodeId, LinkId)> + '_ {
        self.incoming.iter().map(|(n, l)| (*n, *l))
    }

    /// Iterates over `(target node, link)` pairs leaving this node.
    pub fn outgoing_links(&self) -> impl Iterator<Item = (NodeId, LinkId)> + '_ {
        self.outgoing.iter().map(|(n, l)| (*n, *l))
    }

    /// Returns the number of links touching this node.
    pub fn degree(&self) -> usize {
        self.incoming.len() + self.outgoing.len()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node #{}, {}", self.id, self.role)
    }
}
