use crate::{LinkId, NodeId};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Lower bound of freshly randomized link weights.
pub const LINK_WEIGHT_INIT_MIN: f64 = -1.0;
/// Upper bound of freshly randomized link weights.
pub const LINK_WEIGHT_INIT_MAX: f64 = 1.0;

/// A directed, weighted connection between two nodes.
///
/// The source node's activation, times the weight,
/// contributes to the target node's incoming activity.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Link {
    id: LinkId,
    source: NodeId,
    target: NodeId,
    pub(super) weight: f64,
}

impl Link {
    /// Returns a new link with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::networks::Link;
    ///
    /// let link = Link::new(7, 0, 3, -0.25);
    /// assert_eq!(link.id(), 7);
    /// assert_eq!(link.endpoints(), (0, 3));
    /// assert_eq!(link.weight(), -0.25);
    /// ```
    pub fn new(id: LinkId, source: NodeId, target: NodeId, weight: f64) -> Link {
        Link {
            id,
            source,
            target,
            weight,
        }
    }

    /// Returns the link's id, unique within its network.
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Returns the node feeding into this link.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the node this link feeds into.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns `(source, target)`.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    /// Returns the link's weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Link #{},{},{},{}",
            self.id, self.source, self.target, self.weight
        )
    }
}
