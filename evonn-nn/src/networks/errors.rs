use crate::{LinkId, NodeId};

use thiserror::Error;

/// Errors raised by network construction, lookup and evaluation.
///
/// Every variant except [`Inconsistent`](NetworkError::Inconsistent)
/// is a caller error. `Inconsistent` means the graph itself is
/// corrupt, and should be treated as fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// An input vector didn't have one value per input node.
    #[error("input vector has {actual} values but the network has {expected} inputs")]
    InputLengthMismatch { expected: usize, actual: usize },
    /// No node has the requested id.
    #[error("no node with id {0}")]
    UnknownNode(NodeId),
    /// No link has the requested id.
    #[error("no link with id {0}")]
    UnknownLink(LinkId),
    /// A node with the same id already exists.
    #[error("duplicate node insertion with id {0}")]
    DuplicateNode(NodeId),
    /// A link with the same id, or between the same
    /// ordered pair of nodes, already exists.
    #[error("duplicate link insertion with id {link} between {from} -> {to}")]
    DuplicateLink {
        link: LinkId,
        from: NodeId,
        to: NodeId,
    },
    /// The link would be a self-loop or would feed an input or bias node.
    #[error("link {link} cannot connect {from} -> {to}")]
    InvalidLinkEndpoint {
        link: LinkId,
        from: NodeId,
        to: NodeId,
    },
    /// A network needs exactly one bias node.
    #[error("network has {0} bias nodes, expected exactly one")]
    BiasCount(usize),
    /// Only hidden nodes can be removed.
    #[error("node {0} is not a hidden node")]
    NotHidden(NodeId),
    /// The graph's bookkeeping is corrupt.
    #[error("internal consistency fault: {0}")]
    Inconsistent(#[from] ConsistencyFault),
}

impl NetworkError {
    /// Returns `true` if the error reports a corrupted graph
    /// rather than a bad request.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, Self::Inconsistent(_))
    }
}

/// Violations of the invariants linking the node, link,
/// and adjacency views of a network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyFault {
    /// Only one of the two endpoint nodes knows about an edge.
    #[error("node connection mismatch between {from} -> {to}")]
    ConnectionMismatch { from: NodeId, to: NodeId },
    /// A link refers to a node the network doesn't own.
    #[error("link {link} refers to unknown node {node}")]
    DanglingLink { link: LinkId, node: NodeId },
    /// A registered link isn't recorded on its endpoints.
    #[error("link {link} is not registered between {from} -> {to}")]
    DetachedLink {
        link: LinkId,
        from: NodeId,
        to: NodeId,
    },
    /// A role list or the resolution stack names a node
    /// missing from the registry.
    #[error("node {0} is referenced but not registered")]
    UnregisteredNode(NodeId),
    /// A node's adjacency map names a link missing from the registry.
    #[error("node {node} references unregistered link {link}")]
    UnregisteredLink { node: NodeId, link: LinkId },
    /// The adjacency maps don't account for each link exactly twice.
    #[error("registry holds {registered} links but nodes reference {referenced} link ends")]
    LinkCountMismatch { registered: usize, referenced: usize },
}
