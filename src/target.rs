//! What a call operates on.

use crate::dom::NodeId;
use crate::error::HostError;
use crate::host::Host;

/// A selector, a single node, or an ordered collection of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a, N> {
    Selector(&'a str),
    Node(N),
    Nodes(Vec<N>),
}

impl<'a, N: Copy> Target<'a, N> {
    /// Resolve to nodes in document or collection order.
    pub fn resolve<H>(self, host: &H) -> Result<Vec<N>, HostError>
    where
        H: Host<Node = N> + ?Sized,
    {
        match self {
            Self::Selector(selector) => host.select(selector),
            Self::Node(node) => Ok(vec![node]),
            Self::Nodes(nodes) => Ok(nodes),
        }
    }

    pub(crate) fn selector(&self) -> Option<&'a str> {
        match self {
            Self::Selector(s) => Some(*s),
            _ => None,
        }
    }
}

impl<'a, N> From<&'a str> for Target<'a, N> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

impl<'a, N> From<Vec<N>> for Target<'a, N> {
    fn from(nodes: Vec<N>) -> Self {
        Self::Nodes(nodes)
    }
}

impl<'a, N: Copy> From<&[N]> for Target<'a, N> {
    fn from(nodes: &[N]) -> Self {
        Self::Nodes(nodes.to_vec())
    }
}

impl<'a> From<NodeId> for Target<'a, NodeId> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}
