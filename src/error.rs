//! Error types.
//!
//! [`ShaveError`] is what a call to [`shave`](crate::shave()) can fail with
//! as a whole. [`HostError`] is raised by a [`Host`](crate::Host) while one
//! element is being processed; the engine isolates those per element and
//! reports them as [`ElementProcessingFailure`].

use thiserror::Error;

/// Fatal errors, raised before any node is mutated.
#[derive(Debug, Error)]
pub enum ShaveError {
    /// A required argument is missing or not a number.
    #[error("{0}")]
    InvalidArgument(&'static str),

    /// The host rejected a selector string.
    #[error("cannot resolve selector `{selector}`")]
    Selector {
        selector: String,
        #[source]
        source: HostError,
    },
}

/// Errors raised by a host document.
#[derive(Debug, Error)]
pub enum HostError {
    /// The node id does not refer to a live node.
    #[error("unknown node {0}")]
    UnknownNode(usize),

    /// The operation needs an element but got another kind of node.
    #[error("node {0} is not an element")]
    NotAnElement(usize),

    /// Inserting the node would create a cycle or adopt the document root.
    #[error("cannot insert node {child} into node {parent}")]
    HierarchyRequest { parent: usize, child: usize },

    /// The selector string could not be parsed.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: &'static str },

    /// A style value the host cannot interpret.
    #[error("invalid value `{value}` for `{property}`")]
    InvalidStyle { property: &'static str, value: String },

    /// The layout pass failed.
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
}

/// A host error tied to the element that raised it.
#[derive(Debug, Error)]
#[error("element #{position} could not be processed")]
pub struct ElementProcessingFailure {
    /// Position of the element in the resolved target sequence.
    pub position: usize,
    #[source]
    pub source: HostError,
}
