//! The document capabilities the truncation engine consumes.
//!
//! Any tree with text, inline styles and a layout engine can be shaved by
//! implementing [`Host`]. [`Document`] is the bundled implementation.

use std::fmt;

use crate::dom::{Document, NodeId};
use crate::error::HostError;
use crate::types::StyleProperty;

/// A live document the engine can read, measure and mutate.
///
/// Every method may fail for a node that is not an element or no longer
/// exists; the engine treats such failures as local to that element.
pub trait Host {
    /// Addressable node handle.
    type Node: Copy + Eq + fmt::Debug;

    /// Evaluate a selector over the whole document, in document order.
    fn select(&self, selector: &str) -> Result<Vec<Self::Node>, HostError>;

    /// All text under the node, hidden text included.
    fn text_content(&self, node: Self::Node) -> Result<String, HostError>;

    /// Replace the node's children with a single text node.
    fn set_text_content(&mut self, node: Self::Node, text: &str) -> Result<(), HostError>;

    /// Inline style value, `""` when not declared.
    fn style(&self, node: Self::Node, property: StyleProperty) -> Result<String, HostError>;

    fn set_style(&mut self, node: Self::Node, property: StyleProperty, value: &str) -> Result<(), HostError>;

    /// Rendered height. Must reflect every mutation made before the call.
    fn offset_height(&mut self, node: Self::Node) -> Result<f64, HostError>;

    /// First descendant carrying `class`.
    fn query_class(&self, node: Self::Node, class: &str) -> Result<Option<Self::Node>, HostError>;

    /// Detach a node from wherever it is.
    fn remove(&mut self, node: Self::Node) -> Result<(), HostError>;

    /// Detach a node the engine created and will not touch again.
    ///
    /// Hosts that own their node storage may reclaim it; the handle must not
    /// be used afterwards. Defaults to [`remove`](Self::remove).
    fn discard(&mut self, node: Self::Node) -> Result<(), HostError> {
        self.remove(node)
    }

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str) -> Result<(), HostError>;

    fn add_class(&mut self, node: Self::Node, class: &str) -> Result<(), HostError>;

    /// Insert `child` at the end of `parent`'s content.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), HostError>;
}

impl Host for Document {
    type Node = NodeId;

    fn select(&self, selector: &str) -> Result<Vec<NodeId>, HostError> {
        self.query_selector_all(selector)
    }

    fn text_content(&self, node: NodeId) -> Result<String, HostError> {
        Document::text_content(self, node)
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), HostError> {
        Document::set_text_content(self, node, text)
    }

    fn style(&self, node: NodeId, property: StyleProperty) -> Result<String, HostError> {
        self.style_value(node, property)
    }

    fn set_style(&mut self, node: NodeId, property: StyleProperty, value: &str) -> Result<(), HostError> {
        Document::set_style(self, node, property, value)
    }

    fn offset_height(&mut self, node: NodeId) -> Result<f64, HostError> {
        Document::offset_height(self, node).map(f64::from)
    }

    fn query_class(&self, node: NodeId, class: &str) -> Result<Option<NodeId>, HostError> {
        self.find_by_class(node, class)
    }

    fn remove(&mut self, node: NodeId) -> Result<(), HostError> {
        Document::remove(self, node)
    }

    fn discard(&mut self, node: NodeId) -> Result<(), HostError> {
        Document::discard(self, node)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        Ok(Document::create_element(self, tag))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        Document::set_attribute(self, node, name, value)
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), HostError> {
        Document::add_class(self, node, class)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        Document::append_child(self, parent, child)
    }
}
