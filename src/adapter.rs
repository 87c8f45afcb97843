//! Chainable wrapper over a resolved node collection.
//!
//! The plugin-style entry point: a [`Selection`] forwards to
//! [`shave`](crate::shave()) and hands itself back so calls can be chained.
//!
//! ```
//! use spark_shave::{Document, Selection, ShaveOptions};
//!
//! let mut doc = Document::new(12);
//! let p = doc.create_element("p");
//! doc.set_text_content(p, "alpha beta gamma delta").unwrap();
//! doc.append_child(doc.root(), p).unwrap();
//!
//! let options = ShaveOptions::default();
//! Selection::select(&doc, "p")
//!     .unwrap()
//!     .shave(&mut doc, Some(1.0), &options)
//!     .unwrap()
//!     .unshave(&mut doc, &options)
//!     .unwrap();
//! assert_eq!(doc.text_content(p).unwrap(), "alpha beta gamma delta");
//! ```

use crate::config::ShaveOptions;
use crate::error::ShaveError;
use crate::host::Host;
use crate::shave::{shave, unshave};
use crate::target::Target;

/// An ordered collection of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<N> {
    nodes: Vec<N>,
}

impl<N: Copy + Eq + std::fmt::Debug> Selection<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    /// Select with the host's selector engine.
    pub fn select<H>(host: &H, selector: &str) -> Result<Self, ShaveError>
    where
        H: Host<Node = N> + ?Sized,
    {
        Target::Selector(selector)
            .resolve(host)
            .map(Self::new)
            .map_err(|source| ShaveError::Selector {
                selector: selector.to_string(),
                source,
            })
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Shave every node in the selection.
    pub fn shave<H>(
        &self,
        host: &mut H,
        max_height: Option<f64>,
        options: &ShaveOptions,
    ) -> Result<&Self, ShaveError>
    where
        H: Host<Node = N> + ?Sized,
    {
        shave(host, Target::Nodes(self.nodes.clone()), max_height, options)?;
        Ok(self)
    }

    /// Undo a previous shave on every node in the selection.
    pub fn unshave<H>(&self, host: &mut H, options: &ShaveOptions) -> Result<&Self, ShaveError>
    where
        H: Host<Node = N> + ?Sized,
    {
        unshave(host, Target::Nodes(self.nodes.clone()), options)?;
        Ok(self)
    }
}

impl<N> From<Vec<N>> for Selection<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self { nodes }
    }
}

impl<N> IntoIterator for Selection<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
