//! In-memory document host.
//!
//! A small DOM: elements with tags, classes, attributes and inline styles;
//! text nodes; a selector engine; and layout onto a fixed-width cell grid.

mod document;
pub mod selector;
pub mod style;

pub use document::{Dirty, Document, ElementData, NodeId};
pub use selector::SelectorList;
pub use style::InlineStyle;
