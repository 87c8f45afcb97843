//! Layout Module
//!
//! Cell-grid layout for [`Document`](crate::dom::Document) using Taffy.
//!
//! # Architecture
//!
//! 1. Converts inline styles → Taffy styles
//! 2. Builds a Taffy tree from the document (block elements as column
//!    containers, inline content as measured leaves)
//! 3. Measures inline text by word-wrapping it at the available width
//! 4. Extracts border-box sizes back into a [`DocumentLayout`]
//!
//! The document caches the result and throws it away on the next mutation,
//! so reading a height after a change always costs one full pass. The Taffy
//! tree itself survives a viewport-only change.

mod taffy_bridge;
mod text_measure;
mod types;

pub(crate) use taffy_bridge::LayoutTree;
pub use taffy_bridge::compute_document_layout;
pub use text_measure::*;
pub use types::*;
