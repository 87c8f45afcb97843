//! # spark-shave
//!
//! Height-based multi-line text truncation.
//!
//! `shave` cuts an element's text so its rendered height fits a budget,
//! appends a marker (an ellipsis, or a link), and keeps the cut-off text in
//! a hidden node so the original can be restored or re-shaved later.
//!
//! ## Architecture
//!
//! ```text
//! Target → resolve → for each element:
//!   restore previous cut → tokenize → unclamp height → measure
//!     → binary search prefix (mutate, reflow, measure) → commit → restore styles
//! ```
//!
//! The engine talks to documents only through the [`Host`] trait. The crate
//! ships [`Document`], an in-memory DOM laid out on a fixed-width cell grid
//! with Taffy, so truncation is deterministic and runs anywhere.
//!
//! ## Modules
//!
//! - [`shave`](mod@shave) - The truncation engine
//! - [`host`] - Capabilities the engine needs from a document
//! - [`dom`] - In-memory document host
//! - [`layout`] - Taffy layout and Unicode text measurement
//! - [`config`] - Options and defaults
//! - [`render`] - Paint elements to a terminal

pub mod adapter;
pub mod config;
pub mod dom;
pub mod error;
pub mod host;
pub mod layout;
pub mod render;
pub mod report;
pub mod shave;
pub mod target;
pub mod tokenize;
pub mod types;

pub use adapter::Selection;
pub use config::{Config, Link, LinkValue, Marker, ShaveOptions};
pub use dom::{Document, NodeId};
pub use error::{ElementProcessingFailure, HostError, ShaveError};
pub use host::Host;
pub use report::{ElementOutcome, ShaveReport};
pub use shave::{shave, unshave};
pub use target::Target;
pub use tokenize::Tokenizer;
pub use types::{Dimension, Display, StyleProperty};
