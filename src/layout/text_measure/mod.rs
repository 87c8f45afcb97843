//! Text measurement for the cell grid.
//!
//! Uses `unicode-width` for East Asian Width tables and
//! `unicode-segmentation` for grapheme cluster boundaries, so wide
//! characters, emoji sequences and combining marks measure the way a
//! terminal draws them.

mod width;
mod wrap;

pub use width::{char_width, grapheme_width, string_width};
pub use wrap::{line_count, max_content_width, min_content_width, wrap_words};
