//! Layout output types.

use std::collections::HashMap;

use crate::dom::NodeId;

/// The border box computed for one block element, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedBox {
    pub width: u16,
    /// Rows. Wider than `width` since text can wrap to any number of lines.
    pub height: u32,
    /// Padding on each side.
    pub padding: u16,
    /// Rows per line of text inside this box.
    pub line_height: u16,
}

impl ComputedBox {
    /// Width available to inline content.
    #[inline]
    pub fn content_width(&self) -> u16 {
        self.width.saturating_sub(self.padding.saturating_mul(2))
    }

    /// Height available to inline content.
    #[inline]
    pub fn content_height(&self) -> u32 {
        self.height.saturating_sub(u32::from(self.padding) * 2)
    }
}

/// Result of one layout pass over a document.
///
/// Only block-level elements that generate a box appear here. Inline
/// elements flow into their containing block's lines.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub(crate) boxes: HashMap<NodeId, ComputedBox>,
}

impl DocumentLayout {
    /// Box computed for a block element.
    pub fn get(&self, node: NodeId) -> Option<&ComputedBox> {
        self.boxes.get(&node)
    }

    /// Number of boxes produced.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
