//! Taffy Bridge - runs a layout pass over a [`Document`].
//!
//! Block elements become column flex containers. Consecutive inline content
//! (text nodes and inline elements) between blocks becomes one anonymous leaf
//! whose size comes from the word-wrap measure function. `display: none`
//! subtrees are left out of the tree entirely.

use std::fmt;

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display as TaffyDisplay, FlexDirection,
    LengthPercentage, NodeId as TaffyNodeId, Rect, Size, Style, TaffyError, TaffyTree,
};

use crate::dom::{Document, NodeId};
use crate::types::{Dimension, Display, StyleProperty};

use super::text_measure::{line_count, max_content_width, min_content_width};
use super::types::{ComputedBox, DocumentLayout};

/// Measure context attached to anonymous inline leaves.
#[derive(Debug, Clone)]
struct InlineRun {
    text: String,
    line_height: u16,
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

/// Build the Taffy style for a block element.
fn block_style(doc: &Document, node: NodeId) -> Style {
    let Some(inline) = doc.inline_style(node) else {
        return Style::default();
    };

    let padding = LengthPercentage::Length(inline.padding() as f32);
    let mut width = inline.dimension(StyleProperty::Width);
    if node == doc.root() && width.is_auto() {
        width = Dimension::Cells(doc.viewport_width());
    }

    Style {
        display: TaffyDisplay::Flex,
        flex_direction: FlexDirection::Column,
        flex_shrink: 0.0,
        size: Size {
            width: to_taffy_dimension(width),
            height: to_taffy_dimension(inline.dimension(StyleProperty::Height)),
        },
        max_size: Size {
            width: TaffyDimension::Auto,
            height: to_taffy_dimension(inline.dimension(StyleProperty::MaxHeight)),
        },
        padding: Rect {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        },
        ..Default::default()
    }
}

fn run_style() -> Style {
    Style {
        flex_shrink: 0.0,
        ..Default::default()
    }
}

// =============================================================================
// TREE BUILDING
// =============================================================================

struct Builder<'a> {
    doc: &'a Document,
    tree: TaffyTree<InlineRun>,
    /// Block elements and the Taffy nodes generated for them.
    blocks: Vec<(NodeId, TaffyNodeId, u16, u16)>,
}

impl Builder<'_> {
    fn flush_run(
        &mut self,
        run: &mut String,
        line_height: u16,
        children: &mut Vec<TaffyNodeId>,
    ) -> Result<(), TaffyError> {
        if run.trim().is_empty() {
            run.clear();
            return Ok(());
        }
        let leaf = self.tree.new_leaf_with_context(
            run_style(),
            InlineRun {
                text: std::mem::take(run),
                line_height,
            },
        )?;
        children.push(leaf);
        Ok(())
    }

    fn build_block(&mut self, node: NodeId) -> Result<TaffyNodeId, TaffyError> {
        let doc = self.doc;
        let line_height = doc.line_height(node);
        let padding = doc.inline_style(node).map(|s| s.padding()).unwrap_or(0);

        let mut children = Vec::new();
        let mut run = String::new();

        for &child in doc.children(node) {
            if let Some(text) = doc.text_data(child) {
                run.push_str(text);
                continue;
            }
            match doc.computed_display(child) {
                Some(Display::Inline) => run.push_str(&doc.visible_text(child)),
                Some(Display::Block) => {
                    self.flush_run(&mut run, line_height, &mut children)?;
                    children.push(self.build_block(child)?);
                }
                Some(Display::None) | None => {}
            }
        }
        self.flush_run(&mut run, line_height, &mut children)?;

        let id = self.tree.new_with_children(block_style(doc, node), &children)?;
        self.blocks.push((node, id, padding, line_height));
        Ok(id)
    }
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn measure_run(
    run: &InlineRun,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let wrap_width = match (known_dimensions.width, available_space.width) {
        (Some(w), _) => w.max(0.0) as usize,
        (None, AvailableSpace::Definite(w)) => w.max(0.0) as usize,
        (None, AvailableSpace::MinContent) => min_content_width(&run.text),
        (None, AvailableSpace::MaxContent) => max_content_width(&run.text),
    };

    let width = known_dimensions
        .width
        .unwrap_or_else(|| max_content_width(&run.text).min(wrap_width.max(1)) as f32);
    let lines = line_count(&run.text, wrap_width);

    Size {
        width,
        height: known_dimensions
            .height
            .unwrap_or(lines.saturating_mul(run.line_height as usize) as f32),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// A Taffy tree built from a document, kept between passes.
pub(crate) struct LayoutTree {
    tree: TaffyTree<InlineRun>,
    root: TaffyNodeId,
    /// Whether the root takes its width from the viewport.
    root_tracks_viewport: bool,
    blocks: Vec<(NodeId, TaffyNodeId, u16, u16)>,
}

impl fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutTree")
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

impl LayoutTree {
    pub(crate) fn build(doc: &Document) -> Result<Self, TaffyError> {
        let mut builder = Builder {
            doc,
            tree: TaffyTree::new(),
            blocks: Vec::new(),
        };
        let root = builder.build_block(doc.root())?;
        let root_tracks_viewport = doc
            .inline_style(doc.root())
            .is_none_or(|s| s.dimension(StyleProperty::Width).is_auto());

        Ok(Self {
            tree: builder.tree,
            root,
            root_tracks_viewport,
            blocks: builder.blocks,
        })
    }

    /// Follow a viewport change without rebuilding.
    pub(crate) fn resize(&mut self, viewport_width: u16) -> Result<(), TaffyError> {
        if self.root_tracks_viewport {
            let mut style = self.tree.style(self.root)?.clone();
            style.size.width = TaffyDimension::Length(viewport_width as f32);
            self.tree.set_style(self.root, style)?;
        }
        Ok(())
    }

    /// Height is unconstrained: the document grows downward as a page would.
    pub(crate) fn compute(&mut self, viewport_width: u16) -> Result<DocumentLayout, TaffyError> {
        let available = Size {
            width: AvailableSpace::Definite(viewport_width as f32),
            height: AvailableSpace::MaxContent,
        };
        self.tree.compute_layout_with_measure(
            self.root,
            available,
            |known_dimensions, available_space, _node_id, context: Option<&mut InlineRun>, _style| {
                match context {
                    Some(run) => measure_run(run, known_dimensions, available_space),
                    None => Size::ZERO,
                }
            },
        )?;

        let mut result = DocumentLayout::default();
        for &(node, id, padding, line_height) in &self.blocks {
            let layout = self.tree.layout(id)?;
            result.boxes.insert(
                node,
                ComputedBox {
                    width: layout.size.width.round() as u16,
                    height: layout.size.height.round() as u32,
                    padding,
                    line_height,
                },
            );
        }
        Ok(result)
    }
}

/// Lay out the whole document against its viewport width.
pub fn compute_document_layout(doc: &Document) -> Result<DocumentLayout, TaffyError> {
    LayoutTree::build(doc)?.compute(doc.viewport_width())
}
