//! Arena-backed document tree.
//!
//! Nodes are indices into a flat `Vec`, the same way components are indices
//! into parallel arrays elsewhere in the engine. Detached elements stay in the
//! arena so a caller holding a [`NodeId`] can re-insert them, as a script can
//! keep a reference to an element it removed.
//!
//! Slots are recycled. [`Document::discard`] frees a subtree outright, and
//! text nodes displaced by [`Document::set_text_content`] are freed too. Each
//! slot carries a generation, so a stale id fails with
//! [`HostError::UnknownNode`] instead of aliasing the slot's new occupant.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use tracing::trace;

use crate::error::HostError;
use crate::layout::{ComputedBox, DocumentLayout, LayoutTree, line_count};
use crate::types::{Display, StyleProperty};

use super::selector::{SelectorList, Subject};
use super::style::InlineStyle;

/// Generational index of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// How many times the slot was reused before this node took it.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

bitflags! {
    /// What changed since the last layout pass.
    ///
    /// Only mutations inside the connected tree are recorded. `VIEWPORT` on
    /// its own reuses the cached layout tree; anything else rebuilds it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u8 {
        const TREE = 1 << 0;
        const TEXT = 1 << 1;
        const STYLE = 1 << 2;
        const VIEWPORT = 1 << 3;
    }
}

impl Dirty {
    /// Changes that alter the shape or content of the layout tree.
    pub const REBUILD: Self = Self::TREE.union(Self::TEXT).union(Self::STYLE);
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: InlineStyle,
}

impl ElementData {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }
}

impl Subject for ElementData {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A document rendered onto a fixed-width cell grid.
///
/// The root is a `body` element as wide as the viewport. Every mutation marks
/// the layout dirty; the next [`offset_height`](Self::offset_height) runs a
/// full layout pass, so each height read reflects the mutation right before
/// it.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    viewport_width: u16,
    dirty: Dirty,
    tree: Option<LayoutTree>,
    layout: Option<DocumentLayout>,
    reflows: usize,
}

impl Document {
    /// Create an empty document with the given viewport width in cells.
    pub fn new(viewport_width: u16) -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
            viewport_width,
            dirty: Dirty::all(),
            tree: None,
            layout: None,
            reflows: 0,
        };
        doc.root = doc.create_element("body");
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport_width(&self) -> u16 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        if width != self.viewport_width {
            self.viewport_width = width;
            self.dirty |= Dirty::VIEWPORT;
        }
    }

    /// Number of layout passes run so far.
    pub fn reflow_count(&self) -> usize {
        self.reflows
    }

    /// Changes not yet reflected in the cached layout.
    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Slots in the arena, free ones included.
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    /// Record a change if it can affect what is rendered.
    fn touch(&mut self, id: NodeId, change: Dirty) {
        if self.is_connected(id) {
            self.dirty |= change;
        }
    }

    // =========================================================================
    // Node access
    // =========================================================================

    fn live(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .node
            .as_ref()
    }

    fn node(&self, id: NodeId) -> Result<&Node, HostError> {
        self.live(id).ok_or(HostError::UnknownNode(id.index))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, HostError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(HostError::UnknownNode(id.index))
    }

    /// Element payload of a node.
    pub fn element(&self, id: NodeId) -> Result<&ElementData, HostError> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(HostError::NotAnElement(id.index)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, HostError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(HostError::NotAnElement(id.index)),
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_ok()
    }

    /// Character data of a text node.
    pub fn text_data(&self, id: NodeId) -> Option<&str> {
        match &self.live(id)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.live(id)?.parent
    }

    /// Children in order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.live(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Descendants in tree order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether the node is in the tree under the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            data,
        };
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.node = Some(node);
                return NodeId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        let id = NodeId {
            index: self.slots.len(),
            generation: 0,
        };
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        id
    }

    /// Free a detached node and its whole subtree.
    fn release(&mut self, id: NodeId) {
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            if let Some(slot) = self.slots.get_mut(node.index) {
                if slot.generation == node.generation && slot.node.take().is_some() {
                    slot.generation = slot.generation.wrapping_add(1);
                    self.free.push(node.index);
                }
            }
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: InlineStyle::default(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn detach(&mut self, id: NodeId) -> Result<(), HostError> {
        if let Some(parent) = self.node(id)?.parent {
            self.touch(parent, Dirty::TREE);
            self.node_mut(parent)?.children.retain(|&c| c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.element(parent)?;
        self.node(child)?;
        let cycle = child == parent || self.ancestors(parent).any(|a| a == child);
        if cycle || child == self.root {
            return Err(HostError::HierarchyRequest {
                parent: parent.index,
                child: child.index,
            });
        }

        self.detach(child)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.touch(parent, Dirty::TREE);
        Ok(())
    }

    /// Detach a node from its parent. Removing a detached node is a no-op.
    pub fn remove(&mut self, id: NodeId) -> Result<(), HostError> {
        if id == self.root {
            return Err(HostError::HierarchyRequest {
                parent: id.index,
                child: id.index,
            });
        }
        self.detach(id)
    }

    /// Detach a node and free it together with its subtree.
    ///
    /// Every id inside the subtree becomes stale.
    pub fn discard(&mut self, id: NodeId) -> Result<(), HostError> {
        self.remove(id)?;
        self.release(id);
        Ok(())
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// All descendant text, hidden content included.
    pub fn text_content(&self, id: NodeId) -> Result<String, HostError> {
        match &self.node(id)?.data {
            NodeData::Text(text) => Ok(text.clone()),
            NodeData::Element(_) => Ok(self
                .descendants(id)
                .into_iter()
                .filter_map(|n| self.text_data(n))
                .collect()),
        }
    }

    /// Replace all children with a single text node holding `text`.
    ///
    /// An empty string leaves the element without children. If the first
    /// child already is a text node it is reused. Other displaced text nodes
    /// are freed; displaced elements stay alive, detached.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), HostError> {
        if let NodeData::Text(data) = &mut self.node_mut(id)?.data {
            *data = text.to_string();
            self.touch(id, Dirty::TEXT);
            return Ok(());
        }

        self.touch(id, Dirty::TREE | Dirty::TEXT);
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        let reuse = children
            .first()
            .copied()
            .filter(|&c| !text.is_empty() && self.text_data(c).is_some());
        for &child in &children {
            self.node_mut(child)?.parent = None;
            if Some(child) != reuse && self.text_data(child).is_some() {
                self.release(child);
            }
        }

        if text.is_empty() {
            return Ok(());
        }

        let text_node = match reuse {
            Some(existing) => {
                if let NodeData::Text(data) = &mut self.node_mut(existing)?.data {
                    data.clear();
                    data.push_str(text);
                }
                existing
            }
            None => self.create_text(text),
        };
        self.node_mut(text_node)?.parent = Some(id);
        self.node_mut(id)?.children.push(text_node);
        Ok(())
    }

    /// Rendered text: descendant text outside `display: none` subtrees.
    pub fn inner_text(&self, id: NodeId) -> Result<String, HostError> {
        self.node(id)?;
        Ok(self.visible_text(id))
    }

    pub(crate) fn visible_text(&self, id: NodeId) -> String {
        if let Some(text) = self.text_data(id) {
            return text.to_string();
        }
        if self.computed_display(id) == Some(Display::None) {
            return String::new();
        }
        self.children(id).iter().map(|&c| self.visible_text(c)).collect()
    }

    // =========================================================================
    // Attributes and classes
    // =========================================================================

    /// Attribute value. `class` and `style` reflect the class list and the
    /// inline style.
    pub fn attribute(&self, id: NodeId, name: &str) -> Result<Option<String>, HostError> {
        let el = self.element(id)?;
        Ok(match name {
            "class" if el.classes.is_empty() => None,
            "class" => Some(el.classes.join(" ")),
            "style" => Some(el.style.css_text()).filter(|s| !s.is_empty()),
            _ => el.attributes.get(name).cloned(),
        })
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        match name {
            "class" => {
                // No stylesheet, so classes never change layout.
                self.element_mut(id)?.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => self.set_css_text(id, value)?,
            _ => {
                self.element_mut(id)?
                    .attributes
                    .insert(name.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_ok_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), HostError> {
        let el = self.element_mut(id)?;
        for name in class.split_whitespace() {
            if !el.classes.iter().any(|c| c == name) {
                el.classes.push(name.to_string());
            }
        }
        Ok(())
    }

    // =========================================================================
    // Style
    // =========================================================================

    pub fn inline_style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.element(id).ok().map(|el| &el.style)
    }

    /// Raw inline value of a property, `""` when not declared.
    pub fn style_value(&self, id: NodeId, property: StyleProperty) -> Result<String, HostError> {
        Ok(self.element(id)?.style.get(property).to_string())
    }

    pub fn set_style(&mut self, id: NodeId, property: StyleProperty, value: &str) -> Result<(), HostError> {
        self.element_mut(id)?.style.set(property, value)?;
        self.touch(id, Dirty::STYLE);
        Ok(())
    }

    /// Replace the whole inline style with a declaration block.
    pub fn set_css_text(&mut self, id: NodeId, css: &str) -> Result<(), HostError> {
        let mut style = InlineStyle::default();
        style.apply_css_text(css)?;
        self.element_mut(id)?.style = style;
        self.touch(id, Dirty::STYLE);
        Ok(())
    }

    /// Display type after applying the inline style over the tag default.
    /// `None` for text nodes and unknown ids.
    pub fn computed_display(&self, id: NodeId) -> Option<Display> {
        let el = self.element(id).ok()?;
        Some(el.style.display().unwrap_or_else(|| Display::for_tag(&el.tag)))
    }

    /// Rows per line, inherited from the nearest ancestor that declares it.
    pub fn line_height(&self, id: NodeId) -> u16 {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|n| self.inline_style(n).and_then(InlineStyle::line_height))
            .unwrap_or(1)
    }

    /// Whether the node generates any box: connected and not inside a
    /// `display: none` subtree.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.is_connected(id)
            && std::iter::once(id)
                .chain(self.ancestors(id))
                .all(|n| self.computed_display(n) != Some(Display::None))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn matches(&self, list: &SelectorList, id: NodeId) -> bool {
        let Ok(el) = self.element(id) else {
            return false;
        };
        let ancestors: Vec<&ElementData> = self
            .ancestors(id)
            .filter_map(|a| self.element(a).ok())
            .collect();
        list.matches(el, ancestors.iter().copied())
    }

    /// Elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, HostError> {
        let list = SelectorList::parse(selector)?;
        Ok(std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&n| self.matches(&list, n))
            .collect())
    }

    /// First descendant of `scope` carrying `class`.
    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Result<Option<NodeId>, HostError> {
        self.node(scope)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|&n| self.has_class(n, class)))
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Run a layout pass if anything changed since the last one.
    ///
    /// Tree, text or style changes rebuild the Taffy tree. A viewport change
    /// alone only resizes the root and recomputes the cached tree.
    pub fn layout(&mut self) -> Result<&DocumentLayout, HostError> {
        if self.layout.is_none() || !self.dirty.is_empty() {
            let width = self.viewport_width;
            let mut tree = match self.tree.take() {
                Some(mut tree) if !self.dirty.intersects(Dirty::REBUILD) => {
                    tree.resize(width)?;
                    tree
                }
                _ => LayoutTree::build(self)?,
            };
            trace!(dirty = ?self.dirty, "reflow");
            self.layout = Some(tree.compute(width)?);
            self.tree = Some(tree);
            self.dirty = Dirty::empty();
            self.reflows += 1;
        }
        Ok(self.layout.get_or_insert_with(DocumentLayout::default))
    }

    /// Box of a block element, `None` when it generates no block box.
    pub fn layout_box(&mut self, id: NodeId) -> Result<Option<ComputedBox>, HostError> {
        self.element(id)?;
        Ok(self.layout()?.get(id).copied())
    }

    /// Rendered height in rows, like `HTMLElement.offsetHeight`.
    ///
    /// Zero for elements that are detached or hidden. An inline element
    /// reports the rows its own text takes at its containing block's width.
    pub fn offset_height(&mut self, id: NodeId) -> Result<u32, HostError> {
        self.element(id)?;
        if !self.is_rendered(id) {
            return Ok(0);
        }
        if let Some(b) = self.layout_box(id)? {
            return Ok(b.height);
        }

        let container = self
            .ancestors(id)
            .find(|&a| self.computed_display(a) == Some(Display::Block))
            .unwrap_or(self.root);
        let width = self
            .layout_box(container)?
            .map(|b| b.content_width())
            .unwrap_or(self.viewport_width);
        let lines = line_count(&self.visible_text(id), width as usize);
        let lines = u32::try_from(lines).unwrap_or(u32::MAX);
        Ok(lines.saturating_mul(u32::from(self.line_height(id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(doc: &mut Document, css: &str, text: &str) -> NodeId {
        let p = doc.create_element("p");
        doc.set_css_text(p, css).unwrap();
        doc.set_text_content(p, text).unwrap();
        doc.append_child(doc.root(), p).unwrap();
        p
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        let span = doc.create_element("span");
        doc.set_css_text(span, "display: none").unwrap();
        doc.set_text_content(span, " beta").unwrap();
        doc.append_child(p, span).unwrap();

        assert_eq!(doc.text_content(p).unwrap(), "alpha beta");
        assert_eq!(doc.inner_text(p).unwrap(), "alpha");
    }

    #[test]
    fn test_set_text_content_collapses_children() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        let span = doc.create_element("span");
        doc.set_text_content(span, " beta").unwrap();
        doc.append_child(p, span).unwrap();
        assert_eq!(doc.children(p).len(), 2);

        let text = doc.text_content(p).unwrap();
        doc.set_text_content(p, &text).unwrap();
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p).unwrap(), "alpha beta");
        assert_eq!(doc.parent(span), None);
    }

    #[test]
    fn test_set_text_content_reuses_text_node() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        let first = doc.children(p)[0];
        doc.set_text_content(p, "beta").unwrap();
        assert_eq!(doc.children(p), &[first]);
        assert_eq!(doc.text_data(first), Some("beta"));
    }

    #[test]
    fn test_set_empty_text_removes_children() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        doc.set_text_content(p, "").unwrap();
        assert!(doc.children(p).is_empty());
        assert_eq!(doc.text_content(p).unwrap(), "");
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new(40);
        let a = paragraph(&mut doc, "", "a");
        let b = paragraph(&mut doc, "", "b");
        let span = doc.create_element("span");
        doc.append_child(a, span).unwrap();
        doc.append_child(b, span).unwrap();
        assert_eq!(doc.parent(span), Some(b));
        assert!(!doc.children(a).contains(&span));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = Document::new(40);
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        assert!(matches!(
            doc.append_child(inner, outer),
            Err(HostError::HierarchyRequest { .. })
        ));
        assert!(doc.append_child(outer, outer).is_err());
        assert!(doc.append_child(outer, doc.root()).is_err());
    }

    #[test]
    fn test_text_node_is_not_an_element() {
        let mut doc = Document::new(40);
        let text = doc.create_text("loose");
        assert!(matches!(
            doc.set_style(text, StyleProperty::Height, "1"),
            Err(HostError::NotAnElement(_))
        ));
        let unknown = NodeId {
            index: 999,
            generation: 0,
        };
        assert!(matches!(doc.offset_height(unknown), Err(HostError::UnknownNode(999))));
    }

    #[test]
    fn test_class_and_style_attributes() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "x");
        doc.set_attribute(p, "class", "a b").unwrap();
        doc.add_class(p, "c a").unwrap();
        assert_eq!(doc.attribute(p, "class").unwrap().as_deref(), Some("a b c"));

        doc.set_attribute(p, "style", "height: 2").unwrap();
        assert_eq!(doc.style_value(p, StyleProperty::Height).unwrap(), "2");
        assert_eq!(doc.attribute(p, "style").unwrap().as_deref(), Some("height: 2;"));

        doc.set_attribute(p, "href", "https://x").unwrap();
        assert_eq!(doc.attribute(p, "href").unwrap().as_deref(), Some("https://x"));
    }

    #[test]
    fn test_query_selector_all_in_document_order() {
        let mut doc = Document::new(40);
        let a = paragraph(&mut doc, "", "a");
        let b = paragraph(&mut doc, "", "b");
        doc.add_class(b, "note").unwrap();
        let c = paragraph(&mut doc, "", "c");
        doc.add_class(c, "note").unwrap();

        assert_eq!(doc.query_selector_all("p").unwrap(), vec![a, b, c]);
        assert_eq!(doc.query_selector_all(".note").unwrap(), vec![b, c]);
        assert_eq!(doc.query_selector_all("body .note").unwrap(), vec![b, c]);
        assert!(doc.query_selector_all(".missing").unwrap().is_empty());
        assert!(doc.query_selector_all("p >").is_err());
    }

    #[test]
    fn test_find_by_class_searches_descendants_only() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "a");
        doc.add_class(p, "js-shave").unwrap();
        assert_eq!(doc.find_by_class(p, "js-shave").unwrap(), None);

        let span = doc.create_element("span");
        doc.add_class(span, "js-shave").unwrap();
        doc.append_child(p, span).unwrap();
        assert_eq!(doc.find_by_class(p, "js-shave").unwrap(), Some(span));
    }

    #[test]
    fn test_offset_height_and_reflow_count() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 10", "alpha beta gamma delta");
        assert_eq!(doc.offset_height(p).unwrap(), 3);
        let reflows = doc.reflow_count();

        // Clean layout is reused
        assert_eq!(doc.offset_height(p).unwrap(), 3);
        assert_eq!(doc.reflow_count(), reflows);

        // Any mutation forces a new pass
        doc.set_text_content(p, "alpha").unwrap();
        assert!(doc.dirty().contains(Dirty::TEXT));
        assert_eq!(doc.offset_height(p).unwrap(), 1);
        assert_eq!(doc.reflow_count(), reflows + 1);
    }

    #[test]
    fn test_offset_height_hidden_and_detached() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "display: none", "alpha beta");
        assert_eq!(doc.offset_height(p).unwrap(), 0);

        let loose = doc.create_element("p");
        doc.set_text_content(loose, "alpha").unwrap();
        assert_eq!(doc.offset_height(loose).unwrap(), 0);
    }

    #[test]
    fn test_offset_height_of_inline_element() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 10", "");
        let span = doc.create_element("span");
        doc.set_text_content(span, "alpha beta gamma delta").unwrap();
        doc.append_child(p, span).unwrap();
        assert_eq!(doc.offset_height(span).unwrap(), 3);
    }

    #[test]
    fn test_offset_height_beyond_u16() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 1", "");
        let span = doc.create_element("span");
        let words = vec!["a"; 65_537].join(" ");
        doc.set_text_content(span, &words).unwrap();
        doc.append_child(p, span).unwrap();

        assert_eq!(doc.offset_height(span).unwrap(), 65_537);
        assert_eq!(doc.offset_height(p).unwrap(), 65_537);
    }

    #[test]
    fn test_discard_recycles_subtree() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        let span = doc.create_element("span");
        doc.set_text_content(span, "beta").unwrap();
        let text = doc.children(span)[0];
        doc.append_child(p, span).unwrap();
        let slots = doc.arena_len();

        doc.discard(span).unwrap();
        assert_eq!(doc.children(p).len(), 1);
        assert!(matches!(doc.element(span), Err(HostError::UnknownNode(_))));
        assert_eq!(doc.text_data(text), None);

        let reused = doc.create_element("span");
        doc.set_text_content(reused, "gamma").unwrap();
        assert_eq!(doc.arena_len(), slots);
        assert_ne!(reused, span);
        assert!(doc.discard(doc.root()).is_err());
    }

    #[test]
    fn test_displaced_text_nodes_are_recycled() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        let old = doc.children(p)[0];
        let slots = doc.arena_len();

        doc.set_text_content(p, "").unwrap();
        assert_eq!(doc.text_data(old), None);
        for text in ["beta", "", "gamma", ""] {
            doc.set_text_content(p, text).unwrap();
        }
        doc.set_text_content(p, "delta").unwrap();
        assert_eq!(doc.arena_len(), slots);
        assert_eq!(doc.text_content(p).unwrap(), "delta");
    }

    #[test]
    fn test_only_rendered_changes_mark_dirty() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha");
        doc.layout().unwrap();
        assert!(doc.dirty().is_empty());

        let loose = doc.create_element("span");
        doc.set_text_content(loose, "beta").unwrap();
        doc.set_style(loose, StyleProperty::Display, "none").unwrap();
        doc.add_class(p, "note").unwrap();
        assert!(doc.dirty().is_empty());

        doc.append_child(p, loose).unwrap();
        assert_eq!(doc.dirty(), Dirty::TREE);
        doc.set_style(p, StyleProperty::Width, "10").unwrap();
        assert!(doc.dirty().intersects(Dirty::REBUILD));
    }

    #[test]
    fn test_viewport_change_marks_dirty() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "", "alpha beta gamma delta");
        assert_eq!(doc.offset_height(p).unwrap(), 1);
        doc.set_viewport_width(10);
        assert_eq!(doc.dirty(), Dirty::VIEWPORT);
        assert_eq!(doc.offset_height(p).unwrap(), 3);
        assert_eq!(doc.layout_box(doc.root()).unwrap().map(|b| b.width), Some(10));
    }
}
