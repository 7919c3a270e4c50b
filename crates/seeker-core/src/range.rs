//! Range primitives over a [`Document`].
//!
//! A [`Range`] spans the content between two [`Boundary`] points. Boundaries follow the usual
//! editable-surface convention: inside a text node the offset counts characters, inside any
//! other node it counts children.
//!
//! These are the operations a host editing surface provides to the style engine: reading the
//! spanned text, wrapping it, extracting it into a detached fragment, and inserting nodes.

use crate::document::{Document, NodeId};
use crate::text::char_slice;
use std::cmp::Ordering;

/// A point in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    /// Container node.
    pub node: NodeId,
    /// Char offset (text containers) or child index (other containers).
    pub offset: usize,
}

impl Boundary {
    /// Create a boundary point.
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// The point right before `node` in its parent.
    pub fn before(doc: &Document, node: NodeId) -> Option<Self> {
        Some(Self::new(doc.parent(node)?, doc.index_in_parent(node)?))
    }

    /// The point right after `node` in its parent.
    pub fn after(doc: &Document, node: NodeId) -> Option<Self> {
        Some(Self::new(doc.parent(node)?, doc.index_in_parent(node)? + 1))
    }

    fn order_key(&self, doc: &Document) -> Vec<usize> {
        let mut key = doc.path(self.node);
        key.push(self.offset);
        key
    }
}

/// Compare two boundary points in document order.
pub fn compare_boundaries(doc: &Document, a: &Boundary, b: &Boundary) -> Ordering {
    a.order_key(doc).cmp(&b.order_key(doc))
}

/// A wrap was rejected because the range boundaries cut through an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapError {
    /// A non-text node is only partially inside the range.
    PartiallySelected(NodeId),
}

impl std::fmt::Display for WrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapError::PartiallySelected(node) => {
                write!(f, "range partially selects element #{}", node.index())
            }
        }
    }
}

impl std::error::Error for WrapError {}

/// A span between two boundary points, with `start` never after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// First point (in document order).
    pub start: Boundary,
    /// Last point (in document order).
    pub end: Boundary,
}

impl Range {
    /// Create a range between two points in any order.
    pub fn new(doc: &Document, a: Boundary, b: Boundary) -> Self {
        if compare_boundaries(doc, &a, &b) == Ordering::Greater {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// A collapsed range (caret) at `point`.
    pub fn collapsed_at(point: Boundary) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// A range spanning all of `node`'s contents.
    pub fn select_node_contents(doc: &Document, node: NodeId) -> Self {
        Self {
            start: Boundary::new(node, 0),
            end: Boundary::new(node, doc.boundary_len(node)),
        }
    }

    /// Returns `true` if the range spans nothing.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary points.
    pub fn common_ancestor(&self, doc: &Document) -> NodeId {
        doc.common_ancestor(self.start.node, self.end.node)
            .unwrap_or_else(|| doc.root())
    }

    /// Returns `true` if both boundaries are attached to the document.
    pub fn is_attached(&self, doc: &Document) -> bool {
        doc.is_attached(self.start.node) && doc.is_attached(self.end.node)
    }

    /// The text spanned by the range.
    pub fn text(&self, doc: &Document) -> String {
        if self.is_collapsed() {
            return String::new();
        }

        if self.start.node == self.end.node
            && let Some(text) = doc.text(self.start.node)
        {
            return char_slice(text, self.start.offset, self.end.offset).to_string();
        }

        let mut out = String::new();
        for node in doc.text_nodes(self.common_ancestor(doc)) {
            let Some(text) = doc.text(node) else {
                continue;
            };
            let len = doc.boundary_len(node);
            let from = if node == self.start.node {
                self.start.offset
            } else {
                0
            };
            let to = if node == self.end.node {
                self.end.offset
            } else {
                len
            };
            let node_start = Boundary::new(node, from);
            let node_end = Boundary::new(node, to);
            if compare_boundaries(doc, &node_end, &self.start) != Ordering::Greater
                || compare_boundaries(doc, &node_start, &self.end) != Ordering::Less
            {
                continue;
            }
            out.push_str(char_slice(text, from, to));
        }
        out
    }

    /// Returns `true` if `node` lies entirely inside the range.
    pub fn contains_node(&self, doc: &Document, node: NodeId) -> bool {
        let (Some(before), Some(after)) = (
            Boundary::before(doc, node),
            Boundary::after(doc, node),
        ) else {
            return false;
        };
        compare_boundaries(doc, &before, &self.start) != Ordering::Less
            && compare_boundaries(doc, &after, &self.end) != Ordering::Greater
    }

    /// First non-text node that contains exactly one of the two boundary points.
    pub fn partially_selected_element(&self, doc: &Document) -> Option<NodeId> {
        let common = self.common_ancestor(doc);
        let check = |from: NodeId, other: NodeId| {
            doc.inclusive_ancestors(from)
                .take_while(|&node| node != common)
                .find(|&node| !doc.is_text(node) && !doc.is_inclusive_ancestor(node, other))
        };
        check(self.start.node, self.end.node).or_else(|| check(self.end.node, self.start.node))
    }

    /// Wrap the range's contents in `wrapper` in place.
    ///
    /// Fails without touching the document when an element is only partially selected,
    /// since moving half of it into `wrapper` would break the tree's nesting.
    pub fn surround_contents(
        &mut self,
        doc: &mut Document,
        wrapper: NodeId,
    ) -> Result<(), WrapError> {
        if let Some(node) = self.partially_selected_element(doc) {
            return Err(WrapError::PartiallySelected(node));
        }

        for child in doc.children(wrapper).to_vec() {
            doc.detach(child);
        }
        let fragment = self.extract_contents(doc);
        for node in fragment {
            doc.append_child(wrapper, node);
        }
        self.insert_node(doc, wrapper);
        *self = Range::select_node_contents(doc, wrapper);
        Ok(())
    }

    /// Move the range's contents into a detached fragment and collapse the range.
    ///
    /// Elements cut by a boundary stay in the document holding their unselected part; a
    /// shallow clone of each holds the selected part in the fragment.
    pub fn extract_contents(&mut self, doc: &mut Document) -> Vec<NodeId> {
        let mut fragment = Vec::new();
        if self.is_collapsed() {
            return fragment;
        }

        let (start, end) = (self.start, self.end);

        if start.node == end.node && doc.is_text(start.node) {
            let taken = doc.remove_text_range(start.node, start.offset, end.offset);
            fragment.push(doc.create_text(taken));
            *self = Range::collapsed_at(start);
            return fragment;
        }

        let common = self.common_ancestor(doc);
        let child_of_common = |doc: &Document, node: NodeId| {
            doc.inclusive_ancestors(node)
                .find(|&candidate| doc.parent(candidate) == Some(common))
        };

        let first_partial = if doc.is_inclusive_ancestor(start.node, end.node) {
            None
        } else {
            child_of_common(doc, start.node)
        };
        let last_partial = if doc.is_inclusive_ancestor(end.node, start.node) {
            None
        } else {
            child_of_common(doc, end.node)
        };

        let contained: Vec<NodeId> = doc
            .children(common)
            .iter()
            .copied()
            .filter(|&child| self.contains_node(doc, child))
            .collect();

        let collapse_point = if doc.is_inclusive_ancestor(start.node, end.node) {
            start
        } else {
            let mut reference = start.node;
            while let Some(parent) = doc.parent(reference) {
                if doc.is_inclusive_ancestor(parent, end.node) {
                    break;
                }
                reference = parent;
            }
            Boundary::after(doc, reference).unwrap_or(start)
        };

        if let Some(first) = first_partial {
            if doc.is_text(first) {
                let len = doc.boundary_len(first);
                let taken = doc.remove_text_range(first, start.offset, len);
                fragment.push(doc.create_text(taken));
            } else {
                let clone = doc.shallow_clone(first);
                let mut inner = Range {
                    start,
                    end: Boundary::new(first, doc.boundary_len(first)),
                };
                for node in inner.extract_contents(doc) {
                    doc.append_child(clone, node);
                }
                fragment.push(clone);
            }
        }

        for node in contained {
            doc.detach(node);
            fragment.push(node);
        }

        if let Some(last) = last_partial {
            if doc.is_text(last) {
                let taken = doc.remove_text_range(last, 0, end.offset);
                fragment.push(doc.create_text(taken));
            } else {
                let clone = doc.shallow_clone(last);
                let mut inner = Range {
                    start: Boundary::new(last, 0),
                    end,
                };
                for node in inner.extract_contents(doc) {
                    doc.append_child(clone, node);
                }
                fragment.push(clone);
            }
        }

        *self = Range::collapsed_at(collapse_point);
        fragment
    }

    /// Remove the range's contents from the document and collapse the range.
    pub fn delete_contents(&mut self, doc: &mut Document) {
        self.extract_contents(doc);
    }

    /// Insert `node` at the range start, splitting a text container when needed.
    ///
    /// A collapsed range ends up right after the inserted node.
    pub fn insert_node(&mut self, doc: &mut Document, node: NodeId) {
        let start = self.start;
        let was_collapsed = self.is_collapsed();

        if doc.is_text(start.node) {
            let (Some(parent), Some(index)) =
                (doc.parent(start.node), doc.index_in_parent(start.node))
            else {
                return;
            };
            let len = doc.boundary_len(start.node);
            if start.offset == 0 {
                doc.insert_child(parent, index, node);
            } else if start.offset >= len {
                doc.insert_child(parent, index + 1, node);
            } else {
                let right = doc.split_text(start.node, start.offset);
                doc.insert_child(parent, index + 1, node);
                if self.end.node == start.node {
                    self.end = Boundary::new(right, self.end.offset - start.offset);
                }
            }
        } else {
            doc.insert_child(start.node, start.offset, node);
            if self.end.node == start.node && self.end.offset >= start.offset {
                self.end.offset += 1;
            }
        }

        if was_collapsed && let Some(after) = Boundary::after(doc, node) {
            *self = Range::collapsed_at(after);
        }
    }
}
