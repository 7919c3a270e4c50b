//! Formatted Document tree
//!
//! The in-memory representation of a note while it is being edited.
//!
//! # Overview
//!
//! A [`Document`] is an arena of nodes rooted at a single [`NodeKind::Root`] container (the
//! editable surface). Every other node is either a run of text or an element carrying one of
//! the closed set of [`Tag`]s. Nodes are addressed by copyable [`NodeId`]s, which stay valid for
//! the lifetime of the document even after the node has been detached from the tree.
//!
//! Offsets inside text nodes are always counted in characters (Unicode scalar values).
//!
//! # Example
//!
//! ```rust
//! use seeker_core::{Document, NodeSnapshot, Tag};
//!
//! let doc = Document::from_snapshots(vec![NodeSnapshot::element(
//!     Tag::Paragraph,
//!     vec![
//!         NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("Hello")]),
//!         NodeSnapshot::text(" world"),
//!     ],
//! )]);
//!
//! assert_eq!(doc.plain_text(), "Hello world");
//! ```

use crate::text::{byte_index, char_len, char_slice};

/// Prompt shown in an otherwise empty note.
pub const PLACEHOLDER_TEXT: &str = "Start writing in SeekerNotes...";

/// Identifier of a node inside a [`Document`].
///
/// Ids are only meaningful for the document that created them; using an id with another
/// document panics or addresses an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Element tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Underlined text.
    Underline,
    /// Text with an explicit font size, in pixels.
    FontSize(u32),
    /// A paragraph (one line of the note).
    Paragraph,
}

impl Tag {
    /// Font-size tag; a zero size is clamped to 1px.
    pub fn font_size(px: u32) -> Self {
        Tag::FontSize(px.max(1))
    }

    /// Returns `true` for every tag except [`Tag::Paragraph`].
    pub fn is_inline(self) -> bool {
        !matches!(self, Tag::Paragraph)
    }

    /// Returns `true` if both tags are the same kind (font sizes compare equal regardless of px).
    pub fn same_kind(self, other: Tag) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The editable container at the top of the tree.
    Root,
    /// A run of characters.
    Text(String),
    /// A formatting or paragraph element.
    Element(Tag),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Owned, id-free copy of a subtree.
///
/// Used to build documents declaratively and to compare document shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSnapshot {
    /// A run of text.
    Text(String),
    /// An element with its children.
    Element(Tag, Vec<NodeSnapshot>),
}

impl NodeSnapshot {
    /// Text snapshot.
    pub fn text(text: impl Into<String>) -> Self {
        NodeSnapshot::Text(text.into())
    }

    /// Element snapshot.
    pub fn element(tag: Tag, children: Vec<NodeSnapshot>) -> Self {
        NodeSnapshot::Element(tag, children)
    }
}

/// Formatted document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root container.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Root)],
            root: NodeId(0),
        }
    }

    /// Create the document shown for an empty note: one paragraph with [`PLACEHOLDER_TEXT`].
    pub fn placeholder() -> Self {
        Self::from_snapshots(vec![NodeSnapshot::element(
            Tag::Paragraph,
            vec![NodeSnapshot::text(PLACEHOLDER_TEXT)],
        )])
    }

    /// Build a document whose root holds the given subtrees.
    pub fn from_snapshots(children: Vec<NodeSnapshot>) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        for child in &children {
            let id = doc.build(child);
            doc.append_child(root, id);
        }
        doc
    }

    fn build(&mut self, snapshot: &NodeSnapshot) -> NodeId {
        match snapshot {
            NodeSnapshot::Text(text) => self.create_text(text.clone()),
            NodeSnapshot::Element(tag, children) => {
                let id = self.create_element(*tag);
                for child in children {
                    let child_id = self.build(child);
                    self.append_child(id, child_id);
                }
                id
            }
        }
    }

    /// Snapshot of the root's children.
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.children(self.root)
            .iter()
            .map(|&child| self.snapshot_node(child))
            .collect()
    }

    /// Snapshot of one node and its descendants. The root is reported as a paragraph holding
    /// its children; use [`Document::snapshot`] for the whole document.
    pub fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
        match &self.data(id).kind {
            NodeKind::Text(text) => NodeSnapshot::Text(text.clone()),
            NodeKind::Element(tag) => NodeSnapshot::Element(
                *tag,
                self.children(id)
                    .iter()
                    .map(|&child| self.snapshot_node(child))
                    .collect(),
            ),
            NodeKind::Root => NodeSnapshot::Element(
                Tag::Paragraph,
                self.children(id)
                    .iter()
                    .map(|&child| self.snapshot_node(child))
                    .collect(),
            ),
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// The root container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated by this document (attached or not).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node kind.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    /// Element tag, or `None` for text and root nodes.
    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        match self.data(id).kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Text of a text node, or `None` for other nodes.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for text nodes.
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Text(_))
    }

    /// Parent node, `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Children in document order (always empty for text nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    /// Create a detached, childless element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let tag = match tag {
            Tag::FontSize(px) => Tag::font_size(px),
            other => other,
        };
        self.alloc(NodeKind::Element(tag))
    }

    /// Create a detached copy of `id` without its children (text nodes keep their text).
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let kind = match &self.data(id).kind {
            NodeKind::Root => NodeKind::Element(Tag::Paragraph),
            other => other.clone(),
        };
        self.alloc(kind)
    }

    /// Replace the text of a text node. No-op for other nodes.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeKind::Text(existing) = &mut self.data_mut(id).kind {
            *existing = text.into();
        }
    }

    /// Insert `text` into a text node at a char offset (clamped). No-op for other nodes.
    pub fn insert_text_at(&mut self, id: NodeId, offset: usize, text: &str) {
        if let NodeKind::Text(existing) = &mut self.data_mut(id).kind {
            let at = byte_index(existing, offset);
            existing.insert_str(at, text);
        }
    }

    /// Remove chars `[start, end)` from a text node and return them.
    pub fn remove_text_range(&mut self, id: NodeId, start: usize, end: usize) -> String {
        match &mut self.data_mut(id).kind {
            NodeKind::Text(existing) => {
                let removed = char_slice(existing, start, end).to_string();
                let start_byte = byte_index(existing, start);
                let end_byte = byte_index(existing, end.max(start));
                existing.replace_range(start_byte..end_byte, "");
                removed
            }
            _ => String::new(),
        }
    }

    /// Detach `id` from its parent. The node and its subtree remain addressable.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.data(id).parent {
            self.data_mut(parent).children.retain(|&child| child != id);
            self.data_mut(id).parent = None;
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among `parent`'s children (clamped to the child count).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if parent == child || self.is_inclusive_ancestor(child, parent) || self.is_text(parent) {
            return;
        }

        let mut index = index;
        if self.parent(child) == Some(parent)
            && let Some(current) = self.index_in_parent(child)
            && current < index
        {
            index -= 1;
        }
        self.detach(child);

        let children = &mut self.data_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.data_mut(child).parent = Some(parent);
    }

    /// Replace `id` in its parent with `replacements`, in order.
    pub fn replace_with(&mut self, id: NodeId, replacements: &[NodeId]) {
        let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) else {
            return;
        };
        self.detach(id);
        for (offset, &replacement) in replacements.iter().enumerate() {
            self.insert_child(parent, index + offset, replacement);
        }
    }

    /// Replace an element with its own children. Returns the moved children.
    pub fn unwrap(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.children(id).to_vec();
        self.replace_with(id, &children);
        children
    }

    /// Split a text node at a char offset.
    ///
    /// The node keeps `[0, offset)`; a new text node holding the rest is inserted right after it
    /// and returned.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> NodeId {
        let len = self.boundary_len(id);
        let tail = self.remove_text_range(id, offset, len);
        let right = self.create_text(tail);
        if let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) {
            self.insert_child(parent, index + 1, right);
        }
        right
    }

    /// "Length" used for boundary offsets: chars for text nodes, child count otherwise.
    pub fn boundary_len(&self, id: NodeId) -> usize {
        match &self.data(id).kind {
            NodeKind::Text(text) => char_len(text),
            _ => self.children(id).len(),
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.data(id).kind {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Character count of [`Document::text_content`].
    pub fn text_len(&self, id: NodeId) -> usize {
        match &self.data(id).kind {
            NodeKind::Text(text) => char_len(text),
            _ => self
                .children(id)
                .iter()
                .map(|&child| self.text_len(child))
                .sum(),
        }
    }

    /// Text node descendants of `id` (including `id` itself) in document order.
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_text_nodes(id, &mut out);
        out
    }

    fn collect_text_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if self.is_text(id) {
            out.push(id);
            return;
        }
        for &child in self.children(id) {
            self.collect_text_nodes(child, out);
        }
    }

    /// `id` followed by its ancestors up to and including the root.
    pub fn inclusive_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inclusive_ancestors(node).any(|id| id == ancestor)
    }

    /// Deepest node that is an inclusive ancestor of both `a` and `b`.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        self.inclusive_ancestors(a)
            .find(|&candidate| self.is_inclusive_ancestor(candidate, b))
    }

    /// Nearest inclusive ancestor whose tag satisfies `pred`.
    pub fn enclosing(&self, id: NodeId, pred: impl Fn(Tag) -> bool) -> Option<NodeId> {
        self.inclusive_ancestors(id)
            .find(|&node| self.tag(node).is_some_and(&pred))
    }

    /// Returns `true` if `id` is connected to the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    /// Child indices leading from the root (or the top of a detached subtree) to `id`.
    pub fn path(&self, id: NodeId) -> Vec<usize> {
        let mut path: Vec<usize> = self
            .inclusive_ancestors(id)
            .filter_map(|node| self.index_in_parent(node))
            .collect();
        path.reverse();
        path
    }

    /// Remove empty text nodes and elements without any text below `id`, and merge adjacent
    /// text nodes.
    pub fn prune_empty(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            if self.is_text(child) {
                if self.boundary_len(child) == 0 {
                    self.detach(child);
                }
            } else if self.text_len(child) == 0 {
                self.detach(child);
            } else {
                self.prune_empty(child);
            }
        }
        self.merge_text_children(id);
    }

    /// Merge runs of adjacent text children of `id` into their first node.
    pub fn merge_text_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut previous_text: Option<NodeId> = None;
        for child in children {
            match (previous_text, self.text(child).map(str::to_string)) {
                (Some(previous), Some(text)) => {
                    let len = self.boundary_len(previous);
                    self.insert_text_at(previous, len, &text);
                    self.detach(child);
                }
                (None, Some(_)) => previous_text = Some(child),
                (_, None) => previous_text = None,
            }
        }
    }

    /// Plain text of the document: paragraphs are separated by `'\n'`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_plain(self.root, &mut out);
        out.trim_end_matches('\n').to_string()
    }

    fn collect_plain(&self, id: NodeId, out: &mut String) {
        match &self.data(id).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(Tag::Paragraph) => {
                for &child in self.children(id) {
                    self.collect_plain(child, out);
                }
                out.push('\n');
            }
            _ => {
                for &child in self.children(id) {
                    self.collect_plain(child, out);
                }
            }
        }
    }
}
