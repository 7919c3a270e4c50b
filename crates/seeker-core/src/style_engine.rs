//! Style Engine
//!
//! Toggles inline styles over the host's current selection and tracks which styles are active,
//! with the semantics users expect from a rich-text toolbar.
//!
//! # Overview
//!
//! [`StyleEngine::toggle_style`] picks one of three paths depending on the selection:
//!
//! - **Caret**: nothing is spanned, so the style is recorded as pending typing formatting on the
//!   [`Selection`]; text typed next inherits it (see [`crate::editing::insert_text`]).
//! - **Removal**: the selected text sits entirely inside an element of the requested style (in
//!   each paragraph, for a selection crossing paragraphs). That element is split into a
//!   still-styled part before the selection, the now-unstyled selected content, and a
//!   still-styled part after it.
//! - **Application**: anything else. The spanned content is wrapped in a new element, either in
//!   place or, when the boundaries cut through other elements, by extracting the content and
//!   re-inserting it inside the new element.
//!
//! After every toggle the engine is *settling*: the host calls [`StyleEngine::settle`] once its
//! surface has caught up, which recomputes the active styles, notifies subscribers and accepts
//! toggles again. Toggle requests that arrive while settling are ignored.
//!
//! # Example
//!
//! ```rust
//! use seeker_core::{Boundary, Range, Selection, StyleEngine, StyleKey, ToggleOutcome};
//!
//! let mut doc = seeker_core::snt::parse("[FONT:GEIST_SANS]\nHello world");
//! let text = doc.text_nodes(doc.root())[0];
//! let mut selection = Selection::from_range(Range::new(
//!     &doc,
//!     Boundary::new(text, 0),
//!     Boundary::new(text, 5),
//! ));
//!
//! let mut engine = StyleEngine::new();
//! let outcome = engine.toggle_style(StyleKey::Bold, &mut doc, &mut selection);
//! assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
//! engine.settle(&doc, &selection);
//!
//! assert!(engine.is_style_active(StyleKey::Bold));
//! assert_eq!(
//!     seeker_core::snt::serialize(&doc, seeker_core::FontChoice::Normal),
//!     "[FONT:GEIST_SANS]\n[BOLD]Hello[/BOLD] world"
//! );
//! ```

use crate::document::{Document, NodeId, Tag};
use crate::keybind::{KeyPress, style_for_key};
use crate::range::{Boundary, Range, compare_boundaries};
use crate::selection::Selection;
use crate::split::{Bias, split_element_at_offset, text_offset_within};
use crate::styles::{DEFAULT_FONT_SIZE, StyleKey, StyleSet, compute_active_styles, current_font_size};
use std::cmp::Ordering;
use tracing::debug;

/// Result of a style request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The selection was a caret; formatting is pending for typed text.
    CaretFormatting,
    /// The selected content was wrapped in new element(s).
    Applied {
        /// The first (usually only) wrapper element created.
        wrapper: NodeId,
    },
    /// The style was removed from the selected content.
    Removed,
    /// No selection, or nothing selected: the document was not touched.
    Ignored,
    /// A previous toggle is still settling; the request was dropped.
    Busy,
}

/// Callback invoked with the freshly computed active styles.
pub type ActiveStylesCallback = Box<dyn FnMut(&StyleSet) + Send>;

/// Selection-aware inline style toggler.
pub struct StyleEngine {
    active: StyleSet,
    settling: bool,
    font_size: u32,
    observers: Vec<ActiveStylesCallback>,
}

impl Default for StyleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StyleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleEngine")
            .field("active", &self.active)
            .field("settling", &self.settling)
            .field("font_size", &self.font_size)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl StyleEngine {
    /// Create an engine with no active styles and the default font size.
    pub fn new() -> Self {
        Self {
            active: StyleSet::new(),
            settling: false,
            font_size: DEFAULT_FONT_SIZE,
            observers: Vec::new(),
        }
    }

    /// Register a callback for active-style updates.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StyleSet) + Send + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Returns `true` between a toggle and the matching [`StyleEngine::settle`].
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// Toggle `key` over the current selection.
    ///
    /// Keyboard shortcuts and toolbar buttons both end up here.
    pub fn toggle_style(
        &mut self,
        key: StyleKey,
        doc: &mut Document,
        selection: &mut Selection,
    ) -> ToggleOutcome {
        if self.settling {
            debug!(?key, "toggle ignored while the previous one settles");
            return ToggleOutcome::Busy;
        }

        let Some(range) = selection.range().copied() else {
            return ToggleOutcome::Ignored;
        };
        if !range.is_attached(doc) {
            debug!(?key, "toggle ignored for a detached selection");
            return ToggleOutcome::Ignored;
        }

        if range.is_collapsed() {
            selection.toggle_typing_style(key);
            self.settling = true;
            debug!(?key, "style pending at caret");
            return ToggleOutcome::CaretFormatting;
        }

        if range.text(doc).is_empty() {
            return ToggleOutcome::Ignored;
        }

        let tag = key.tag();
        let outcome = match styled_segments(doc, &range, tag) {
            Some(segments) => {
                debug!(?key, blocks = segments.len(), "removing style from selection");
                let mut unstyled: Vec<Range> = segments
                    .iter()
                    .rev()
                    .map(|&(segment, element)| remove_style(doc, &segment, element))
                    .collect();
                unstyled.reverse();
                if let (Some(first), Some(last)) = (unstyled.first(), unstyled.last()) {
                    selection.set_range(Range {
                        start: first.start,
                        end: last.end,
                    });
                }
                ToggleOutcome::Removed
            }
            None => {
                debug!(?key, "applying style to selection");
                let wrapper = apply_tag(doc, selection, &range, tag);
                ToggleOutcome::Applied { wrapper }
            }
        };

        self.settling = true;
        outcome
    }

    /// Follow-up to a toggle once the host surface has settled.
    ///
    /// Recomputes the active styles, notifies subscribers and accepts toggles again.
    pub fn settle(&mut self, doc: &Document, selection: &Selection) -> StyleSet {
        self.update_active_styles(doc, selection);
        self.settling = false;
        self.active
    }

    /// Recompute the active styles from the selection and notify subscribers.
    ///
    /// Hosts call this on every selection change.
    pub fn update_active_styles(&mut self, doc: &Document, selection: &Selection) {
        self.active = compute_active_styles(doc, selection);
        let active = self.active;
        for observer in &mut self.observers {
            observer(&active);
        }
    }

    /// Whether `key` was active at the last update.
    pub fn is_style_active(&self, key: StyleKey) -> bool {
        self.active.contains(key)
    }

    /// Active styles at the last update.
    pub fn active_styles(&self) -> StyleSet {
        self.active
    }

    /// Dispatch a key press bound to a style. Returns `None` for unbound keys.
    pub fn handle_key(
        &mut self,
        press: &KeyPress,
        doc: &mut Document,
        selection: &mut Selection,
    ) -> Option<ToggleOutcome> {
        let key = style_for_key(press)?;
        Some(self.toggle_style(key, doc, selection))
    }

    /// Last font size requested through [`StyleEngine::apply_font_size`].
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Font size at the selection, falling back to the last requested size.
    pub fn current_font_size(&self, doc: &Document, selection: &Selection) -> u32 {
        current_font_size(doc, selection, self.font_size)
    }

    /// Apply a font size to the selection.
    ///
    /// A caret records the size for typed text; a non-empty selection is wrapped in a
    /// font-size element.
    pub fn apply_font_size(
        &mut self,
        px: u32,
        doc: &mut Document,
        selection: &mut Selection,
    ) -> ToggleOutcome {
        let px = px.max(1);
        self.font_size = px;

        let Some(range) = selection.range().copied() else {
            return ToggleOutcome::Ignored;
        };
        if !range.is_attached(doc) {
            return ToggleOutcome::Ignored;
        }

        if range.is_collapsed() {
            selection.set_typing_font_size(px);
            return ToggleOutcome::CaretFormatting;
        }
        if range.text(doc).is_empty() {
            return ToggleOutcome::Ignored;
        }

        debug!(px, "applying font size to selection");
        let wrapper = apply_tag(doc, selection, &range, Tag::font_size(px));
        ToggleOutcome::Applied { wrapper }
    }
}

/// Nearest element tagged like `tag` enclosing `node` (the root is never a match).
fn find_styled_parent(doc: &Document, node: NodeId, tag: Tag) -> Option<NodeId> {
    let start = if doc.is_text(node) {
        doc.parent(node)?
    } else {
        node
    };
    doc.inclusive_ancestors(start)
        .take_while(|&id| id != doc.root())
        .find(|&id| doc.tag(id).is_some_and(|found| found.same_kind(tag)))
}

fn selection_within(doc: &Document, range: &Range, element: NodeId) -> bool {
    doc.is_inclusive_ancestor(element, range.common_ancestor(doc))
}

/// The range shrunk to its first and last selected characters.
fn text_bounds(doc: &Document, range: &Range) -> Option<Range> {
    let mut first = None;
    let mut last = None;
    for node in doc.text_nodes(range.common_ancestor(doc)) {
        let len = doc.boundary_len(node);
        let from = if node == range.start.node {
            range.start.offset
        } else if compare_boundaries(doc, &Boundary::new(node, 0), &range.start) == Ordering::Less {
            len
        } else {
            0
        };
        let to = if node == range.end.node {
            range.end.offset
        } else if compare_boundaries(doc, &Boundary::new(node, len), &range.end) == Ordering::Greater
        {
            0
        } else {
            len
        };
        if from < to {
            first.get_or_insert(Boundary::new(node, from));
            last = Some(Boundary::new(node, to));
        }
    }
    Some(Range {
        start: first?,
        end: last?,
    })
}

/// Per-block text ranges paired with the `tag` element holding each of them, or `None` when
/// some selected text is not inside such an element.
fn styled_segments(doc: &Document, range: &Range, tag: Tag) -> Option<Vec<(Range, NodeId)>> {
    let mut styled = Vec::new();
    for segment in block_segments(doc, range) {
        let Some(bounds) = text_bounds(doc, &segment) else {
            continue;
        };
        let element = find_styled_parent(doc, bounds.start.node, tag)?;
        if !selection_within(doc, &bounds, element) {
            return None;
        }
        styled.push((bounds, element));
    }
    if styled.is_empty() { None } else { Some(styled) }
}

/// Unstyle `range` inside `element` and return the range covering the unstyled content.
fn remove_style(doc: &mut Document, range: &Range, element: NodeId) -> Range {
    let Some(parent) = doc.parent(element) else {
        return *range;
    };

    let start = text_offset_within(doc, element, range.start);
    let end = start + range.text(doc).chars().count();
    debug!(start, end, "splitting styled element");

    // Cut the tail first so `start` still addresses the same text afterwards.
    let after = split_element_at_offset(doc, element, end, Bias::Before);
    let middle = split_element_at_offset(doc, element, start, Bias::After);
    let before = element;

    for part in [before, after] {
        if doc.text_len(part) == 0 {
            doc.detach(part);
        } else {
            doc.prune_empty(part);
        }
    }

    let unstyled: Vec<NodeId> = doc
        .unwrap(middle)
        .into_iter()
        .filter(|&node| {
            if doc.text_len(node) == 0 {
                doc.detach(node);
                false
            } else {
                if !doc.is_text(node) {
                    doc.prune_empty(node);
                }
                true
            }
        })
        .collect();

    match (unstyled.first(), unstyled.last()) {
        (Some(&first), Some(&last)) if first == last && doc.is_text(first) => {
            Range::select_node_contents(doc, first)
        }
        (Some(&first), Some(&last)) => {
            let start = Boundary::before(doc, first).unwrap_or(Boundary::new(parent, 0));
            let end = Boundary::after(doc, last).unwrap_or(start);
            Range { start, end }
        }
        _ => Range::collapsed_at(Boundary::before(doc, element).unwrap_or(Boundary::new(parent, 0))),
    }
}

/// Wrap the range's content in new `tag` elements and select the result.
///
/// A range spanning several root-level blocks is wrapped block by block so paragraphs never
/// end up inside inline elements.
fn apply_tag(doc: &mut Document, selection: &mut Selection, range: &Range, tag: Tag) -> NodeId {
    let segments = block_segments(doc, range);

    let mut wrappers = Vec::with_capacity(segments.len());
    for segment in segments.iter().rev() {
        if segment.text(doc).is_empty() {
            continue;
        }
        wrappers.push(wrap_segment(doc, segment, tag));
    }
    wrappers.reverse();

    match (wrappers.first(), wrappers.last()) {
        (Some(&first), Some(&last)) => {
            let new_range = Range {
                start: Boundary::new(first, 0),
                end: Boundary::new(last, doc.boundary_len(last)),
            };
            selection.set_range(new_range);
            first
        }
        _ => {
            let wrapper = wrap_segment(doc, range, tag);
            selection.set_range(Range::select_node_contents(doc, wrapper));
            wrapper
        }
    }
}

fn wrap_segment(doc: &mut Document, range: &Range, tag: Tag) -> NodeId {
    let wrapper = doc.create_element(tag);
    let mut working = *range;
    if let Err(err) = working.surround_contents(doc, wrapper) {
        debug!(%err, "wrap rejected, extracting and re-inserting");
        let fragment = working.extract_contents(doc);
        for node in fragment {
            doc.append_child(wrapper, node);
        }
        working.insert_node(doc, wrapper);
        drop_emptied_neighbours(doc, wrapper);
    }
    wrapper
}

/// Remove the empty shells extraction leaves next to `wrapper`, and empty nodes inside it.
fn drop_emptied_neighbours(doc: &mut Document, wrapper: NodeId) {
    doc.prune_empty(wrapper);
    let (Some(parent), Some(index)) = (doc.parent(wrapper), doc.index_in_parent(wrapper)) else {
        return;
    };
    let siblings = doc.children(parent);
    let neighbours: Vec<NodeId> = [index.checked_sub(1), Some(index + 1)]
        .into_iter()
        .flatten()
        .filter_map(|at| siblings.get(at).copied())
        .collect();
    for sibling in neighbours {
        let inline = doc.is_text(sibling) || doc.tag(sibling).is_some_and(Tag::is_inline);
        if !inline {
            continue;
        }
        if doc.text_len(sibling) == 0 {
            doc.detach(sibling);
        } else if !doc.is_text(sibling) {
            doc.prune_empty(sibling);
        }
    }
}

/// Split `range` into one sub-range per root child it touches.
///
/// Ranges that stay below a single root child are returned unchanged.
fn block_segments(doc: &Document, range: &Range) -> Vec<Range> {
    let root = doc.root();
    if range.common_ancestor(doc) != root {
        return vec![*range];
    }

    let children = doc.children(root).to_vec();
    let mut segments = Vec::new();
    for (index, &child) in children.iter().enumerate() {
        let holds_start = doc.is_inclusive_ancestor(child, range.start.node);
        let holds_end = doc.is_inclusive_ancestor(child, range.end.node);

        let (inside_start, inside_end) = if doc.tag(child) == Some(Tag::Paragraph) {
            (Boundary::new(child, 0), Boundary::new(child, doc.boundary_len(child)))
        } else {
            (Boundary::new(root, index), Boundary::new(root, index + 1))
        };

        let start = if holds_start { range.start } else { inside_start };
        let end = if holds_end { range.end } else { inside_end };

        let segment = Range { start, end };
        let touches = holds_start || holds_end || range.contains_node(doc, child);
        if touches && !segment.is_collapsed() {
            segments.push(segment);
        }
    }

    if segments.is_empty() {
        vec![*range]
    } else {
        segments
    }
}
