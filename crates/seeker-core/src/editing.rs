//! Text editing on a [`Document`] through a host [`Selection`].
//!
//! These are the minimal typing operations an editing surface needs around the style engine:
//! inserting text (honoring formatting pending at the caret), splitting paragraphs and deleting
//! the selected content. Each returns the caret it leaves behind, or `None` when there is no
//! usable selection.

use crate::document::{Document, NodeId, Tag};
use crate::range::{Boundary, Range};
use crate::selection::{Selection, TypingFormat};
use crate::split::split_element_at;
use crate::styles::{StyleKey, styles_at_node};
use tracing::trace;

/// Insert `text` at the selection, replacing any selected content.
///
/// `'\n'` starts a new paragraph. At a caret with pending formatting, the inserted text gets the
/// toggled styles and font size, on every line, and the caret stays inside the formatted run so
/// further typing continues it.
pub fn insert_text(doc: &mut Document, selection: &mut Selection, text: &str) -> Option<Boundary> {
    let mut caret = prepare_caret(doc, selection)?;
    let typing = selection.typing().clone();
    let wanted = styles_at_node(doc, caret.node).symmetric_difference(typing.toggled);

    for (index, line) in text.split('\n').enumerate() {
        let format = if index == 0 {
            typing.clone()
        } else {
            selection.set_range(Range::collapsed_at(caret));
            caret = insert_paragraph_break(doc, selection)?;
            // The break carries open elements over, so only the difference is still pending.
            TypingFormat {
                toggled: wanted.symmetric_difference(styles_at_node(doc, caret.node)),
                font_size: typing
                    .font_size
                    .filter(|&px| font_size_at(doc, caret.node) != Some(px)),
            }
        };
        caret = insert_run(doc, caret, line, &format);
    }

    selection.set_range(Range::collapsed_at(caret));
    Some(caret)
}

/// Split the paragraph at the caret, replacing any selected content.
///
/// Content outside any paragraph is first gathered into one. The caret moves to the start of the
/// new paragraph; inline elements open at the split point continue there.
pub fn insert_paragraph_break(doc: &mut Document, selection: &mut Selection) -> Option<Boundary> {
    let caret = prepare_caret(doc, selection)?;
    let (paragraph, caret) = match doc.enclosing(caret.node, |tag| tag == Tag::Paragraph) {
        Some(paragraph) => (paragraph, caret),
        None => wrap_loose_content(doc, caret),
    };

    let right = split_element_at(doc, paragraph, caret);
    let mut node = right;
    while let Some(&first) = doc.children(node).first() {
        node = first;
    }
    let caret = Boundary::new(node, 0);
    trace!(paragraph = paragraph.index(), "split paragraph");

    selection.set_range(Range::collapsed_at(caret));
    Some(caret)
}

/// Delete the selected content and collapse the selection to its start.
///
/// When the selection spanned several paragraphs, the last one is merged into the first.
pub fn delete_selection(doc: &mut Document, selection: &mut Selection) -> Option<Boundary> {
    let range = *selection.range()?;
    if !range.is_attached(doc) {
        return None;
    }
    if range.is_collapsed() {
        return Some(range.start);
    }

    let is_paragraph = |tag: Tag| tag == Tag::Paragraph;
    let start_paragraph = doc.enclosing(range.start.node, is_paragraph);
    let end_paragraph = doc.enclosing(range.end.node, is_paragraph);

    let mut working = range;
    working.delete_contents(doc);

    if let (Some(first), Some(last)) = (start_paragraph, end_paragraph)
        && first != last
        && doc.is_attached(last)
    {
        for child in doc.children(last).to_vec() {
            doc.append_child(first, child);
        }
        doc.detach(last);
    }

    let caret = range.start;
    selection.set_range(Range::collapsed_at(caret));
    Some(caret)
}

fn prepare_caret(doc: &mut Document, selection: &mut Selection) -> Option<Boundary> {
    let range = *selection.range()?;
    if !range.is_attached(doc) {
        return None;
    }
    if range.is_collapsed() {
        Some(range.start)
    } else {
        delete_selection(doc, selection)
    }
}

/// Gather the run of non-paragraph root children around `caret` into a new paragraph.
fn wrap_loose_content(doc: &mut Document, caret: Boundary) -> (NodeId, Boundary) {
    let root = doc.root();
    let children = doc.children(root).to_vec();
    let is_loose = |doc: &Document, node: NodeId| doc.tag(node) != Some(Tag::Paragraph);

    let (mut from, mut to) = if caret.node == root {
        let at = caret.offset.min(children.len());
        (at, at)
    } else {
        let top = doc
            .inclusive_ancestors(caret.node)
            .find(|&node| doc.parent(node) == Some(root));
        match top.and_then(|node| doc.index_in_parent(node)) {
            Some(index) => (index, index + 1),
            None => (children.len(), children.len()),
        }
    };
    while from > 0 && is_loose(doc, children[from - 1]) {
        from -= 1;
    }
    while to < children.len() && is_loose(doc, children[to]) {
        to += 1;
    }

    let paragraph = doc.create_element(Tag::Paragraph);
    for &child in &children[from..to] {
        doc.append_child(paragraph, child);
    }
    doc.insert_child(root, from, paragraph);

    let caret = if caret.node == root {
        Boundary::new(paragraph, caret.offset.min(children.len()) - from)
    } else {
        caret
    };
    (paragraph, caret)
}

fn font_size_at(doc: &Document, node: NodeId) -> Option<u32> {
    doc.inclusive_ancestors(node).find_map(|id| match doc.tag(id) {
        Some(Tag::FontSize(px)) => Some(px),
        _ => None,
    })
}

/// Insert one line of text at `caret` with `format` applied.
fn insert_run(doc: &mut Document, caret: Boundary, text: &str, format: &TypingFormat) -> Boundary {
    if text.is_empty() {
        return caret;
    }

    let mut caret = caret;
    if caret.node == doc.root() {
        let paragraph = doc.create_element(Tag::Paragraph);
        doc.insert_child(caret.node, caret.offset, paragraph);
        caret = Boundary::new(paragraph, 0);
    }

    let active = styles_at_node(doc, caret.node);
    let closing: Vec<StyleKey> = format.toggled.iter().filter(|&key| active.contains(key)).collect();
    let opening: Vec<StyleKey> = format.toggled.iter().filter(|&key| !active.contains(key)).collect();

    for key in closing {
        caret = close_style_at(doc, caret, key);
    }

    if opening.is_empty() && format.font_size.is_none() {
        return insert_plain(doc, caret, text);
    }

    let text_node = doc.create_text(text);
    let mut outer = text_node;
    for key in opening.into_iter().rev() {
        let element = doc.create_element(key.tag());
        doc.append_child(element, outer);
        outer = element;
    }
    if let Some(px) = format.font_size {
        let element = doc.create_element(Tag::font_size(px));
        doc.append_child(element, outer);
        outer = element;
    }

    Range::collapsed_at(caret).insert_node(doc, outer);
    Boundary::new(text_node, doc.boundary_len(text_node))
}

fn insert_plain(doc: &mut Document, caret: Boundary, text: &str) -> Boundary {
    let len = text.chars().count();
    if doc.is_text(caret.node) {
        doc.insert_text_at(caret.node, caret.offset, text);
        return Boundary::new(caret.node, caret.offset + len);
    }

    if caret.offset > 0
        && let Some(&previous) = doc.children(caret.node).get(caret.offset - 1)
        && doc.is_text(previous)
    {
        let end = doc.boundary_len(previous);
        doc.insert_text_at(previous, end, text);
        return Boundary::new(previous, end + len);
    }

    let node = doc.create_text(text);
    doc.insert_child(caret.node, caret.offset, node);
    Boundary::new(node, len)
}

/// Split the nearest `key` element around `caret` and move the caret between the halves.
fn close_style_at(doc: &mut Document, caret: Boundary, key: StyleKey) -> Boundary {
    let tag = key.tag();
    let Some(element) = doc.enclosing(caret.node, |found| found.same_kind(tag)) else {
        return caret;
    };
    let (Some(parent), Some(index)) = (doc.parent(element), doc.index_in_parent(element)) else {
        return caret;
    };

    let right = split_element_at(doc, element, caret);
    if doc.text_len(right) == 0 {
        doc.detach(right);
    }
    if doc.text_len(element) == 0 {
        doc.detach(element);
        Boundary::new(parent, index)
    } else {
        Boundary::new(parent, index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeSnapshot;

    #[test]
    fn test_insert_plain_text_into_text_node() {
        let mut doc = Document::from_snapshots(vec![NodeSnapshot::element(
            Tag::Paragraph,
            vec![NodeSnapshot::text("held")],
        )]);
        let text = doc.text_nodes(doc.root())[0];
        let mut selection = Selection::caret(Boundary::new(text, 2));
        let caret = insert_text(&mut doc, &mut selection, "LLO WOR").unwrap();
        assert_eq!(doc.plain_text(), "heLLO WORld");
        assert_eq!(caret, Boundary::new(text, 9));
    }

    #[test]
    fn test_insert_into_empty_document_creates_paragraph() {
        let mut doc = Document::new();
        let mut selection = Selection::caret(Boundary::new(doc.root(), 0));
        insert_text(&mut doc, &mut selection, "hi").unwrap();
        assert_eq!(
            doc.snapshot(),
            vec![NodeSnapshot::element(Tag::Paragraph, vec![NodeSnapshot::text("hi")])]
        );
    }

    #[test]
    fn test_close_style_at_end_of_bold() {
        let mut doc = Document::from_snapshots(vec![NodeSnapshot::element(
            Tag::Paragraph,
            vec![NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("ab")])],
        )]);
        let text = doc.text_nodes(doc.root())[0];
        let mut selection = Selection::caret(Boundary::new(text, 2));
        selection.toggle_typing_style(StyleKey::Bold);
        insert_text(&mut doc, &mut selection, "c").unwrap();
        assert_eq!(
            doc.snapshot(),
            vec![NodeSnapshot::element(
                Tag::Paragraph,
                vec![
                    NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("ab")]),
                    NodeSnapshot::text("c"),
                ]
            )]
        );
    }
}
