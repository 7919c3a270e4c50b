//! Element splitting shared by style removal and caret editing.

use crate::document::{Document, NodeId};
use crate::range::Boundary;

/// Which text node wins when an offset falls exactly between two of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bias {
    /// End of the earlier text node.
    Before,
    /// Start of the later text node.
    After,
}

/// Plain-text offset of `point` relative to the start of `ancestor`'s text content.
///
/// Only text nodes contribute width; element boundaries count as zero.
pub(crate) fn text_offset_within(doc: &Document, ancestor: NodeId, point: Boundary) -> usize {
    let mut total = 0;
    walk_offset(doc, ancestor, point, &mut total);
    total
}

fn walk_offset(doc: &Document, node: NodeId, point: Boundary, total: &mut usize) -> bool {
    if node == point.node {
        if doc.is_text(node) {
            *total += point.offset;
        } else {
            let children = doc.children(node);
            let upto = point.offset.min(children.len());
            *total += children[..upto]
                .iter()
                .map(|&child| doc.text_len(child))
                .sum::<usize>();
        }
        return true;
    }

    if doc.is_text(node) {
        *total += doc.boundary_len(node);
        return false;
    }

    for &child in doc.children(node) {
        if walk_offset(doc, child, point, total) {
            return true;
        }
    }
    false
}

/// Boundary inside `ancestor` located `offset` chars into its text content.
pub(crate) fn locate_text_offset(
    doc: &Document,
    ancestor: NodeId,
    offset: usize,
    bias: Bias,
) -> Boundary {
    let text_nodes = doc.text_nodes(ancestor);
    let mut consumed = 0;
    for &node in &text_nodes {
        let len = doc.boundary_len(node);
        let fits = match bias {
            Bias::Before => offset <= consumed + len,
            Bias::After => offset < consumed + len,
        };
        if fits {
            return Boundary::new(node, offset.saturating_sub(consumed));
        }
        consumed += len;
    }

    match text_nodes.last() {
        Some(&last) => Boundary::new(last, doc.boundary_len(last)),
        None => Boundary::new(ancestor, doc.boundary_len(ancestor)),
    }
}

/// Split `element` at `point` (which must lie inside it).
///
/// Every node between `point` and `element` is cut in two; `element` keeps the content before
/// the point and the returned clone, inserted right after it, holds the rest.
pub(crate) fn split_element_at(doc: &mut Document, element: NodeId, point: Boundary) -> NodeId {
    let (mut container, mut index) = if doc.is_text(point.node) {
        let text_node = point.node;
        match (doc.parent(text_node), doc.index_in_parent(text_node)) {
            (Some(parent), Some(position)) => {
                if point.offset == 0 {
                    (parent, position)
                } else {
                    if point.offset < doc.boundary_len(text_node) {
                        doc.split_text(text_node, point.offset);
                    }
                    (parent, position + 1)
                }
            }
            _ => (element, doc.children(element).len()),
        }
    } else {
        (point.node, point.offset)
    };

    loop {
        let clone = doc.shallow_clone(container);
        let moved: Vec<NodeId> = doc.children(container).iter().skip(index).copied().collect();
        for child in moved {
            doc.append_child(clone, child);
        }

        let (Some(parent), Some(position)) = (doc.parent(container), doc.index_in_parent(container))
        else {
            return clone;
        };
        doc.insert_child(parent, position + 1, clone);

        if container == element {
            return clone;
        }
        container = parent;
        index = position + 1;
    }
}

/// Split `element` at a plain-text offset. See [`split_element_at`].
pub(crate) fn split_element_at_offset(
    doc: &mut Document,
    element: NodeId,
    offset: usize,
    bias: Bias,
) -> NodeId {
    let point = locate_text_offset(doc, element, offset, bias);
    split_element_at(doc, element, point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodeSnapshot, Tag};

    fn bold_with_italic() -> Document {
        Document::from_snapshots(vec![NodeSnapshot::element(
            Tag::Paragraph,
            vec![NodeSnapshot::element(
                Tag::Bold,
                vec![
                    NodeSnapshot::text("ab"),
                    NodeSnapshot::element(Tag::Italic, vec![NodeSnapshot::text("cd")]),
                    NodeSnapshot::text("ef"),
                ],
            )],
        )])
    }

    #[test]
    fn test_text_offset_counts_text_only() {
        let doc = bold_with_italic();
        let texts = doc.text_nodes(doc.root());
        let bold = doc.parent(texts[0]).unwrap();
        assert_eq!(text_offset_within(&doc, bold, Boundary::new(texts[1], 1)), 3);
        assert_eq!(text_offset_within(&doc, bold, Boundary::new(texts[2], 0)), 4);
        assert_eq!(text_offset_within(&doc, bold, Boundary::new(bold, 2)), 4);
    }

    #[test]
    fn test_locate_offset_bias() {
        let doc = bold_with_italic();
        let texts = doc.text_nodes(doc.root());
        let bold = doc.parent(texts[0]).unwrap();
        assert_eq!(
            locate_text_offset(&doc, bold, 2, Bias::Before),
            Boundary::new(texts[0], 2)
        );
        assert_eq!(
            locate_text_offset(&doc, bold, 2, Bias::After),
            Boundary::new(texts[1], 0)
        );
        assert_eq!(
            locate_text_offset(&doc, bold, 99, Bias::After),
            Boundary::new(texts[2], 2)
        );
    }

    #[test]
    fn test_split_element_through_nested_chain() {
        let mut doc = bold_with_italic();
        let texts = doc.text_nodes(doc.root());
        let bold = doc.parent(texts[0]).unwrap();
        let right = split_element_at(&mut doc, bold, Boundary::new(texts[1], 1));
        assert_eq!(
            doc.snapshot_node(bold),
            NodeSnapshot::element(
                Tag::Bold,
                vec![
                    NodeSnapshot::text("ab"),
                    NodeSnapshot::element(Tag::Italic, vec![NodeSnapshot::text("c")]),
                ]
            )
        );
        assert_eq!(
            doc.snapshot_node(right),
            NodeSnapshot::element(
                Tag::Bold,
                vec![
                    NodeSnapshot::element(Tag::Italic, vec![NodeSnapshot::text("d")]),
                    NodeSnapshot::text("ef"),
                ]
            )
        );
        assert_eq!(doc.index_in_parent(right), Some(1));
    }
}
