use pretty_assertions::assert_eq;
use seeker_core::{
    Boundary, Document, FontChoice, KeyPress, NodeSnapshot, Range, Selection, StyleEngine,
    StyleKey, Tag, ToggleOutcome, parse, serialize, styles_at_node,
};
use std::sync::{Arc, Mutex};

fn paragraph(children: Vec<NodeSnapshot>) -> NodeSnapshot {
    NodeSnapshot::element(Tag::Paragraph, children)
}

fn select_text(doc: &Document, text_index: usize, start: usize, end: usize) -> Selection {
    let node = doc.text_nodes(doc.root())[text_index];
    Selection::from_range(Range::new(
        doc,
        Boundary::new(node, start),
        Boundary::new(node, end),
    ))
}

fn body(doc: &Document) -> String {
    serialize(doc, FontChoice::Normal)
        .trim_start_matches("[FONT:GEIST_SANS]")
        .trim_start()
        .to_string()
}

fn toggle(
    engine: &mut StyleEngine,
    key: StyleKey,
    doc: &mut Document,
    selection: &mut Selection,
) -> ToggleOutcome {
    let outcome = engine.toggle_style(key, doc, selection);
    engine.settle(doc, selection);
    outcome
}

#[test]
fn test_apply_bold_to_plain_span() {
    let mut doc = parse("Hello world");
    let mut selection = select_text(&doc, 0, 6, 11);
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
    assert_eq!(body(&doc), "Hello [BOLD]world[/BOLD]");
    assert_eq!(selection.text(&doc), "world");
    assert!(engine.is_style_active(StyleKey::Bold));
}

#[test]
fn test_toggle_twice_restores_plain_text() {
    let mut doc = parse("Hello world");
    let mut selection = select_text(&doc, 0, 0, 5);
    let mut engine = StyleEngine::new();

    toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(body(&doc), "[BOLD]Hello[/BOLD] world");

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert_eq!(body(&doc), "Hello world");
    assert_eq!(selection.text(&doc), "Hello");
    assert!(!engine.is_style_active(StyleKey::Bold));
}

#[test]
fn test_remove_from_middle_of_bold_word_splits_in_three() {
    let mut doc = parse("[BOLD]Hello[/BOLD]");
    let mut selection = select_text(&doc, 0, 2, 4);
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert_eq!(
        doc.snapshot(),
        vec![paragraph(vec![
            NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("He")]),
            NodeSnapshot::text("ll"),
            NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("o")]),
        ])]
    );
    assert_eq!(selection.text(&doc), "ll");
}

#[test]
fn test_remove_at_boundaries_omits_empty_parts() {
    let mut doc = parse("[BOLD]Hello[/BOLD]");
    let mut selection = select_text(&doc, 0, 0, 2);
    let mut engine = StyleEngine::new();
    toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(body(&doc), "He[BOLD]llo[/BOLD]");

    let mut doc = parse("[BOLD]Hello[/BOLD]");
    let mut selection = select_text(&doc, 0, 3, 5);
    toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(body(&doc), "[BOLD]Hel[/BOLD]lo");
}

#[test]
fn test_remove_keeps_other_styles_inside() {
    let mut doc = parse("[BOLD]ab[ITALIC]cd[/ITALIC]ef[/BOLD]");
    let texts = doc.text_nodes(doc.root());
    let mut selection = Selection::from_range(Range::new(
        &doc,
        Boundary::new(texts[0], 1),
        Boundary::new(texts[2], 1),
    ));
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert_eq!(body(&doc), "[BOLD]a[/BOLD]b[ITALIC]cd[/ITALIC]e[BOLD]f[/BOLD]");
    assert_eq!(selection.text(&doc), "bcde");
}

#[test]
fn test_partial_overlap_applies_instead_of_removing() {
    let mut doc = parse("[BOLD]abc[/BOLD]def");
    let texts = doc.text_nodes(doc.root());
    let mut selection = Selection::from_range(Range::new(
        &doc,
        Boundary::new(texts[0], 1),
        Boundary::new(texts[1], 2),
    ));
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Italic, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
    assert_eq!(body(&doc), "[BOLD]a[/BOLD][ITALIC][BOLD]bc[/BOLD]de[/ITALIC]f");
    assert_eq!(selection.text(&doc), "bcde");

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
    assert_eq!(doc.plain_text(), "abcdef");
}

#[test]
fn test_cross_paragraph_selection_wraps_each_paragraph() {
    let mut doc = parse("first line\nsecond line");
    let texts = doc.text_nodes(doc.root());
    let mut selection = Selection::from_range(Range::new(
        &doc,
        Boundary::new(texts[0], 6),
        Boundary::new(texts[1], 6),
    ));
    let mut engine = StyleEngine::new();

    toggle(&mut engine, StyleKey::Underline, &mut doc, &mut selection);
    assert_eq!(
        body(&doc),
        "first [UNDERLINE]line[/UNDERLINE]\n[UNDERLINE]second[/UNDERLINE] line"
    );
    assert_eq!(selection.text(&doc), "linesecond");
    assert_eq!(doc.children(doc.root()).len(), 2);
}

#[test]
fn test_toggle_twice_across_paragraphs_removes_style() {
    let mut doc = parse("first line\nsecond line");
    let texts = doc.text_nodes(doc.root());
    let mut selection = Selection::from_range(Range::new(
        &doc,
        Boundary::new(texts[0], 6),
        Boundary::new(texts[1], 6),
    ));
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
    assert_eq!(body(&doc), "first [BOLD]line[/BOLD]\n[BOLD]second[/BOLD] line");

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert_eq!(body(&doc), "first line\nsecond line");
    for node in doc.text_nodes(doc.root()) {
        assert!(!styles_at_node(&doc, node).contains(StyleKey::Bold));
    }
    assert_eq!(selection.text(&doc), "linesecond");
    assert!(!engine.is_style_active(StyleKey::Bold));
}

#[test]
fn test_mixed_paragraphs_apply_instead_of_removing() {
    let mut doc = parse("[BOLD]first[/BOLD]\nsecond");
    let texts = doc.text_nodes(doc.root());
    let mut selection = Selection::from_range(Range::new(
        &doc,
        Boundary::new(texts[0], 0),
        Boundary::new(texts[1], 6),
    ));
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Bold, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
    for node in doc.text_nodes(doc.root()) {
        assert!(styles_at_node(&doc, node).contains(StyleKey::Bold));
    }
}

#[test]
fn test_wrap_across_element_edge_leaves_no_empty_tags() {
    let mut doc = parse("a[BOLD]bc[/BOLD]d");
    let texts = doc.text_nodes(doc.root());
    let mut selection = Selection::from_range(Range::new(
        &doc,
        Boundary::new(texts[1], 0),
        Boundary::new(texts[2], 1),
    ));
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Italic, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));

    let snt = body(&doc);
    assert_eq!(snt, "a[ITALIC][BOLD]bc[/BOLD]d[/ITALIC]");
    for name in ["BOLD", "ITALIC", "UNDERLINE"] {
        assert!(!snt.contains(&format!("[{name}][/{name}]")), "{snt}");
    }
    assert_eq!(selection.text(&doc), "bcd");
}

#[test]
fn test_collapsed_selection_sets_caret_formatting() {
    let mut doc = parse("Hello");
    let text = doc.text_nodes(doc.root())[0];
    let mut selection = Selection::caret(Boundary::new(text, 5));
    let mut engine = StyleEngine::new();

    let outcome = toggle(&mut engine, StyleKey::Italic, &mut doc, &mut selection);
    assert_eq!(outcome, ToggleOutcome::CaretFormatting);
    assert_eq!(body(&doc), "Hello");
    assert!(engine.is_style_active(StyleKey::Italic));
    assert!(selection.typing().toggled.contains(StyleKey::Italic));
}

#[test]
fn test_no_selection_and_empty_text_are_ignored() {
    let mut doc = parse("Hello");
    let mut engine = StyleEngine::new();

    let mut none = Selection::none();
    assert_eq!(
        engine.toggle_style(StyleKey::Bold, &mut doc, &mut none),
        ToggleOutcome::Ignored
    );
    assert!(!engine.is_settling());

    let paragraph = doc.children(doc.root())[0];
    let mut empty_span = Selection::from_range(Range::new(
        &doc,
        Boundary::new(paragraph, 0),
        Boundary::new(doc.root(), 0),
    ));
    assert_eq!(
        engine.toggle_style(StyleKey::Bold, &mut doc, &mut empty_span),
        ToggleOutcome::Ignored
    );
    assert_eq!(body(&doc), "Hello");
}

#[test]
fn test_toggle_while_settling_is_rejected() {
    let mut doc = parse("Hello world");
    let mut selection = select_text(&doc, 0, 0, 5);
    let mut engine = StyleEngine::new();

    engine.toggle_style(StyleKey::Bold, &mut doc, &mut selection);
    assert!(engine.is_settling());
    let snapshot = doc.snapshot();

    assert_eq!(
        engine.toggle_style(StyleKey::Italic, &mut doc, &mut selection),
        ToggleOutcome::Busy
    );
    assert_eq!(doc.snapshot(), snapshot);

    engine.settle(&doc, &selection);
    assert!(!engine.is_settling());
    assert_eq!(
        engine.toggle_style(StyleKey::Bold, &mut doc, &mut selection),
        ToggleOutcome::Removed
    );
}

#[test]
fn test_settle_notifies_subscribers() {
    let mut doc = parse("Hello");
    let mut selection = select_text(&doc, 0, 0, 5);
    let mut engine = StyleEngine::new();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.subscribe(move |active| {
        sink.lock().unwrap().push(active.iter().collect::<Vec<_>>());
    });

    toggle(&mut engine, StyleKey::Underline, &mut doc, &mut selection);
    toggle(&mut engine, StyleKey::Underline, &mut doc, &mut selection);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec![StyleKey::Underline], vec![]]
    );
}

#[test]
fn test_keybinds_use_the_same_entry_point() {
    let mut doc = parse("Hello");
    let mut selection = select_text(&doc, 0, 1, 4);
    let mut engine = StyleEngine::new();

    let outcome = engine.handle_key(&KeyPress::ctrl("u"), &mut doc, &mut selection);
    assert!(matches!(outcome, Some(ToggleOutcome::Applied { .. })));
    engine.settle(&doc, &selection);
    assert_eq!(body(&doc), "H[UNDERLINE]ell[/UNDERLINE]o");

    assert_eq!(
        engine.handle_key(&KeyPress::ctrl("q"), &mut doc, &mut selection),
        None
    );
}

#[test]
fn test_apply_font_size_wraps_selection() {
    let mut doc = parse("Hello world");
    let mut selection = select_text(&doc, 0, 0, 5);
    let mut engine = StyleEngine::new();
    assert_eq!(engine.current_font_size(&doc, &selection), 16);

    let outcome = engine.apply_font_size(24, &mut doc, &mut selection);
    assert!(matches!(outcome, ToggleOutcome::Applied { .. }));
    assert_eq!(body(&doc), "[SIZE:24]Hello[/SIZE] world");
    assert_eq!(engine.current_font_size(&doc, &selection), 24);
    assert!(!engine.is_settling());
}

#[test]
fn test_apply_font_size_at_caret_is_pending() {
    let mut doc = parse("Hello");
    let text = doc.text_nodes(doc.root())[0];
    let mut selection = Selection::caret(Boundary::new(text, 5));
    let mut engine = StyleEngine::new();

    let outcome = engine.apply_font_size(32, &mut doc, &mut selection);
    assert_eq!(outcome, ToggleOutcome::CaretFormatting);
    assert_eq!(selection.typing().font_size, Some(32));
    assert_eq!(engine.current_font_size(&doc, &selection), 32);
    assert_eq!(body(&doc), "Hello");
}
