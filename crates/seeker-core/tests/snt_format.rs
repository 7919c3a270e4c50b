use pretty_assertions::assert_eq;
use seeker_core::{
    Document, FontChoice, LineEnding, NodeSnapshot, PLACEHOLDER_TEXT, Tag, parse, parse_note,
    serialize,
};

fn paragraph(children: Vec<NodeSnapshot>) -> NodeSnapshot {
    NodeSnapshot::element(Tag::Paragraph, children)
}

fn sample_document() -> Document {
    Document::from_snapshots(vec![
        paragraph(vec![
            NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("Hello")]),
            NodeSnapshot::text(" "),
            NodeSnapshot::element(
                Tag::Underline,
                vec![NodeSnapshot::element(
                    Tag::Italic,
                    vec![NodeSnapshot::text("brave")],
                )],
            ),
            NodeSnapshot::text(" world"),
        ]),
        paragraph(vec![
            NodeSnapshot::text("size "),
            NodeSnapshot::element(
                Tag::FontSize(24),
                vec![NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("big")])],
            ),
        ]),
    ])
}

#[test]
fn test_serialize_writes_directive_and_tags() {
    let snt = serialize(&sample_document(), FontChoice::Retro);
    assert_eq!(
        snt,
        "[FONT:FIRA_CODE]\n\
         [BOLD]Hello[/BOLD] [UNDERLINE][ITALIC]brave[/ITALIC][/UNDERLINE] world\n\
         size [SIZE:24][BOLD]big[/BOLD][/SIZE]"
    );
}

#[test]
fn test_parse_serialize_round_trip_preserves_shape() {
    let doc = sample_document();
    let parsed = parse(&serialize(&doc, FontChoice::Normal));
    assert_eq!(parsed.snapshot(), doc.snapshot());
    assert_eq!(parsed.plain_text(), "Hello brave world\nsize big");
}

#[test]
fn test_second_round_trip_is_stable() {
    let inputs = [
        "[FONT:GEIST_SANS]\n  leading spaces\n\n\n[BOLD]a[ITALIC]b[/BOLD]c[/ITALIC]\n",
        "no directive [BOLD]unclosed\n[/BOLD] stray",
        "[FONT:GEIST_STYLISH]\n[BOLD][BOLD]nested[/BOLD][/BOLD]",
        "",
        "[FONT:GEIST_SANS]\n[BOLD][/BOLD]",
        "a\n[SIZE:12][/SIZE]",
    ];
    for input in inputs {
        let once = serialize(&parse(input), FontChoice::Normal);
        let twice = serialize(&parse(&once), FontChoice::Normal);
        assert_eq!(once, twice, "input: {:?}", input);
    }
}

#[test]
fn test_fira_code_scenario() {
    let note = parse_note("[FONT:FIRA_CODE]\n[BOLD]Hello[/BOLD] world\n");
    assert_eq!(note.font, FontChoice::Retro);
    assert_eq!(
        note.document.snapshot(),
        vec![paragraph(vec![
            NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("Hello")]),
            NodeSnapshot::text(" world"),
        ])]
    );
    assert_eq!(
        serialize(&note.document, FontChoice::Retro),
        "[FONT:FIRA_CODE]\n[BOLD]Hello[/BOLD] world"
    );
}

#[test]
fn test_empty_input_yields_placeholder() {
    for input in ["", "[FONT:GEIST_SANS]\n", "\n   \n\t\n"] {
        let doc = parse(input);
        assert_eq!(doc.snapshot(), vec![paragraph(vec![NodeSnapshot::text(PLACEHOLDER_TEXT)])]);
    }

    let snt = serialize(&parse(""), FontChoice::Normal);
    assert_eq!(snt, format!("[FONT:GEIST_SANS]\n{}", PLACEHOLDER_TEXT));
    assert_eq!(parse(&snt).plain_text(), PLACEHOLDER_TEXT);
}

#[test]
fn test_unknown_font_defaults_to_normal() {
    let note = parse_note("[FONT:WINGDINGS]\ntext");
    assert_eq!(note.font, FontChoice::Normal);
    assert_eq!(note.document.plain_text(), "text");

    let note = parse_note("just text");
    assert_eq!(note.font, FontChoice::Normal);
    assert_eq!(note.line_ending, LineEnding::Lf);
}

#[test]
fn test_unbalanced_tags_stay_literal() {
    let doc = parse("[BOLD]open only\nclose only[/BOLD]");
    assert_eq!(doc.plain_text(), "[BOLD]open only\nclose only[/BOLD]");
    assert_eq!(
        doc.snapshot()[0],
        paragraph(vec![NodeSnapshot::text("[BOLD]open only")])
    );
}

#[test]
fn test_tags_do_not_span_lines() {
    let doc = parse("[ITALIC]one\ntwo[/ITALIC]");
    assert_eq!(doc.children(doc.root()).len(), 2);
    assert_eq!(doc.plain_text(), "[ITALIC]one\ntwo[/ITALIC]");
}

#[test]
fn test_nested_same_type_is_best_effort() {
    // The first close tag pairs with the outer open tag.
    let doc = parse("[BOLD][BOLD]x[/BOLD]y[/BOLD]");
    assert_eq!(
        doc.snapshot(),
        vec![paragraph(vec![
            NodeSnapshot::element(Tag::Bold, vec![NodeSnapshot::text("[BOLD]x")]),
            NodeSnapshot::text("y[/BOLD]"),
        ])]
    );
}

#[test]
fn test_brackets_in_text_are_not_escaped() {
    let doc = Document::from_snapshots(vec![paragraph(vec![NodeSnapshot::text(
        "literal [BOLD]tag[/BOLD]",
    )])]);
    let reparsed = parse(&serialize(&doc, FontChoice::Normal));
    assert_eq!(reparsed.plain_text(), "literal tag");
}

#[test]
fn test_lines_of_empty_tags_are_dropped() {
    assert_eq!(
        parse("[FONT:GEIST_SANS]\n[BOLD][/BOLD]").snapshot(),
        vec![paragraph(vec![NodeSnapshot::text(PLACEHOLDER_TEXT)])]
    );
    assert_eq!(
        parse("a\n[SIZE:12][UNDERLINE][/UNDERLINE][/SIZE]\nb").snapshot(),
        vec![
            paragraph(vec![NodeSnapshot::text("a")]),
            paragraph(vec![NodeSnapshot::text("b")]),
        ]
    );
}

#[test]
fn test_empty_element_serializes_as_empty_span() {
    let doc = Document::from_snapshots(vec![paragraph(vec![
        NodeSnapshot::text("a"),
        NodeSnapshot::element(Tag::Italic, vec![]),
    ])]);
    assert_eq!(serialize(&doc, FontChoice::Normal), "[FONT:GEIST_SANS]\na[ITALIC][/ITALIC]");
    assert_eq!(
        parse("a[ITALIC][/ITALIC]").snapshot(),
        vec![paragraph(vec![NodeSnapshot::text("a")])]
    );
}
