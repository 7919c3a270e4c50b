//! SNT markup: the persisted note format.
//!
//! An SNT note is UTF-8 text made of a font directive line followed by the body:
//!
//! ```text
//! [FONT:FIRA_CODE]
//! [BOLD]Hello[/BOLD] world
//! Second line with [SIZE:24]big[/SIZE] text
//! ```
//!
//! Each body line is one paragraph. Inline tags nest freely; there is no escaping, so literal
//! tag-like text in a note is read back as markup.
//!
//! Parsing is total: unbalanced tags stay literal text, unknown font names fall back to
//! [`FontChoice::Normal`] and an empty body yields [`Document::placeholder`].

use crate::document::{Document, NodeId, NodeKind, Tag};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static FONT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[FONT:([^\]]+)\]\s*\n?").expect("valid font regex"));
static BOLD_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[BOLD\](.*?)\[/BOLD\]").expect("valid bold regex"));
static ITALIC_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ITALIC\](.*?)\[/ITALIC\]").expect("valid italic regex"));
static UNDERLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[UNDERLINE\](.*?)\[/UNDERLINE\]").expect("valid underline regex")
});
static SIZE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[SIZE:(\d+)\](.*?)\[/SIZE\]").expect("valid size regex"));

// Matched tag pairs are rewritten to private-use markers before the tree is built.
const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';
const SIZE_END: char = '\u{E002}';

/// Font family selected for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontChoice {
    /// Geist Sans.
    #[default]
    Normal,
    /// Fira Code.
    Retro,
    /// Geist, stylish variant.
    Stylish,
}

impl FontChoice {
    /// All choices, in menu order.
    pub const ALL: [FontChoice; 3] = [FontChoice::Normal, FontChoice::Retro, FontChoice::Stylish];

    /// Name written in the `[FONT:...]` directive.
    pub fn directive_name(self) -> &'static str {
        match self {
            FontChoice::Normal => "GEIST_SANS",
            FontChoice::Retro => "FIRA_CODE",
            FontChoice::Stylish => "GEIST_STYLISH",
        }
    }

    /// Lowercase name used by hosts (`normal`, `retro`, `stylish`).
    pub fn name(self) -> &'static str {
        match self {
            FontChoice::Normal => "normal",
            FontChoice::Retro => "retro",
            FontChoice::Stylish => "stylish",
        }
    }

    /// Choice for a directive name; unknown names map to [`FontChoice::Normal`].
    pub fn from_directive(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|choice| choice.directive_name() == name.trim())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for FontChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a font choice name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFontChoice(pub String);

impl std::fmt::Display for UnknownFontChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown font choice: {} (expected normal, retro or stylish)",
            self.0
        )
    }
}

impl std::error::Error for UnknownFontChoice {}

impl FromStr for FontChoice {
    type Err = UnknownFontChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|choice| {
                choice.name().eq_ignore_ascii_case(trimmed) || choice.directive_name() == trimmed
            })
            .ok_or_else(|| UnknownFontChoice(trimmed.to_string()))
    }
}

/// Newline sequence of a note file.
///
/// Notes are parsed from LF text; a CRLF file is normalized on load and converted back when
/// re-serialized through [`SntNote::to_snt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `'\n'`
    #[default]
    Lf,
    /// `"\r\n"`
    Crlf,
}

impl LineEnding {
    /// `Crlf` if `text` contains any `"\r\n"`, `Lf` otherwise.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Replace every `"\r\n"` with `'\n'`.
    pub fn normalize(text: &str) -> String {
        text.replace("\r\n", "\n")
    }

    /// Convert LF text to this line ending.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }
}

/// A parsed note together with its file-level metadata.
#[derive(Debug, Clone)]
pub struct SntNote {
    /// Font from the directive line.
    pub font: FontChoice,
    /// Note body.
    pub document: Document,
    /// Newline sequence of the source text.
    pub line_ending: LineEnding,
}

impl SntNote {
    /// Serialize back to SNT using the note's font and line ending.
    pub fn to_snt(&self) -> String {
        self.line_ending.apply(&serialize(&self.document, self.font))
    }
}

/// Serialize `doc` to SNT with `font` in the directive line.
///
/// The result is trimmed, so it never ends with a newline.
pub fn serialize(doc: &Document, font: FontChoice) -> String {
    let mut out = format!("[FONT:{}]\n", font.directive_name());
    write_node(doc, doc.root(), &mut out);
    out.trim().to_string()
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let write_children = |out: &mut String| {
        for &child in doc.children(id) {
            write_node(doc, child, out);
        }
    };

    match doc.kind(id) {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Root => write_children(out),
        NodeKind::Element(Tag::Paragraph) => {
            write_children(out);
            out.push('\n');
        }
        NodeKind::Element(Tag::FontSize(px)) => {
            out.push_str(&format!("[SIZE:{}]", px));
            write_children(out);
            out.push_str("[/SIZE]");
        }
        NodeKind::Element(tag) => {
            let name = tag_name(*tag);
            out.push('[');
            out.push_str(name);
            out.push(']');
            write_children(out);
            out.push_str("[/");
            out.push_str(name);
            out.push(']');
        }
    }
}

fn tag_name(tag: Tag) -> &'static str {
    match tag {
        Tag::Bold => "BOLD",
        Tag::Italic => "ITALIC",
        Tag::Underline => "UNDERLINE",
        Tag::FontSize(_) => "SIZE",
        Tag::Paragraph => "P",
    }
}

/// Parse SNT into a document, ignoring the font directive.
pub fn parse(snt: &str) -> Document {
    parse_note(snt).document
}

/// Parse SNT into a document plus its font choice and line ending.
pub fn parse_note(snt: &str) -> SntNote {
    let line_ending = LineEnding::detect(snt);
    let text = LineEnding::normalize(snt);

    let (font, body) = match FONT_DIRECTIVE.captures(&text) {
        Some(captures) => {
            let font = captures
                .get(1)
                .map(|name| FontChoice::from_directive(name.as_str()))
                .unwrap_or_default();
            let consumed = captures.get(0).map_or(0, |all| all.end());
            (font, &text[consumed..])
        }
        None => (FontChoice::Normal, text.as_str()),
    };

    SntNote {
        font,
        document: parse_body(body),
        line_ending,
    }
}

fn parse_body(body: &str) -> Document {
    let marked = mark_tags(body);

    let mut doc = Document::new();
    let root = doc.root();
    for line in marked.split('\n').filter(|line| !line.trim().is_empty()) {
        let paragraph = build_paragraph(&mut doc, line);
        // Lines holding only empty tag pairs prune down to nothing.
        if doc.text_len(paragraph) > 0 {
            doc.append_child(root, paragraph);
        }
    }

    if doc.children(root).is_empty() {
        return Document::placeholder();
    }
    doc
}

/// Rewrite matched tag pairs to markers, pass by pass.
fn mark_tags(body: &str) -> String {
    let sanitized: String = body
        .chars()
        .map(|c| match c {
            OPEN | CLOSE | SIZE_END => char::REPLACEMENT_CHARACTER,
            other => other,
        })
        .collect();

    let bold = BOLD_TAG.replace_all(&sanitized, format!("{OPEN}B${{1}}{CLOSE}B"));
    let italic = ITALIC_TAG.replace_all(&bold, format!("{OPEN}I${{1}}{CLOSE}I"));
    let underline = UNDERLINE_TAG.replace_all(&italic, format!("{OPEN}U${{1}}{CLOSE}U"));
    SIZE_TAG
        .replace_all(&underline, format!("{OPEN}S${{1}}{SIZE_END}${{2}}{CLOSE}S"))
        .into_owned()
}

fn marker_tag(kind: char, size: Option<u32>) -> Option<Tag> {
    match kind {
        'B' => Some(Tag::Bold),
        'I' => Some(Tag::Italic),
        'U' => Some(Tag::Underline),
        'S' => Some(Tag::font_size(size.unwrap_or(1))),
        _ => None,
    }
}

/// Build one paragraph from a marked line.
///
/// Closing an element that still has open children closes them too, then reopens them after it.
fn build_paragraph(doc: &mut Document, line: &str) -> NodeId {
    let paragraph = doc.create_element(Tag::Paragraph);
    let mut open: Vec<(Tag, NodeId)> = Vec::new();
    let mut pending = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            OPEN => {
                let kind = chars.next().unwrap_or_default();
                let size = if kind == 'S' {
                    let digits: String = chars.by_ref().take_while(|&d| d != SIZE_END).collect();
                    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
                } else {
                    None
                };
                let Some(tag) = marker_tag(kind, size) else {
                    continue;
                };
                flush_text(doc, paragraph, &open, &mut pending);
                let element = doc.create_element(tag);
                doc.append_child(container(paragraph, &open), element);
                open.push((tag, element));
            }
            CLOSE => {
                let kind = chars.next().unwrap_or_default();
                let Some(tag) = marker_tag(kind, None) else {
                    continue;
                };
                flush_text(doc, paragraph, &open, &mut pending);
                let Some(position) = open.iter().rposition(|(found, _)| found.same_kind(tag))
                else {
                    continue;
                };
                let reopened: Vec<Tag> = open.drain(position..).skip(1).map(|(t, _)| t).collect();
                for tag in reopened {
                    let element = doc.create_element(tag);
                    doc.append_child(container(paragraph, &open), element);
                    open.push((tag, element));
                }
            }
            other => pending.push(other),
        }
    }
    flush_text(doc, paragraph, &open, &mut pending);

    doc.prune_empty(paragraph);
    paragraph
}

fn container(paragraph: NodeId, open: &[(Tag, NodeId)]) -> NodeId {
    open.last().map_or(paragraph, |&(_, node)| node)
}

fn flush_text(doc: &mut Document, paragraph: NodeId, open: &[(Tag, NodeId)], pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let text = doc.create_text(std::mem::take(pending));
    doc.append_child(container(paragraph, open), text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeSnapshot;

    #[test]
    fn test_font_choice_names() {
        assert_eq!(FontChoice::from_directive("FIRA_CODE"), FontChoice::Retro);
        assert_eq!(FontChoice::from_directive("COMIC_SANS"), FontChoice::Normal);
        assert_eq!("Stylish".parse::<FontChoice>(), Ok(FontChoice::Stylish));
        assert_eq!("GEIST_SANS".parse::<FontChoice>(), Ok(FontChoice::Normal));
        assert!("serif".parse::<FontChoice>().is_err());
    }

    #[test]
    fn test_mark_tags_pass_order() {
        let marked = mark_tags("[SIZE:20][BOLD]x[/BOLD][/SIZE]");
        assert_eq!(
            marked,
            format!("{OPEN}S20{SIZE_END}{OPEN}Bx{CLOSE}B{CLOSE}S")
        );
    }

    #[test]
    fn test_marker_chars_in_input_are_replaced() {
        let doc = parse("a\u{E000}Bb");
        assert_eq!(doc.plain_text(), "a\u{FFFD}Bb");
    }

    #[test]
    fn test_misnested_tags_reopen_inner_element() {
        let doc = parse("[BOLD]a[ITALIC]b[/BOLD]c[/ITALIC]");
        assert_eq!(
            doc.snapshot(),
            vec![NodeSnapshot::element(
                Tag::Paragraph,
                vec![
                    NodeSnapshot::element(
                        Tag::Bold,
                        vec![
                            NodeSnapshot::text("a"),
                            NodeSnapshot::element(Tag::Italic, vec![NodeSnapshot::text("b")]),
                        ]
                    ),
                    NodeSnapshot::element(Tag::Italic, vec![NodeSnapshot::text("c")]),
                ]
            )]
        );
    }

    #[test]
    fn test_oversized_and_zero_sizes_are_clamped() {
        let doc = parse("[SIZE:0]a[/SIZE][SIZE:99999999999]b[/SIZE]");
        assert_eq!(
            doc.snapshot(),
            vec![NodeSnapshot::element(
                Tag::Paragraph,
                vec![
                    NodeSnapshot::element(Tag::FontSize(1), vec![NodeSnapshot::text("a")]),
                    NodeSnapshot::element(Tag::FontSize(u32::MAX), vec![NodeSnapshot::text("b")]),
                ]
            )]
        );
    }

    #[test]
    fn test_crlf_is_detected_and_restored() {
        let note = parse_note("[FONT:GEIST_STYLISH]\r\none\r\ntwo");
        assert_eq!(note.font, FontChoice::Stylish);
        assert_eq!(note.line_ending, LineEnding::Crlf);
        assert_eq!(note.document.plain_text(), "one\ntwo");
        assert_eq!(note.to_snt(), "[FONT:GEIST_STYLISH]\r\none\r\ntwo");
    }
}
