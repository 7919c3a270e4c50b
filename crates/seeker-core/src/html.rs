//! Editable-HTML side of the format converter.
//!
//! [`to_html`] renders a document as the markup an editing surface displays; [`from_html`]
//! reads whatever that surface hands back. Only a fixed set of tags carries meaning:
//!
//! | HTML                                   | Document              |
//! |----------------------------------------|-----------------------|
//! | `<b>`, `<strong>`                      | [`Tag::Bold`]         |
//! | `<i>`, `<em>`                          | [`Tag::Italic`]       |
//! | `<u>`                                  | [`Tag::Underline`]    |
//! | `<span style="font-size:Npx">`         | [`Tag::FontSize`]     |
//! | `<font size="7">`                      | [`Tag::FontSize`] at the current size |
//! | `<p>`, `<div>`                         | [`Tag::Paragraph`]    |
//! | `<br>`                                 | paragraph break       |
//!
//! Every other tag is dropped and its children kept. Reading never fails.

use crate::document::{Document, NodeId, NodeKind, Tag};
use crate::snt::{self, FontChoice};
use crate::styles::{DEFAULT_FONT_SIZE, StyleKey};

/// Render `doc` as editable HTML.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    write_node(doc, doc.root(), &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let (open, close) = match doc.kind(id) {
        NodeKind::Text(text) => {
            escape_into(text, out);
            return;
        }
        NodeKind::Root => (String::new(), String::new()),
        NodeKind::Element(Tag::Paragraph) => ("<p>".to_string(), "</p>".to_string()),
        NodeKind::Element(Tag::FontSize(px)) => (
            format!("<span style=\"font-size:{}px;\">", px),
            "</span>".to_string(),
        ),
        NodeKind::Element(tag) => match StyleKey::from_tag(*tag) {
            Some(key) => {
                let name = key.config().html_tag;
                (format!("<{}>", name), format!("</{}>", name))
            }
            None => (String::new(), String::new()),
        },
    };

    out.push_str(&open);
    for &child in doc.children(id) {
        write_node(doc, child, out);
    }
    out.push_str(&close);
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}

/// Read editable HTML into a document.
///
/// `<font size="7">` elements are read at [`DEFAULT_FONT_SIZE`].
pub fn from_html(html: &str) -> Document {
    from_html_with_font_size(html, DEFAULT_FONT_SIZE)
}

/// Read editable HTML, mapping `<font size="7">` to `font_size` px.
///
/// Surfaces that apply sizes through their native font command emit that legacy element; the
/// size the user picked is only known to the caller.
pub fn from_html_with_font_size(html: &str, font_size: u32) -> Document {
    let mut builder = TreeBuilder::new(font_size);
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        if rest.starts_with('<') {
            match scan_tag(rest) {
                Some((token, consumed)) => {
                    builder.token(token);
                    rest = &rest[consumed..];
                }
                None => {
                    builder.text("<");
                    rest = &rest[1..];
                }
            }
            continue;
        }

        let end = rest.find('<').unwrap_or(rest.len());
        builder.text(&rest[..end]);
        rest = &rest[end..];
    }

    builder.finish()
}

/// `serialize(from_html(html), font)`
pub fn html_to_snt(html: &str, font: FontChoice) -> String {
    snt::serialize(&from_html(html), font)
}

/// `to_html(parse(snt))`
pub fn snt_to_html(snt_text: &str) -> String {
    to_html(&snt::parse(snt_text))
}

#[derive(Debug, PartialEq, Eq)]
enum TagToken {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    Skip,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':'
}

/// Scan one tag at the start of `input`. Returns the token and the bytes consumed.
fn scan_tag(input: &str) -> Option<(TagToken, usize)> {
    let bytes = input.as_bytes();
    let len = bytes.len();

    match *bytes.get(1)? {
        b'!' | b'?' => {
            let end = input.find('>')?;
            return Some((TagToken::Skip, end + 1));
        }
        b'/' => {
            let start = 2;
            let mut i = start;
            while i < len && is_name_byte(bytes[i]) {
                i += 1;
            }
            if i == start {
                return None;
            }
            let name = input[start..i].to_ascii_lowercase();
            let end = input[i..].find('>')? + i;
            return Some((TagToken::Close { name }, end + 1));
        }
        c if c.is_ascii_alphabetic() => {}
        _ => return None,
    }

    let mut i = 1;
    while i < len && is_name_byte(bytes[i]) {
        i += 1;
    }
    let name = input[1..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match *bytes.get(i)? {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
                continue;
            }
            _ => self_closing = false,
        }

        let start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == start {
            i += 1;
            continue;
        }
        let attr_name = input[start..i].to_ascii_lowercase();

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match *bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let start = i + 1;
                    let end = input[start..].find(quote as char)? + start;
                    value = decode_entities(&input[start..end]);
                    i = end + 1;
                }
                _ => {
                    let start = i;
                    while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&input[start..i]);
                }
            }
        }
        attrs.push((attr_name, value));
    }

    Some((
        TagToken::Open {
            name,
            attrs,
            self_closing,
        },
        i,
    ))
}

fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Leading integer of a CSS length, the way `parseInt` reads `"18px"` or `"12.5px"`.
fn leading_integer(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

fn style_font_size(style: &str) -> Option<u32> {
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        if property.trim().eq_ignore_ascii_case("font-size") {
            leading_integer(value)
        } else {
            None
        }
    })
}

fn recognized_tag(name: &str, attrs: &[(String, String)], font_size: u32) -> Option<Tag> {
    match name {
        "b" | "strong" => Some(Tag::Bold),
        "i" | "em" => Some(Tag::Italic),
        "u" => Some(Tag::Underline),
        "span" => attr(attrs, "style")
            .and_then(style_font_size)
            .map(Tag::font_size),
        "font" if attr(attrs, "size").map(str::trim) == Some("7") => Some(Tag::font_size(font_size)),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{A0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

struct Frame {
    name: String,
    tag: Option<Tag>,
    node: Option<NodeId>,
}

/// Builds a document from a tag/text stream.
///
/// Inline elements are created lazily, when text first needs them, so a paragraph boundary
/// inside an open inline element continues that element in the next paragraph.
struct TreeBuilder {
    doc: Document,
    paragraph: Option<NodeId>,
    frames: Vec<Frame>,
    font_size: u32,
}

impl TreeBuilder {
    fn new(font_size: u32) -> Self {
        Self {
            doc: Document::new(),
            paragraph: None,
            frames: Vec::new(),
            font_size,
        }
    }

    fn token(&mut self, token: TagToken) {
        match token {
            TagToken::Open {
                name,
                attrs,
                self_closing,
            } => match name.as_str() {
                "p" | "div" => self.start_paragraph(),
                "br" => self.line_break(),
                _ if self_closing || is_void(&name) => {}
                _ => {
                    let tag = recognized_tag(&name, &attrs, self.font_size);
                    self.frames.push(Frame {
                        name,
                        tag,
                        node: None,
                    });
                }
            },
            TagToken::Close { name } => match name.as_str() {
                "p" | "div" => self.end_paragraph(),
                "br" => {}
                _ => {
                    if let Some(position) = self.frames.iter().rposition(|f| f.name == name) {
                        self.frames.truncate(position);
                    }
                }
            },
            TagToken::Skip => {}
        }
    }

    fn text(&mut self, raw: &str) {
        let text = decode_entities(&collapse_whitespace(raw));
        if text.is_empty() {
            return;
        }
        let styled = self.frames.iter().any(|frame| frame.tag.is_some());
        if text == " " && self.paragraph.is_none() && !styled {
            return;
        }

        let parent = self.materialize();
        let node = self.doc.create_text(text);
        self.doc.append_child(parent, node);
    }

    /// Container for new text: the open paragraph (or root) plus every open inline element.
    fn materialize(&mut self) -> NodeId {
        let mut parent = self.paragraph.unwrap_or_else(|| self.doc.root());
        for frame in &mut self.frames {
            let Some(tag) = frame.tag else {
                continue;
            };
            let node = match frame.node {
                Some(node) => node,
                None => {
                    let node = self.doc.create_element(tag);
                    self.doc.append_child(parent, node);
                    frame.node = Some(node);
                    node
                }
            };
            parent = node;
        }
        parent
    }

    fn detach_frames(&mut self) {
        for frame in &mut self.frames {
            frame.node = None;
        }
    }

    fn start_paragraph(&mut self) {
        let paragraph = self.doc.create_element(Tag::Paragraph);
        let root = self.doc.root();
        self.doc.append_child(root, paragraph);
        self.paragraph = Some(paragraph);
        self.detach_frames();
    }

    fn end_paragraph(&mut self) {
        self.paragraph = None;
        self.detach_frames();
    }

    fn line_break(&mut self) {
        if self.paragraph.is_none() {
            self.wrap_trailing_inline();
        }
        self.start_paragraph();
    }

    /// Move the run of loose inline content at the end of the root into a paragraph.
    fn wrap_trailing_inline(&mut self) {
        let root = self.doc.root();
        let children = self.doc.children(root).to_vec();
        let start = children
            .iter()
            .rposition(|&child| self.doc.tag(child) == Some(Tag::Paragraph))
            .map_or(0, |index| index + 1);
        if start == children.len() {
            return;
        }

        let paragraph = self.doc.create_element(Tag::Paragraph);
        for &child in &children[start..] {
            self.doc.append_child(paragraph, child);
        }
        self.doc.append_child(root, paragraph);
    }

    fn finish(mut self) -> Document {
        let root = self.doc.root();
        self.doc.prune_empty(root);
        self.doc
    }
}
