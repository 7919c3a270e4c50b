//! Inline style keys and active-style queries.

use crate::document::{Document, NodeId, Tag};
use crate::selection::Selection;

/// Font size (px) assumed when nothing in the selection's ancestry sets one.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// A toggleable inline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleKey {
    /// Bold
    Bold,
    /// Italic
    Italic,
    /// Underline
    Underline,
}

/// Static presentation data for a [`StyleKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConfig {
    /// Toolbar label.
    pub label: &'static str,
    /// Default keybinding (see [`crate::Keybind`]).
    pub keybind: &'static str,
    /// Tag name used when rendering to editable HTML.
    pub html_tag: &'static str,
    /// Document element tag.
    pub tag: Tag,
}

const BOLD_CONFIG: StyleConfig = StyleConfig {
    label: "Bold",
    keybind: "ctrl+b",
    html_tag: "strong",
    tag: Tag::Bold,
};

const ITALIC_CONFIG: StyleConfig = StyleConfig {
    label: "Italic",
    keybind: "ctrl+i",
    html_tag: "em",
    tag: Tag::Italic,
};

const UNDERLINE_CONFIG: StyleConfig = StyleConfig {
    label: "Underline",
    keybind: "ctrl+u",
    html_tag: "u",
    tag: Tag::Underline,
};

impl StyleKey {
    /// All style keys, in toolbar order.
    pub const ALL: [StyleKey; 3] = [StyleKey::Bold, StyleKey::Italic, StyleKey::Underline];

    /// Presentation data for this style.
    pub fn config(self) -> &'static StyleConfig {
        match self {
            StyleKey::Bold => &BOLD_CONFIG,
            StyleKey::Italic => &ITALIC_CONFIG,
            StyleKey::Underline => &UNDERLINE_CONFIG,
        }
    }

    /// Document tag for this style.
    pub fn tag(self) -> Tag {
        self.config().tag
    }

    /// Style represented by `tag`, if it is one of the toggleable ones.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            Tag::Bold => Some(StyleKey::Bold),
            Tag::Italic => Some(StyleKey::Italic),
            Tag::Underline => Some(StyleKey::Underline),
            Tag::FontSize(_) | Tag::Paragraph => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            StyleKey::Bold => 1,
            StyleKey::Italic => 1 << 1,
            StyleKey::Underline => 1 << 2,
        }
    }
}

/// Set of [`StyleKey`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleSet(u8);

impl StyleSet {
    /// Empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns `true` if `key` is in the set.
    pub fn contains(self, key: StyleKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Add `key`.
    pub fn insert(&mut self, key: StyleKey) {
        self.0 |= key.bit();
    }

    /// Remove `key`.
    pub fn remove(&mut self, key: StyleKey) {
        self.0 &= !key.bit();
    }

    /// Add `key` if absent, remove it otherwise.
    pub fn toggle(&mut self, key: StyleKey) {
        self.0 ^= key.bit();
    }

    /// Styles present in exactly one of the two sets.
    pub fn symmetric_difference(self, other: StyleSet) -> StyleSet {
        StyleSet(self.0 ^ other.0)
    }

    /// Returns `true` if no style is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of styles in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Styles in toolbar order.
    pub fn iter(self) -> impl Iterator<Item = StyleKey> {
        StyleKey::ALL.into_iter().filter(move |&key| self.contains(key))
    }
}

impl std::fmt::Debug for StyleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StyleKey> for StyleSet {
    fn from_iter<I: IntoIterator<Item = StyleKey>>(iter: I) -> Self {
        let mut set = StyleSet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Styles applied by the elements enclosing `node` (including `node` itself).
pub fn styles_at_node(doc: &Document, node: NodeId) -> StyleSet {
    doc.inclusive_ancestors(node)
        .filter_map(|id| doc.tag(id).and_then(StyleKey::from_tag))
        .collect()
}

/// Styles active at the selection.
///
/// Walks up from the selection's anchor and collects every style element on the way. For a
/// caret, pending typing toggles are folded in. An absent or detached selection yields the
/// empty set.
pub fn compute_active_styles(doc: &Document, selection: &Selection) -> StyleSet {
    let Some(anchor) = selection.anchor() else {
        return StyleSet::new();
    };
    if !doc.is_attached(anchor.node) {
        return StyleSet::new();
    }

    let active = styles_at_node(doc, anchor.node);
    if selection.is_collapsed() {
        active.symmetric_difference(selection.typing().toggled)
    } else {
        active
    }
}

/// Font size at the selection: a pending caret size, else the nearest font-size element
/// enclosing the anchor, else `fallback`.
pub fn current_font_size(doc: &Document, selection: &Selection, fallback: u32) -> u32 {
    if selection.is_collapsed()
        && let Some(px) = selection.typing().font_size
    {
        return px;
    }

    let Some(anchor) = selection.anchor() else {
        return fallback;
    };
    if !doc.is_attached(anchor.node) {
        return fallback;
    }

    doc.inclusive_ancestors(anchor.node)
        .find_map(|id| match doc.tag(id) {
            Some(Tag::FontSize(px)) if px > 0 => Some(px),
            _ => None,
        })
        .unwrap_or(fallback)
}
