//! Host-owned selection state.
//!
//! The host editing surface owns one [`Selection`] and lends it to the style engine and the
//! editing helpers for the duration of one call. Besides the current [`Range`], a collapsed
//! selection carries the caret's pending [`TypingFormat`]: formatting toggled at the insertion
//! point that only materializes once text is typed.

use crate::document::Document;
use crate::range::{Boundary, Range};
use crate::styles::{StyleKey, StyleSet};

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionDirection {
    /// Anchor at the start, focus at the end.
    #[default]
    Forward,
    /// Anchor at the end, focus at the start.
    Backward,
}

/// Formatting pending at a collapsed caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingFormat {
    /// Styles whose state is inverted for the next typed text.
    pub toggled: StyleSet,
    /// Font size applied to the next typed text.
    pub font_size: Option<u32>,
}

impl TypingFormat {
    /// Returns `true` if typed text would be inserted unchanged.
    pub fn is_empty(&self) -> bool {
        self.toggled.is_empty() && self.font_size.is_none()
    }
}

/// Current selection of an editing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    range: Option<Range>,
    direction: SelectionDirection,
    typing: TypingFormat,
}

impl Selection {
    /// No selection at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// A caret at `point`.
    pub fn caret(point: Boundary) -> Self {
        Self::from_range(Range::collapsed_at(point))
    }

    /// A forward selection over `range`.
    pub fn from_range(range: Range) -> Self {
        Self {
            range: Some(range),
            direction: SelectionDirection::Forward,
            typing: TypingFormat::default(),
        }
    }

    /// A selection dragged from `anchor` to `focus`.
    pub fn from_points(doc: &Document, anchor: Boundary, focus: Boundary) -> Self {
        let range = Range::new(doc, anchor, focus);
        let direction = if range.start == anchor {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        };
        Self {
            range: Some(range),
            direction,
            typing: TypingFormat::default(),
        }
    }

    /// The selected range, if any.
    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    /// Replace the selected range. Pending caret formatting is dropped.
    pub fn set_range(&mut self, range: Range) {
        self.range = Some(range);
        self.direction = SelectionDirection::Forward;
        self.typing = TypingFormat::default();
    }

    /// Remove the selection.
    pub fn clear(&mut self) {
        *self = Self::none();
    }

    /// Selection direction.
    pub fn direction(&self) -> SelectionDirection {
        self.direction
    }

    /// The point where the selection started.
    pub fn anchor(&self) -> Option<Boundary> {
        let range = self.range.as_ref()?;
        Some(match self.direction {
            SelectionDirection::Forward => range.start,
            SelectionDirection::Backward => range.end,
        })
    }

    /// The point where the selection currently ends.
    pub fn focus(&self) -> Option<Boundary> {
        let range = self.range.as_ref()?;
        Some(match self.direction {
            SelectionDirection::Forward => range.end,
            SelectionDirection::Backward => range.start,
        })
    }

    /// Returns `true` for a caret; an absent selection counts as collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.range.as_ref().is_none_or(Range::is_collapsed)
    }

    /// Text spanned by the selection.
    pub fn text(&self, doc: &Document) -> String {
        self.range
            .as_ref()
            .map(|range| range.text(doc))
            .unwrap_or_default()
    }

    /// Returns `true` if the selection points into the live tree of `doc`.
    pub fn is_valid(&self, doc: &Document) -> bool {
        self.range.as_ref().is_some_and(|range| range.is_attached(doc))
    }

    /// Pending caret formatting.
    pub fn typing(&self) -> &TypingFormat {
        &self.typing
    }

    /// Flip a style for the next typed text. Only meaningful for a caret.
    pub fn toggle_typing_style(&mut self, key: StyleKey) {
        self.typing.toggled.toggle(key);
    }

    /// Use `px` for the next typed text. Only meaningful for a caret.
    pub fn set_typing_font_size(&mut self, px: u32) {
        self.typing.font_size = Some(px.max(1));
    }
}
