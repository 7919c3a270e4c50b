#![warn(missing_docs)]
//! Seeker Core - Headless Rich-Text Note Engine
//!
//! # Overview
//!
//! `seeker-core` holds the logic of a rich-text note editor without any rendering or I/O: the
//! formatted document tree, the SNT note format it is saved as, and the selection-aware style
//! toggler a toolbar drives. The host editing surface owns the [`Document`] and the
//! [`Selection`] and lends both to the engine for each operation.
//!
//! # Core Features
//!
//! - **Format Converter**: [`snt::serialize`] / [`snt::parse`] between a document and SNT markup,
//!   plus [`html::to_html`] / [`html::from_html`] for editable-HTML surfaces
//! - **Style Engine**: bold, italic, underline and font size over arbitrary, possibly partial,
//!   selections, keeping the selection on the modified content
//! - **Active Styles**: which styles apply at the caret, including formatting pending at it
//! - **Editing**: text insertion, paragraph breaks and deletion at the selection
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Style Engine / Keybinds / Editing          │  ← Host commands
//! ├─────────────────────────────────────────────┤
//! │  Format Converter (SNT, editable HTML)      │  ← Load / save
//! ├─────────────────────────────────────────────┤
//! │  Selection + Range primitives               │  ← Host surface model
//! ├─────────────────────────────────────────────┤
//! │  Formatted Document (node arena)            │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Loading and saving a note
//!
//! ```rust
//! use seeker_core::{FontChoice, snt};
//!
//! let note = snt::parse_note("[FONT:FIRA_CODE]\n[BOLD]Hello[/BOLD] world\n");
//! assert_eq!(note.font, FontChoice::Retro);
//! assert_eq!(note.document.plain_text(), "Hello world");
//!
//! assert_eq!(
//!     snt::serialize(&note.document, FontChoice::Retro),
//!     "[FONT:FIRA_CODE]\n[BOLD]Hello[/BOLD] world"
//! );
//! ```
//!
//! ## Toggling a style from a key press
//!
//! ```rust
//! use seeker_core::{Boundary, KeyPress, Range, Selection, StyleEngine, StyleKey, snt};
//!
//! let mut doc = snt::parse("[FONT:GEIST_SANS]\nmake this bold");
//! let text = doc.text_nodes(doc.root())[0];
//! let mut selection =
//!     Selection::from_range(Range::new(&doc, Boundary::new(text, 10), Boundary::new(text, 14)));
//!
//! let mut engine = StyleEngine::new();
//! engine.subscribe(|active| println!("active styles: {:?}", active));
//!
//! engine.handle_key(&KeyPress::ctrl("b"), &mut doc, &mut selection);
//! engine.settle(&doc, &selection);
//!
//! assert!(engine.is_style_active(StyleKey::Bold));
//! assert_eq!(
//!     snt::serialize(&doc, Default::default()),
//!     "[FONT:GEIST_SANS]\nmake this [BOLD]bold[/BOLD]"
//! );
//! ```
//!
//! # Module Description
//!
//! - [`document`] - Formatted document tree
//! - [`range`] - Boundary points and DOM-style range operations
//! - [`selection`] - Host selection state and caret formatting
//! - [`snt`] - SNT note format
//! - [`html`] - Editable-HTML conversion
//! - [`styles`] - Style keys and active-style queries
//! - [`style_engine`] - Style toggling over a selection
//! - [`keybind`] - Keyboard shortcuts
//! - [`editing`] - Text editing at the selection
//!
//! # Unicode Support
//!
//! - Offsets inside text nodes count Unicode scalar values, never bytes
//! - Non-breaking spaces read from HTML are kept as `U+00A0`

pub mod document;
pub mod editing;
pub mod html;
pub mod keybind;
pub mod range;
pub mod selection;
pub mod snt;
mod split;
pub mod style_engine;
pub mod styles;
mod text;

pub use document::{Document, NodeId, NodeKind, NodeSnapshot, PLACEHOLDER_TEXT, Tag};
pub use editing::{delete_selection, insert_paragraph_break, insert_text};
pub use html::{from_html, from_html_with_font_size, html_to_snt, snt_to_html, to_html};
pub use keybind::{KeyPress, Keybind, KeybindParseError, style_for_key};
pub use range::{Boundary, Range, WrapError, compare_boundaries};
pub use selection::{Selection, SelectionDirection, TypingFormat};
pub use snt::{FontChoice, LineEnding, SntNote, UnknownFontChoice, parse, parse_note, serialize};
pub use style_engine::{ActiveStylesCallback, StyleEngine, ToggleOutcome};
pub use styles::{
    DEFAULT_FONT_SIZE, StyleConfig, StyleKey, StyleSet, compute_active_styles, current_font_size,
    styles_at_node,
};
