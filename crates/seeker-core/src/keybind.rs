//! Keyboard shortcuts for style toggles.
//!
//! Bindings are written the way they appear in [`StyleConfig::keybind`](crate::StyleConfig):
//! lowercase, `+`-separated, with the main key last (`"ctrl+b"`, `"ctrl+shift+x"`).
//! `ctrl` is satisfied by either the Control or the Command (meta) key.

use crate::styles::StyleKey;
use std::str::FromStr;

/// A key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    /// Logical key value (`"b"`, `"Enter"`, ...).
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Command / Windows key held.
    pub meta: bool,
    /// Shift held.
    pub shift: bool,
    /// Alt / Option held.
    pub alt: bool,
}

impl KeyPress {
    /// A press of `key` with no modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// `Ctrl` + `key`.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            ..Self::new(key)
        }
    }
}

/// Parsed keybinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    /// Requires Control (or Command).
    pub ctrl: bool,
    /// Requires Shift.
    pub shift: bool,
    /// Requires Alt.
    pub alt: bool,
    /// Main key, lowercase.
    pub key: String,
}

/// Error returned when a keybinding string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeybindParseError {
    /// The string contained no main key.
    MissingKey,
    /// A modifier name was not recognized.
    UnknownModifier(String),
}

impl std::fmt::Display for KeybindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeybindParseError::MissingKey => write!(f, "Keybind has no main key"),
            KeybindParseError::UnknownModifier(name) => {
                write!(f, "Unknown keybind modifier: {}", name)
            }
        }
    }
}

impl std::error::Error for KeybindParseError {}

impl FromStr for Keybind {
    type Err = KeybindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let mut parts: Vec<&str> = lowered.split('+').map(str::trim).collect();
        let key = match parts.pop() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(KeybindParseError::MissingKey),
        };

        let mut bind = Keybind {
            ctrl: false,
            shift: false,
            alt: false,
            key,
        };
        for modifier in parts {
            match modifier {
                "ctrl" | "cmd" | "meta" => bind.ctrl = true,
                "shift" => bind.shift = true,
                "alt" | "option" => bind.alt = true,
                other => return Err(KeybindParseError::UnknownModifier(other.to_string())),
            }
        }
        Ok(bind)
    }
}

impl Keybind {
    /// Returns `true` if `press` triggers this binding.
    ///
    /// Extra modifiers are tolerated; a binding without any modifier never matches, so plain
    /// typing cannot trigger it.
    pub fn matches(&self, press: &KeyPress) -> bool {
        let has_modifier = self.ctrl || self.shift || self.alt;
        has_modifier
            && (!self.ctrl || press.ctrl || press.meta)
            && (!self.shift || press.shift)
            && (!self.alt || press.alt)
            && press.key.to_lowercase() == self.key
    }
}

/// Style whose default keybinding matches `press`.
pub fn style_for_key(press: &KeyPress) -> Option<StyleKey> {
    StyleKey::ALL.into_iter().find(|key| {
        key.config()
            .keybind
            .parse::<Keybind>()
            .is_ok_and(|bind| bind.matches(press))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keybind() {
        let bind: Keybind = "Ctrl+Shift+K".parse().unwrap();
        assert!(bind.ctrl && bind.shift && !bind.alt);
        assert_eq!(bind.key, "k");
        assert_eq!("ctrl+".parse::<Keybind>(), Err(KeybindParseError::MissingKey));
        assert_eq!(
            "hyper+x".parse::<Keybind>(),
            Err(KeybindParseError::UnknownModifier("hyper".to_string()))
        );
    }

    #[test]
    fn test_default_style_bindings() {
        assert_eq!(style_for_key(&KeyPress::ctrl("b")), Some(StyleKey::Bold));
        assert_eq!(style_for_key(&KeyPress::ctrl("I")), Some(StyleKey::Italic));
        let meta_u = KeyPress {
            meta: true,
            ..KeyPress::new("u")
        };
        assert_eq!(style_for_key(&meta_u), Some(StyleKey::Underline));
        assert_eq!(style_for_key(&KeyPress::new("b")), None);
        assert_eq!(style_for_key(&KeyPress::ctrl("x")), None);
    }

    #[test]
    fn test_modifierless_bind_never_matches() {
        let bind: Keybind = "b".parse().unwrap();
        assert!(!bind.matches(&KeyPress::new("b")));
    }
}
