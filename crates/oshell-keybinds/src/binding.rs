//! Key binding types.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key chord (key + modifiers).
///
/// The same type names both the top key that activates a keymap and the
/// sub key looked up inside an active keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    /// The key code
    pub key: KeyCode,
    /// Modifier keys (Ctrl, Alt, Shift, Super)
    #[serde(default = "default_modifiers")]
    pub modifiers: KeyModifiers,
}

fn default_modifiers() -> KeyModifiers {
    KeyModifiers::NONE
}

impl KeyBinding {
    /// The "no key" sentinel. Never a valid top key.
    pub const NONE: KeyBinding = KeyBinding {
        key: KeyCode::Null,
        modifiers: KeyModifiers::NONE,
    };

    /// Create a new key binding.
    pub fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key binding with no modifiers.
    pub fn key(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a plain character binding.
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// Create a Ctrl+key binding.
    pub fn ctrl(c: char) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Create an Alt+key binding.
    pub fn alt(c: char) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            modifiers: KeyModifiers::ALT,
        }
    }

    /// Create a Super (Win) + key binding.
    pub fn super_key(c: char) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            modifiers: KeyModifiers::SUPER,
        }
    }

    /// Add modifiers to this binding.
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Check if this is the "no key" sentinel.
    pub fn is_none(&self) -> bool {
        self.key == KeyCode::Null
    }

    /// Check if this matches a crossterm key event.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<KeyEvent> for KeyBinding {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // ratpoison notation: C-M-t
            let mut out = String::new();
            if self.modifiers.contains(KeyModifiers::CONTROL) {
                out.push_str("C-");
            }
            if self.modifiers.contains(KeyModifiers::ALT) {
                out.push_str("M-");
            }
            if self.modifiers.contains(KeyModifiers::SHIFT) {
                out.push_str("S-");
            }
            if self.modifiers.contains(KeyModifiers::SUPER) {
                out.push_str("W-");
            }
            out.push_str(&short_key_name(self.key));
            return write!(f, "{}", out);
        }

        let mut parts = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SUPER) {
            parts.push("Super".to_string());
        }

        let key_str = match self.key {
            KeyCode::Null => "None".to_string(),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_uppercase().to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            other => format!("{:?}", other),
        };

        parts.push(key_str);
        write!(f, "{}", parts.join("+"))
    }
}

fn short_key_name(key: KeyCode) -> String {
    match key {
        KeyCode::Null => "none".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => crate::parser::punctuation_name(c)
            .map(str::to_string)
            .unwrap_or_else(|| c.to_string()),
        KeyCode::Enter => "Return".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "BackSpace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "Prior".to_string(),
        KeyCode::PageDown => "Next".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        other => format!("{:?}", other),
    }
}
