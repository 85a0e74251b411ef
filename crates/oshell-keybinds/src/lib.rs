//! # oshell-keybinds
//!
//! Key chord types for the OShell window-manager shell.
//!
//! ## Features
//!
//! - `KeyBinding`: a key + modifier chord, used for both top keys and sub keys
//! - Notation parser accepting `C-t`, `ctrl+t`, `<C-t>` and ratpoison key names
//! - Text (`Ctrl+T`) and ratpoison (`C-t`) display forms

mod binding;
mod parser;

pub use binding::KeyBinding;
pub use parser::{parse_key, ParseError};

pub use crossterm::event::{KeyCode, KeyModifiers};

/// Helper to create a key binding from a key code.
pub fn key(code: KeyCode) -> KeyBinding {
    KeyBinding::key(code)
}

/// Helper to create a Ctrl+key binding.
pub fn ctrl(c: char) -> KeyBinding {
    KeyBinding::ctrl(c)
}

/// Helper to create an Alt+key binding.
pub fn alt(c: char) -> KeyBinding {
    KeyBinding::alt(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_helpers() {
        let k = key(KeyCode::Enter);
        assert_eq!(k.key, KeyCode::Enter);
        assert_eq!(k.modifiers, KeyModifiers::NONE);

        let c = ctrl('t');
        assert!(c.modifiers.contains(KeyModifiers::CONTROL));

        let a = alt('x');
        assert!(a.modifiers.contains(KeyModifiers::ALT));
    }

    #[test]
    fn test_binding_serialization() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            binding: KeyBinding,
        }

        let wrapper = Wrapper {
            binding: ctrl('t'),
        };
        let text = toml::to_string(&wrapper).unwrap();
        let restored: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(restored.binding, ctrl('t'));
    }
}
