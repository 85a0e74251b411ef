//! Key notation parser.

use crate::binding::KeyBinding;
use crossterm::event::{KeyCode, KeyModifiers};
use thiserror::Error;

/// Named punctuation keys, as written in rc files (`definekey top colon colon`).
const PUNCTUATION: &[(&str, char)] = &[
    ("colon", ':'),
    ("semicolon", ';'),
    ("exclam", '!'),
    ("question", '?'),
    ("at", '@'),
    ("numbersign", '#'),
    ("dollar", '$'),
    ("percent", '%'),
    ("asciicircum", '^'),
    ("ampersand", '&'),
    ("asterisk", '*'),
    ("parenleft", '('),
    ("parenright", ')'),
    ("minus", '-'),
    ("underscore", '_'),
    ("equal", '='),
    ("plus", '+'),
    ("bracketleft", '['),
    ("bracketright", ']'),
    ("braceleft", '{'),
    ("braceright", '}'),
    ("backslash", '\\'),
    ("bar", '|'),
    ("apostrophe", '\''),
    ("quotedbl", '"'),
    ("comma", ','),
    ("period", '.'),
    ("slash", '/'),
    ("less", '<'),
    ("greater", '>'),
    ("grave", '`'),
    ("asciitilde", '~'),
];

/// Name of a punctuation character, if it has one.
pub(crate) fn punctuation_name(c: char) -> Option<&'static str> {
    PUNCTUATION
        .iter()
        .find(|(_, ch)| *ch == c)
        .map(|(name, _)| *name)
}

/// Parse a key notation string into a KeyBinding.
///
/// Supported formats:
/// - `"ctrl+t"`, `"C-t"`, `"<C-t>"`, `"Control+T"` - Ctrl+T
/// - `"alt+x"`, `"A-x"`, `"M-x"` - Alt+X (M for Meta, as in ratpoison)
/// - `"shift+tab"`, `"S-tab"` - Shift+Tab
/// - `"super+x"`, `"win+x"` - Super+X
/// - `"enter"`, `"escape"`, `"tab"`, `"space"` - Special keys
/// - `"colon"`, `"exclam"`, ... - Named punctuation
/// - `"f1"` through `"f24"` - Function keys
pub fn parse_key(s: &str) -> Result<KeyBinding, ParseError> {
    let s = s.trim();

    // Handle angle bracket notation <C-x>
    let s = s.strip_prefix('<').and_then(|s| s.strip_suffix('>')).unwrap_or(s);

    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = if s.contains('+') && s.len() > 1 {
        s.split('+').collect()
    } else if s.contains('-') && s.len() > 2 {
        // Handle ratpoison/emacs notation like C-t, M-x
        s.split('-').collect()
    } else {
        vec![s]
    };

    // Process modifiers (all but last part)
    while parts.len() > 1 {
        let modifier = parts.remove(0).to_lowercase();
        match modifier.as_str() {
            "ctrl" | "control" | "c" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "option" | "a" | "m" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" | "s" => modifiers |= KeyModifiers::SHIFT,
            "super" | "win" | "w" | "cmd" | "command" => modifiers |= KeyModifiers::SUPER,
            _ => return Err(ParseError::UnknownModifier(modifier)),
        }
    }

    let key_str = parts[0].to_lowercase();
    if key_str.is_empty() {
        return Err(ParseError::Empty);
    }

    let key = match key_str.as_str() {
        // Special keys
        "enter" | "return" | "cr" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),

        // Arrow keys
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,

        // Navigation
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" | "prior" => KeyCode::PageUp,
        "pagedown" | "pgdn" | "pgdown" | "next" => KeyCode::PageDown,

        // Function keys
        s if s.len() > 1 && s.starts_with('f') && s[1..].chars().all(|c| c.is_ascii_digit()) => {
            match s[1..].parse::<u8>() {
                Ok(n @ 1..=24) => KeyCode::F(n),
                _ => return Err(ParseError::UnknownKey(key_str)),
            }
        }

        // Single character
        s if s.chars().count() == 1 => match s.chars().next() {
            Some(c) => KeyCode::Char(c),
            None => return Err(ParseError::Empty),
        },

        // Named punctuation
        s => match PUNCTUATION.iter().find(|(name, _)| *name == s) {
            Some((_, c)) => KeyCode::Char(*c),
            None => return Err(ParseError::UnknownKey(key_str)),
        },
    };

    Ok(KeyBinding { key, modifiers })
}

/// Error parsing a key notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Empty input
    #[error("empty key notation")]
    Empty,
    /// Unknown modifier
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    /// Unknown key
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let key = parse_key("a").unwrap();
        assert_eq!(key.key, KeyCode::Char('a'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_ctrl() {
        let key = parse_key("ctrl+t").unwrap();
        assert_eq!(key, KeyBinding::ctrl('t'));

        let key = parse_key("C-t").unwrap();
        assert_eq!(key, KeyBinding::ctrl('t'));

        let key = parse_key("<C-t>").unwrap();
        assert_eq!(key, KeyBinding::ctrl('t'));

        let key = parse_key("Control+T").unwrap();
        assert_eq!(key, KeyBinding::ctrl('t'));
    }

    #[test]
    fn test_parse_alt() {
        let key = parse_key("alt+x").unwrap();
        assert!(key.modifiers.contains(KeyModifiers::ALT));

        let key = parse_key("M-x").unwrap();
        assert!(key.modifiers.contains(KeyModifiers::ALT));
    }

    #[test]
    fn test_parse_combined() {
        let key = parse_key("Control+Shift+Alt+T").unwrap();
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));
        assert!(key.modifiers.contains(KeyModifiers::SHIFT));
        assert!(key.modifiers.contains(KeyModifiers::ALT));
        assert_eq!(key.key, KeyCode::Char('t'));
    }

    #[test]
    fn test_parse_super() {
        let key = parse_key("win+e").unwrap();
        assert_eq!(key, KeyBinding::super_key('e'));
    }

    #[test]
    fn test_parse_special() {
        assert_eq!(parse_key("enter").unwrap().key, KeyCode::Enter);
        assert_eq!(parse_key("escape").unwrap().key, KeyCode::Esc);
        assert_eq!(parse_key("tab").unwrap().key, KeyCode::Tab);
        assert_eq!(parse_key("space").unwrap().key, KeyCode::Char(' '));
        assert_eq!(parse_key("C-space").unwrap(), KeyBinding::ctrl(' '));
    }

    #[test]
    fn test_parse_punctuation_names() {
        assert_eq!(parse_key("colon").unwrap().key, KeyCode::Char(':'));
        assert_eq!(parse_key("exclam").unwrap().key, KeyCode::Char('!'));
        assert_eq!(parse_key("C-minus").unwrap(), KeyBinding::ctrl('-'));
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!(parse_key("f1").unwrap().key, KeyCode::F(1));
        assert_eq!(parse_key("F12").unwrap().key, KeyCode::F(12));
        assert!(parse_key("f99").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_key(""), Err(ParseError::Empty));
        assert_eq!(parse_key("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_key("NotAKey"),
            Err(ParseError::UnknownKey("notakey".to_string()))
        );
        assert_eq!(
            parse_key("hyper+x"),
            Err(ParseError::UnknownModifier("hyper".to_string()))
        );
    }

    #[test]
    fn test_display_round_trip() {
        for notation in ["C-t", "C-M-x", "colon", "S-Return", "W-e", "F5"] {
            let key = parse_key(notation).unwrap();
            assert_eq!(parse_key(&format!("{:#}", key)).unwrap(), key);
        }
    }
}
