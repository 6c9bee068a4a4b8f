//! Key normalisation
//!
//! Canonicalises platform key events into stable tokens: a single printable
//! ASCII character, a named key from a closed set, or a modifier combo of
//! the form `Cmd+Ctrl+Alt+Shift+Key`. The same `normalize` is used by the
//! hotkey router and every mode engine, so a key can never mean two things.
//!
//! Shift on alphabetic keys folds into letter case (`Shift+g` becomes `G`
//! with the shift flag cleared), which keeps `gg` and `GG` distinguishable
//! for scroll sequences. All other matching is case-insensitive on letters.

use std::fmt;

use crate::error::{Error, Result};

use super::keycode::KeyCode;
use super::KeyEvent;

/// Modifier set in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub cmd: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.cmd || self.ctrl || self.alt || self.shift
    }

    fn without_shift(self) -> Self {
        Self {
            shift: false,
            ..self
        }
    }
}

/// The closed set of non-character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Space,
    Return,
    Enter,
    Escape,
    Tab,
    Delete,
    Backspace,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function keys F1 through F12.
    F(u8),
}

impl NamedKey {
    /// Parse a key name, case-insensitively. Accepts both the canonical
    /// spelling (`PageUp`) and the snake_case one (`page_up`).
    pub fn parse(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let key = match folded.as_str() {
            "space" => Self::Space,
            "return" => Self::Return,
            "enter" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "tab" => Self::Tab,
            "delete" => Self::Delete,
            "backspace" => Self::Backspace,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => {
                let n: u8 = folded.strip_prefix('f')?.parse().ok()?;
                if (1..=12).contains(&n) {
                    Self::F(n)
                } else {
                    return None;
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space => write!(f, "Space"),
            Self::Return => write!(f, "Return"),
            Self::Enter => write!(f, "Enter"),
            Self::Escape => write!(f, "Escape"),
            Self::Tab => write!(f, "Tab"),
            Self::Delete => write!(f, "Delete"),
            Self::Backspace => write!(f, "Backspace"),
            Self::Home => write!(f, "Home"),
            Self::End => write!(f, "End"),
            Self::PageUp => write!(f, "PageUp"),
            Self::PageDown => write!(f, "PageDown"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::F(n) => write!(f, "F{n}"),
        }
    }
}

/// A canonical key: printable character or named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Named(NamedKey),
}

/// A normalised key token: the key plus its (canonicalised) modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyToken {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyToken {
    pub fn char(c: char) -> Self {
        Self {
            key: Key::Char(c),
            mods: Modifiers::none(),
        }
    }

    pub fn named(key: NamedKey) -> Self {
        Self {
            key: Key::Named(key),
            mods: Modifiers::none(),
        }
    }

    /// Parse a token string from configuration, e.g. `g`, `Escape`,
    /// `Cmd+Shift+Space`. Shift on a letter folds into uppercase.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::Config(format!("malformed key token {s:?}")));
        }
        let (key_part, mod_parts) = parts
            .split_last()
            .ok_or_else(|| Error::Config(format!("empty key token {s:?}")))?;

        let mut mods = Modifiers::none();
        for part in mod_parts {
            match part.to_ascii_lowercase().as_str() {
                "cmd" | "command" => mods.cmd = true,
                "ctrl" | "control" => mods.ctrl = true,
                "alt" | "option" => mods.alt = true,
                "shift" => mods.shift = true,
                other => {
                    return Err(Error::Config(format!(
                        "unknown modifier {other:?} in key token {s:?}"
                    )))
                }
            }
        }

        let mut chars = key_part.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_graphic() => {
                if c.is_ascii_alphabetic() && mods.shift {
                    mods = mods.without_shift();
                    Key::Char(c.to_ascii_uppercase())
                } else {
                    Key::Char(c)
                }
            }
            _ => Key::Named(NamedKey::parse(key_part).ok_or_else(|| {
                Error::Config(format!("unknown key name {key_part:?} in token {s:?}"))
            })?),
        };

        Ok(Self { key, mods })
    }

    /// The bare printable character, when the token is an unmodified char.
    pub fn printable_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.mods.any() => Some(c),
            _ => None,
        }
    }

    /// Case-insensitive match on letters; exact on everything else.
    pub fn matches(&self, other: &KeyToken) -> bool {
        if self.mods != other.mods {
            return false;
        }
        match (self.key, other.key) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }

    pub fn is_named(&self, key: NamedKey) -> bool {
        self.key == Key::Named(key) && !self.mods.any()
    }

    /// Backspace and forward Delete both pop one character in the engines.
    pub fn is_erase(&self) -> bool {
        self.is_named(NamedKey::Backspace) || self.is_named(NamedKey::Delete)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.cmd {
            write!(f, "Cmd+")?;
        }
        if self.mods.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.mods.alt {
            write!(f, "Alt+")?;
        }
        if self.mods.shift {
            write!(f, "Shift+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::Named(n) => write!(f, "{n}"),
        }
    }
}

/// Normalise a platform key event into a canonical token.
///
/// Key-up events produce no token; the subscription layer decides whether
/// to swallow them based on what the matching key-down did.
pub fn normalize(event: &KeyEvent) -> Option<KeyToken> {
    if !event.is_key_down {
        return None;
    }
    let mods = event.modifiers;

    if let Some(code) = KeyCode::from_raw(event.code) {
        if let Some(named) = code.to_named() {
            return Some(KeyToken {
                key: Key::Named(named),
                mods,
            });
        }
        if let Some(base) = code.to_char() {
            return Some(char_token(base, &event.characters, mods));
        }
    }

    // Unmapped keycode: trust the characters the platform delivered.
    let c = event.characters.chars().next()?;
    (c.is_ascii_graphic()).then(|| char_token(c, &event.characters, mods))
}

fn char_token(base: char, typed: &str, mods: Modifiers) -> KeyToken {
    if base.is_ascii_alphabetic() {
        let c = if mods.shift {
            base.to_ascii_uppercase()
        } else {
            base.to_ascii_lowercase()
        };
        return KeyToken {
            key: Key::Char(c),
            mods: mods.without_shift(),
        };
    }
    // Non-letters: prefer the shifted character as typed ('1' -> '!').
    let c = typed
        .chars()
        .next()
        .filter(|c| c.is_ascii_graphic())
        .unwrap_or(base);
    let mods = if c != base { mods.without_shift() } else { mods };
    KeyToken {
        key: Key::Char(c),
        mods,
    }
}
