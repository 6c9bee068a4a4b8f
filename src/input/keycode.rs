/// macOS virtual keycodes
/// Reference: https://developer.apple.com/documentation/carbon/1430449-virtual_key_codes
///
/// Platform keystroke backends deliver raw codes; this table is how they are
/// resolved to characters and named keys before normalisation.
use super::key::NamedKey;

/// Macro to define keycodes with all their properties in one place.
/// Format: (Variant, raw_code, name, optional_char, optional_named)
macro_rules! define_keycodes {
    (
        $(
            $variant:ident = ($code:expr, $name:expr $(, char: $char:expr)? $(, named: $named:expr)?)
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum KeyCode {
            $($variant = $code),*
        }

        impl KeyCode {
            pub fn from_raw(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub fn as_raw(&self) -> u16 {
                *self as u16
            }

            /// Convert keycode to a snake_case string name (for diagnostics)
            pub fn to_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Convert keycode to its unshifted character, if it has one
            pub fn to_char(self) -> Option<char> {
                match self {
                    $($(Self::$variant => Some($char),)?)*
                    _ => None,
                }
            }

            /// Convert keycode to a named key, if it is one
            pub fn to_named(self) -> Option<NamedKey> {
                match self {
                    $($(Self::$variant => Some($named),)?)*
                    _ => None,
                }
            }
        }
    };
}

define_keycodes! {
    // Letters
    A = (0x00, "a", char: 'a'),
    S = (0x01, "s", char: 's'),
    D = (0x02, "d", char: 'd'),
    F = (0x03, "f", char: 'f'),
    H = (0x04, "h", char: 'h'),
    G = (0x05, "g", char: 'g'),
    Z = (0x06, "z", char: 'z'),
    X = (0x07, "x", char: 'x'),
    C = (0x08, "c", char: 'c'),
    V = (0x09, "v", char: 'v'),
    B = (0x0B, "b", char: 'b'),
    Q = (0x0C, "q", char: 'q'),
    W = (0x0D, "w", char: 'w'),
    E = (0x0E, "e", char: 'e'),
    R = (0x0F, "r", char: 'r'),
    Y = (0x10, "y", char: 'y'),
    T = (0x11, "t", char: 't'),
    O = (0x1F, "o", char: 'o'),
    U = (0x20, "u", char: 'u'),
    I = (0x22, "i", char: 'i'),
    P = (0x23, "p", char: 'p'),
    L = (0x25, "l", char: 'l'),
    J = (0x26, "j", char: 'j'),
    K = (0x28, "k", char: 'k'),
    N = (0x2D, "n", char: 'n'),
    M = (0x2E, "m", char: 'm'),

    // Numbers
    Num1 = (0x12, "1", char: '1'),
    Num2 = (0x13, "2", char: '2'),
    Num3 = (0x14, "3", char: '3'),
    Num4 = (0x15, "4", char: '4'),
    Num5 = (0x17, "5", char: '5'),
    Num6 = (0x16, "6", char: '6'),
    Num7 = (0x1A, "7", char: '7'),
    Num8 = (0x1C, "8", char: '8'),
    Num9 = (0x19, "9", char: '9'),
    Num0 = (0x1D, "0", char: '0'),

    // Punctuation
    Equal = (0x18, "equal", char: '='),
    Minus = (0x1B, "minus", char: '-'),
    RightBracket = (0x1E, "right_bracket", char: ']'),
    LeftBracket = (0x21, "left_bracket", char: '['),
    Quote = (0x27, "quote", char: '\''),
    Semicolon = (0x29, "semicolon", char: ';'),
    Backslash = (0x2A, "backslash", char: '\\'),
    Comma = (0x2B, "comma", char: ','),
    Slash = (0x2C, "slash", char: '/'),
    Period = (0x2F, "period", char: '.'),
    Grave = (0x32, "grave", char: '`'),

    // Special keys
    Return = (0x24, "return", named: NamedKey::Return),
    Tab = (0x30, "tab", named: NamedKey::Tab),
    Space = (0x31, "space", named: NamedKey::Space),
    Backspace = (0x33, "backspace", named: NamedKey::Backspace),
    Escape = (0x35, "escape", named: NamedKey::Escape),
    Enter = (0x4C, "enter", named: NamedKey::Enter),
    ForwardDelete = (0x75, "delete", named: NamedKey::Delete),
    Home = (0x73, "home", named: NamedKey::Home),
    End = (0x77, "end", named: NamedKey::End),
    PageUp = (0x74, "page_up", named: NamedKey::PageUp),
    PageDown = (0x79, "page_down", named: NamedKey::PageDown),
    Left = (0x7B, "left", named: NamedKey::Left),
    Right = (0x7C, "right", named: NamedKey::Right),
    Down = (0x7D, "down", named: NamedKey::Down),
    Up = (0x7E, "up", named: NamedKey::Up),

    // Function keys
    F1 = (0x7A, "f1", named: NamedKey::F(1)),
    F2 = (0x78, "f2", named: NamedKey::F(2)),
    F3 = (0x63, "f3", named: NamedKey::F(3)),
    F4 = (0x76, "f4", named: NamedKey::F(4)),
    F5 = (0x60, "f5", named: NamedKey::F(5)),
    F6 = (0x61, "f6", named: NamedKey::F(6)),
    F7 = (0x62, "f7", named: NamedKey::F(7)),
    F8 = (0x64, "f8", named: NamedKey::F(8)),
    F9 = (0x65, "f9", named: NamedKey::F(9)),
    F10 = (0x6D, "f10", named: NamedKey::F(10)),
    F11 = (0x67, "f11", named: NamedKey::F(11)),
    F12 = (0x6F, "f12", named: NamedKey::F(12)),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_raw() {
        assert_eq!(KeyCode::from_raw(0x05), Some(KeyCode::G));
        assert_eq!(KeyCode::G.as_raw(), 0x05);
        assert_eq!(KeyCode::from_raw(0xFF), None);
    }

    #[test]
    fn test_char_and_named_are_disjoint() {
        assert_eq!(KeyCode::G.to_char(), Some('g'));
        assert_eq!(KeyCode::G.to_named(), None);
        assert_eq!(KeyCode::Escape.to_char(), None);
        assert_eq!(KeyCode::Escape.to_named(), Some(NamedKey::Escape));
    }
}
