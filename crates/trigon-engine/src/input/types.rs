use std::fmt;

/// Physical key, independent of keyboard layout.
///
/// Codes with no variant arrive as `Unknown` carrying the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "unknown key {code:#x}"),
            Key::Digit0 => f.write_str("0"),
            Key::Digit1 => f.write_str("1"),
            Key::Digit2 => f.write_str("2"),
            Key::Digit3 => f.write_str("3"),
            Key::Digit4 => f.write_str("4"),
            Key::Digit5 => f.write_str("5"),
            Key::Digit6 => f.write_str("6"),
            Key::Digit7 => f.write_str("7"),
            Key::Digit8 => f.write_str("8"),
            Key::Digit9 => f.write_str("9"),
            // variant names already read as key labels
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Window-system input, already translated off winit types.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InputEvent {
    /// OS auto-repeat arrives as further `Pressed` events for a held key.
    Key { key: Key, state: KeyState },

    /// Losing focus releases every held key.
    Focused(bool),
}
