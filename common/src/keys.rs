//! Stable string identifiers for keyboard keys and mouse buttons.
//!
//! These are the forms written into recording files. They are independent of
//! any platform's debug representation so a recording made on one machine
//! parses the same way everywhere.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

const KEY_PREFIX: &str = "Key.";
const BUTTON_PREFIX: &str = "Button.";

/// Non-printable keys that are recorded by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Alt,
    AltGr,
    Backspace,
    CapsLock,
    Cmd,
    CmdRight,
    CtrlLeft,
    CtrlRight,
    Delete,
    Down,
    End,
    Enter,
    Esc,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Function,
    Home,
    Insert,
    IntlBackslash,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpDelete,
    KpDivide,
    KpEnter,
    KpMinus,
    KpMultiply,
    KpPlus,
    Left,
    NumLock,
    PageDown,
    PageUp,
    Pause,
    PrintScreen,
    Right,
    ScrollLock,
    Shift,
    ShiftRight,
    Space,
    Tab,
    Up,
}

// Canonical names, written on save.
const NAMES: &[(NamedKey, &str)] = &[
    (NamedKey::Alt, "alt"),
    (NamedKey::AltGr, "alt_gr"),
    (NamedKey::Backspace, "backspace"),
    (NamedKey::CapsLock, "caps_lock"),
    (NamedKey::Cmd, "cmd"),
    (NamedKey::CmdRight, "cmd_r"),
    (NamedKey::CtrlLeft, "ctrl_l"),
    (NamedKey::CtrlRight, "ctrl_r"),
    (NamedKey::Delete, "delete"),
    (NamedKey::Down, "down"),
    (NamedKey::End, "end"),
    (NamedKey::Enter, "enter"),
    (NamedKey::Esc, "esc"),
    (NamedKey::F1, "f1"),
    (NamedKey::F2, "f2"),
    (NamedKey::F3, "f3"),
    (NamedKey::F4, "f4"),
    (NamedKey::F5, "f5"),
    (NamedKey::F6, "f6"),
    (NamedKey::F7, "f7"),
    (NamedKey::F8, "f8"),
    (NamedKey::F9, "f9"),
    (NamedKey::F10, "f10"),
    (NamedKey::F11, "f11"),
    (NamedKey::F12, "f12"),
    (NamedKey::Function, "function"),
    (NamedKey::Home, "home"),
    (NamedKey::Insert, "insert"),
    (NamedKey::IntlBackslash, "intl_backslash"),
    (NamedKey::Kp0, "kp_0"),
    (NamedKey::Kp1, "kp_1"),
    (NamedKey::Kp2, "kp_2"),
    (NamedKey::Kp3, "kp_3"),
    (NamedKey::Kp4, "kp_4"),
    (NamedKey::Kp5, "kp_5"),
    (NamedKey::Kp6, "kp_6"),
    (NamedKey::Kp7, "kp_7"),
    (NamedKey::Kp8, "kp_8"),
    (NamedKey::Kp9, "kp_9"),
    (NamedKey::KpDelete, "kp_delete"),
    (NamedKey::KpDivide, "kp_divide"),
    (NamedKey::KpEnter, "kp_enter"),
    (NamedKey::KpMinus, "kp_minus"),
    (NamedKey::KpMultiply, "kp_multiply"),
    (NamedKey::KpPlus, "kp_plus"),
    (NamedKey::Left, "left"),
    (NamedKey::NumLock, "num_lock"),
    (NamedKey::PageDown, "page_down"),
    (NamedKey::PageUp, "page_up"),
    (NamedKey::Pause, "pause"),
    (NamedKey::PrintScreen, "print_screen"),
    (NamedKey::Right, "right"),
    (NamedKey::ScrollLock, "scroll_lock"),
    (NamedKey::Shift, "shift"),
    (NamedKey::ShiftRight, "shift_r"),
    (NamedKey::Space, "space"),
    (NamedKey::Tab, "tab"),
    (NamedKey::Up, "up"),
];

// Accepted on load, never written.
const ALIASES: &[(&str, NamedKey)] = &[
    ("alt_l", NamedKey::Alt),
    ("alt_r", NamedKey::AltGr),
    ("cmd_l", NamedKey::Cmd),
    ("ctrl", NamedKey::CtrlLeft),
    ("escape", NamedKey::Esc),
    ("return", NamedKey::Enter),
    ("shift_l", NamedKey::Shift),
];

impl NamedKey {
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(key, _)| *key == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(key, _)| *key)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, key)| *key)
            })
    }
}

/// A keyboard key as stored in a recording.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyId {
    /// A non-printable key, written as `Key.<name>`.
    Named(NamedKey),
    /// A printable character, written quoted (`'a'`).
    Char(char),
    /// A platform key code without a symbolic name, written as `<N>`.
    Code(u32),
    /// A string that names no known key. Kept verbatim so it saves back unchanged.
    Unrecognized(String),
}

impl KeyId {
    pub fn parse(s: &str) -> KeyId {
        if let Some(name) = s.strip_prefix(KEY_PREFIX) {
            return match NamedKey::from_name(name) {
                Some(key) => KeyId::Named(key),
                None => KeyId::Unrecognized(s.to_string()),
            };
        }

        if let Some(code) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
            if let Ok(code) = code.parse::<u32>() {
                return KeyId::Code(code);
            }
        }

        let text = unquote(s);
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyId::Char(c),
            _ => KeyId::Unrecognized(s.to_string()),
        }
    }
}

// Strips one pair of matching wrapping quotes, if present. Single-quoted
// forms may escape a backslash or a quote (`'\\'`, `'\''`).
fn unquote(s: &str) -> Cow<'_, str> {
    if let Some(inner) = s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        return unescape(inner);
    }
    if let Some(inner) = s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        return Cow::Borrowed(inner);
    }
    Cow::Borrowed(s)
}

fn unescape(inner: &str) -> Cow<'_, str> {
    if !inner.contains('\\') || inner == "\\" {
        return Cow::Borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\\' | '\'')) => out.push(next),
                Some(other) => {
                    out.push(c);
                    out.push(other);
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Named(key) => write!(f, "{}{}", KEY_PREFIX, key.name()),
            KeyId::Char('\'') => write!(f, "\"'\""),
            KeyId::Char(c) => write!(f, "'{}'", c),
            KeyId::Code(code) => write!(f, "<{}>", code),
            KeyId::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for KeyId {
    fn from(s: String) -> Self {
        KeyId::parse(&s)
    }
}

impl From<KeyId> for String {
    fn from(key: KeyId) -> Self {
        key.to_string()
    }
}

/// A mouse button as stored in a recording.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ButtonId {
    Left,
    Right,
    Middle,
    /// Extra buttons reported by number, written as `Button.button<N>`.
    Other(u8),
    Unrecognized(String),
}

impl ButtonId {
    pub fn parse(s: &str) -> ButtonId {
        let name = s.strip_prefix(BUTTON_PREFIX).unwrap_or(s);
        match name {
            "left" => ButtonId::Left,
            "right" => ButtonId::Right,
            "middle" => ButtonId::Middle,
            _ => match name.strip_prefix("button").map(str::parse::<u8>) {
                Some(Ok(n)) => ButtonId::Other(n),
                _ => ButtonId::Unrecognized(s.to_string()),
            },
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonId::Left => write!(f, "{}left", BUTTON_PREFIX),
            ButtonId::Right => write!(f, "{}right", BUTTON_PREFIX),
            ButtonId::Middle => write!(f, "{}middle", BUTTON_PREFIX),
            ButtonId::Other(n) => write!(f, "{}button{}", BUTTON_PREFIX, n),
            ButtonId::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for ButtonId {
    fn from(s: String) -> Self {
        ButtonId::parse(&s)
    }
}

impl From<ButtonId> for String {
    fn from(button: ButtonId) -> Self {
        button.to_string()
    }
}
