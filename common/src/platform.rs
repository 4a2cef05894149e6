//! Mapping between `rdev` keys/buttons and the stored identifiers.
//!
//! Printable keys follow an unshifted US layout. Shifted characters from
//! older recordings resolve to the key that produces them; the shift press is
//! recorded as its own event.

use rdev::{Button, Key};

use crate::keys::{ButtonId, KeyId, NamedKey};

const NAMED_KEYS: &[(NamedKey, Key)] = &[
    (NamedKey::Alt, Key::Alt),
    (NamedKey::AltGr, Key::AltGr),
    (NamedKey::Backspace, Key::Backspace),
    (NamedKey::CapsLock, Key::CapsLock),
    (NamedKey::Cmd, Key::MetaLeft),
    (NamedKey::CmdRight, Key::MetaRight),
    (NamedKey::CtrlLeft, Key::ControlLeft),
    (NamedKey::CtrlRight, Key::ControlRight),
    (NamedKey::Delete, Key::Delete),
    (NamedKey::Down, Key::DownArrow),
    (NamedKey::End, Key::End),
    (NamedKey::Enter, Key::Return),
    (NamedKey::Esc, Key::Escape),
    (NamedKey::F1, Key::F1),
    (NamedKey::F2, Key::F2),
    (NamedKey::F3, Key::F3),
    (NamedKey::F4, Key::F4),
    (NamedKey::F5, Key::F5),
    (NamedKey::F6, Key::F6),
    (NamedKey::F7, Key::F7),
    (NamedKey::F8, Key::F8),
    (NamedKey::F9, Key::F9),
    (NamedKey::F10, Key::F10),
    (NamedKey::F11, Key::F11),
    (NamedKey::F12, Key::F12),
    (NamedKey::Function, Key::Function),
    (NamedKey::Home, Key::Home),
    (NamedKey::Insert, Key::Insert),
    (NamedKey::IntlBackslash, Key::IntlBackslash),
    (NamedKey::Left, Key::LeftArrow),
    (NamedKey::NumLock, Key::NumLock),
    (NamedKey::PageDown, Key::PageDown),
    (NamedKey::PageUp, Key::PageUp),
    (NamedKey::Pause, Key::Pause),
    (NamedKey::PrintScreen, Key::PrintScreen),
    (NamedKey::Right, Key::RightArrow),
    (NamedKey::ScrollLock, Key::ScrollLock),
    (NamedKey::Shift, Key::ShiftLeft),
    (NamedKey::ShiftRight, Key::ShiftRight),
    (NamedKey::Space, Key::Space),
    (NamedKey::Tab, Key::Tab),
    (NamedKey::Up, Key::UpArrow),
];

const CHAR_KEYS: &[(char, Key)] = &[
    ('a', Key::KeyA),
    ('b', Key::KeyB),
    ('c', Key::KeyC),
    ('d', Key::KeyD),
    ('e', Key::KeyE),
    ('f', Key::KeyF),
    ('g', Key::KeyG),
    ('h', Key::KeyH),
    ('i', Key::KeyI),
    ('j', Key::KeyJ),
    ('k', Key::KeyK),
    ('l', Key::KeyL),
    ('m', Key::KeyM),
    ('n', Key::KeyN),
    ('o', Key::KeyO),
    ('p', Key::KeyP),
    ('q', Key::KeyQ),
    ('r', Key::KeyR),
    ('s', Key::KeyS),
    ('t', Key::KeyT),
    ('u', Key::KeyU),
    ('v', Key::KeyV),
    ('w', Key::KeyW),
    ('x', Key::KeyX),
    ('y', Key::KeyY),
    ('z', Key::KeyZ),
    ('0', Key::Num0),
    ('1', Key::Num1),
    ('2', Key::Num2),
    ('3', Key::Num3),
    ('4', Key::Num4),
    ('5', Key::Num5),
    ('6', Key::Num6),
    ('7', Key::Num7),
    ('8', Key::Num8),
    ('9', Key::Num9),
    ('`', Key::BackQuote),
    ('-', Key::Minus),
    ('=', Key::Equal),
    ('[', Key::LeftBracket),
    (']', Key::RightBracket),
    (';', Key::SemiColon),
    ('\'', Key::Quote),
    ('\\', Key::BackSlash),
    (',', Key::Comma),
    ('.', Key::Dot),
    ('/', Key::Slash),
];

// Keypad keys keep their own names so they replay on the keypad.
const KEYPAD_KEYS: &[(NamedKey, Key)] = &[
    (NamedKey::Kp0, Key::Kp0),
    (NamedKey::Kp1, Key::Kp1),
    (NamedKey::Kp2, Key::Kp2),
    (NamedKey::Kp3, Key::Kp3),
    (NamedKey::Kp4, Key::Kp4),
    (NamedKey::Kp5, Key::Kp5),
    (NamedKey::Kp6, Key::Kp6),
    (NamedKey::Kp7, Key::Kp7),
    (NamedKey::Kp8, Key::Kp8),
    (NamedKey::Kp9, Key::Kp9),
    (NamedKey::KpDelete, Key::KpDelete),
    (NamedKey::KpDivide, Key::KpDivide),
    (NamedKey::KpEnter, Key::KpReturn),
    (NamedKey::KpMinus, Key::KpMinus),
    (NamedKey::KpMultiply, Key::KpMultiply),
    (NamedKey::KpPlus, Key::KpPlus),
];

fn named_keys() -> impl Iterator<Item = &'static (NamedKey, Key)> {
    NAMED_KEYS.iter().chain(KEYPAD_KEYS.iter())
}

// Playback only: shifted characters and the key that types them.
const SHIFTED_CHARS: &[(char, Key)] = &[
    ('~', Key::BackQuote),
    ('!', Key::Num1),
    ('@', Key::Num2),
    ('#', Key::Num3),
    ('$', Key::Num4),
    ('%', Key::Num5),
    ('^', Key::Num6),
    ('&', Key::Num7),
    ('*', Key::Num8),
    ('(', Key::Num9),
    (')', Key::Num0),
    ('_', Key::Minus),
    ('+', Key::Equal),
    ('{', Key::LeftBracket),
    ('}', Key::RightBracket),
    (':', Key::SemiColon),
    ('"', Key::Quote),
    ('|', Key::BackSlash),
    ('<', Key::Comma),
    ('>', Key::Dot),
    ('?', Key::Slash),
];

/// Identifier stored for a captured key.
pub fn key_id(key: Key) -> KeyId {
    match key {
        Key::Unknown(code) => KeyId::Code(code),
        _ => {
            if let Some((named, _)) = named_keys().find(|(_, k)| *k == key) {
                KeyId::Named(*named)
            } else if let Some((c, _)) = CHAR_KEYS.iter().find(|(_, k)| *k == key) {
                KeyId::Char(*c)
            } else {
                KeyId::Unrecognized(format!("{:?}", key))
            }
        }
    }
}

/// Platform key to press for a stored identifier, or `None` when it cannot
/// be replayed.
pub fn platform_key(key: &KeyId) -> Option<Key> {
    match key {
        KeyId::Named(named) => named_keys().find(|(n, _)| n == named).map(|(_, k)| *k),
        KeyId::Char(c) => {
            let lower = c.to_ascii_lowercase();
            CHAR_KEYS
                .iter()
                .find(|(ch, _)| *ch == lower)
                .or_else(|| SHIFTED_CHARS.iter().find(|(ch, _)| ch == c))
                .map(|(_, k)| *k)
        }
        KeyId::Code(code) => Some(Key::Unknown(*code)),
        KeyId::Unrecognized(_) => None,
    }
}

pub fn button_id(button: Button) -> ButtonId {
    match button {
        Button::Left => ButtonId::Left,
        Button::Right => ButtonId::Right,
        Button::Middle => ButtonId::Middle,
        Button::Unknown(n) => ButtonId::Other(n),
    }
}

pub fn platform_button(button: &ButtonId) -> Option<Button> {
    match button {
        ButtonId::Left => Some(Button::Left),
        ButtonId::Right => Some(Button::Right),
        ButtonId::Middle => Some(Button::Middle),
        ButtonId::Other(n) => Some(Button::Unknown(*n)),
        ButtonId::Unrecognized(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_keys_are_characters() {
        assert_eq!(key_id(Key::KeyA), KeyId::Char('a'));
        assert_eq!(platform_key(&KeyId::Char('a')), Some(Key::KeyA));
        assert_eq!(platform_key(&KeyId::Char('A')), Some(Key::KeyA));
    }

    #[test]
    fn test_modifier_keys_are_named() {
        assert_eq!(key_id(Key::ShiftLeft), KeyId::Named(NamedKey::Shift));
        assert_eq!(
            platform_key(&KeyId::Named(NamedKey::Shift)),
            Some(Key::ShiftLeft)
        );
    }

    #[test]
    fn test_every_captured_key_resolves_back() {
        let named = named_keys().map(|(_, key)| *key);
        let printable = CHAR_KEYS.iter().map(|(_, key)| *key);
        for key in named.chain(printable) {
            assert_eq!(platform_key(&key_id(key)), Some(key), "{:?}", key);
        }
    }

    #[test]
    fn test_keypad_and_unknown_keys() {
        assert_eq!(key_id(Key::Kp7), KeyId::Named(NamedKey::Kp7));
        assert_eq!(key_id(Key::KpReturn), KeyId::Named(NamedKey::KpEnter));
        assert_eq!(key_id(Key::Unknown(65027)), KeyId::Code(65027));
        assert_eq!(platform_key(&KeyId::Code(65027)), Some(Key::Unknown(65027)));
    }

    #[test]
    fn test_keypad_operators_replay_on_the_keypad() {
        let multiply = key_id(Key::KpMultiply);
        assert_eq!(multiply.to_string(), "Key.kp_multiply");
        assert_eq!(platform_key(&multiply), Some(Key::KpMultiply));

        let plus = KeyId::parse(&key_id(Key::KpPlus).to_string());
        assert_eq!(platform_key(&plus), Some(Key::KpPlus));

        // The main row keys are untouched.
        assert_eq!(platform_key(&KeyId::Char('*')), Some(Key::Num8));
        assert_eq!(platform_key(&KeyId::Char('+')), Some(Key::Equal));
    }

    #[test]
    fn test_shifted_characters_resolve() {
        assert_eq!(platform_key(&KeyId::Char('!')), Some(Key::Num1));
        assert_eq!(platform_key(&KeyId::Char('"')), Some(Key::Quote));
    }

    #[test]
    fn test_unresolvable_identifiers() {
        assert_eq!(platform_key(&KeyId::Char('é')), None);
        assert_eq!(platform_key(&KeyId::Unrecognized("Key.hyper".into())), None);
        assert_eq!(platform_button(&ButtonId::Unrecognized("Button.x1".into())), None);
    }

    #[test]
    fn test_buttons_round_trip() {
        for button in [Button::Left, Button::Right, Button::Middle, Button::Unknown(8)] {
            assert_eq!(platform_button(&button_id(button)), Some(button));
        }
    }
}
