use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of comparing a typed key with the expected letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    Match,
    Mismatch,
}

/// Extract the printable character of a key press.
///
/// Releases, repeats of non-char keys, and chords with Ctrl or Alt are not
/// typing input and yield `None`.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

/// Case-insensitive comparison of the pressed key against the expected letter.
pub fn classify(pressed: char, expected: char) -> KeyMatch {
    if pressed.to_lowercase().eq(expected.to_lowercase()) {
        KeyMatch::Match
    } else {
        KeyMatch::Mismatch
    }
}
