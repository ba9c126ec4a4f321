/// QWERTY letter rows as drawn by the on-screen keyboard.
pub const ROWS: [&[char]; 3] = [
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l'],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm'],
];

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Display class of a key, used only for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTone {
    Target,
    Vowel,
    Consonant,
}

pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter.to_ascii_lowercase())
}

/// Classify `letter` for display; the expected letter always wins.
pub fn key_tone(letter: char, target: Option<char>) -> KeyTone {
    let letter = letter.to_ascii_lowercase();
    match target {
        Some(t) if t.to_ascii_lowercase() == letter => KeyTone::Target,
        _ if is_vowel(letter) => KeyTone::Vowel,
        _ => KeyTone::Consonant,
    }
}
