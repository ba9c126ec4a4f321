use std::time::{Duration, Instant};

use thiserror::Error;

use crate::key_listener::{classify, KeyMatch};
use crate::sound::SoundType;

pub const DEFAULT_WORDS: [&str; 3] = ["hello", "world", "type"];

/// Delay between completing a word and moving on to the next one
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 600;
pub const MIN_ADVANCE_DELAY_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("word is empty after trimming")]
    EmptyWord,
    #[error("the last remaining word cannot be removed")]
    LastWord,
    #[error("index {index} is out of bounds for {len} words")]
    OutOfBounds { index: usize, len: usize },
}

/// Position of the next expected letter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub word: usize,
    pub letter: usize,
}

impl Cursor {
    pub fn new(word: usize, letter: usize) -> Self {
        Self { word, letter }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A scheduled move to the next word, armed when a word is completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    /// Word that was completed; the advance is stale once it is no longer current
    pub word: usize,
    pub due: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Key { key: char, at: Instant },
    Tick(Instant),
    AddWord,
    RemoveWord(usize),
    MoveWord { from: usize, direction: Direction },
}

/// What a key press did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Advanced,
    WordComplete,
    Mismatch,
    /// Input arrived while the completed word is waiting to advance
    Ignored,
}

/// Side effects requested by a single transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub cues: Vec<SoundType>,
    pub rejected: Option<EditError>,
}

impl Transition {
    fn with_cues(cues: &[SoundType]) -> Self {
        Self {
            cues: cues.to_vec(),
            rejected: None,
        }
    }

    fn from_edit(result: Result<(), EditError>) -> Self {
        Self {
            cues: Vec::new(),
            rejected: result.err(),
        }
    }
}

/// Normalise user text into a word; `None` when nothing is left.
pub fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// represents one learning session over a cyclic list of words
#[derive(Debug, Clone)]
pub struct Session {
    words: Vec<String>,
    cursor: Cursor,
    draft: String,
    pending: Option<PendingAdvance>,
    advance_delay: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), Duration::from_millis(DEFAULT_ADVANCE_DELAY_MS))
    }
}

impl Session {
    /// Seeds are normalised like added words; if none survive the default list is used.
    pub fn new<S: AsRef<str>>(seed: impl IntoIterator<Item = S>, advance_delay: Duration) -> Self {
        let mut words: Vec<String> = seed
            .into_iter()
            .filter_map(|w| normalize_word(w.as_ref()))
            .collect();
        if words.is_empty() {
            words = DEFAULT_WORDS.iter().map(|w| w.to_string()).collect();
        }

        Self {
            words,
            cursor: Cursor::default(),
            draft: String::new(),
            pending: None,
            advance_delay: advance_delay.max(Duration::from_millis(MIN_ADVANCE_DELAY_MS)),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_word(&self) -> &str {
        &self.words[self.cursor.word]
    }

    pub fn expected_letter(&self) -> Option<char> {
        self.current_word().chars().nth(self.cursor.letter)
    }

    /// Percent of the current word typed so far
    pub fn progress(&self) -> f64 {
        let len = self.current_word().chars().count();
        if len == 0 {
            return 0.0;
        }
        (self.cursor.letter as f64 / len as f64) * 100.0
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    pub fn is_advancing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn push_draft(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_draft(&mut self) {
        self.draft.pop();
    }

    /// Apply one event and report the cues it requested.
    pub fn handle(&mut self, event: SessionEvent) -> Transition {
        match event {
            SessionEvent::Key { key, at } => match self.press(key, at) {
                KeyOutcome::Advanced => Transition::with_cues(&[SoundType::KeyPress]),
                KeyOutcome::WordComplete => {
                    Transition::with_cues(&[SoundType::KeyPress, SoundType::WordComplete])
                }
                KeyOutcome::Mismatch => Transition::with_cues(&[SoundType::Error]),
                KeyOutcome::Ignored => Transition::default(),
            },
            SessionEvent::Tick(now) => {
                self.on_tick(now);
                Transition::default()
            }
            SessionEvent::AddWord => Transition::from_edit(self.add_word()),
            SessionEvent::RemoveWord(index) => Transition::from_edit(self.remove_word(index)),
            SessionEvent::MoveWord { from, direction } => {
                Transition::from_edit(self.move_word(from, direction).map(|_| ()))
            }
        }
    }

    pub fn press(&mut self, key: char, at: Instant) -> KeyOutcome {
        if self.pending.is_some() {
            return KeyOutcome::Ignored;
        }
        let Some(expected) = self.expected_letter() else {
            return KeyOutcome::Ignored;
        };

        match classify(key, expected) {
            KeyMatch::Mismatch => KeyOutcome::Mismatch,
            KeyMatch::Match => {
                let len = self.current_word().chars().count();
                if self.cursor.letter + 1 < len {
                    self.cursor.letter += 1;
                    KeyOutcome::Advanced
                } else {
                    self.pending = Some(PendingAdvance {
                        word: self.cursor.word,
                        due: at + self.advance_delay,
                    });
                    KeyOutcome::WordComplete
                }
            }
        }
    }

    /// Fire the pending advance once it is due. Returns true when the cursor moved.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now < pending.due {
            return false;
        }
        self.pending = None;

        if pending.word != self.cursor.word {
            log::debug!(
                "dropping stale advance for word {} (current {})",
                pending.word,
                self.cursor.word
            );
            return false;
        }

        self.cursor = Cursor::new((self.cursor.word + 1) % self.words.len(), 0);
        true
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Append the draft as a new word and clear the draft.
    pub fn add_word(&mut self) -> Result<(), EditError> {
        let word = normalize_word(&self.draft).ok_or(EditError::EmptyWord)?;
        self.words.push(word);
        self.draft.clear();
        Ok(())
    }

    pub fn remove_word(&mut self, index: usize) -> Result<(), EditError> {
        let len = self.words.len();
        if index >= len {
            return Err(EditError::OutOfBounds { index, len });
        }
        if len <= 1 {
            return Err(EditError::LastWord);
        }

        self.words.remove(index);
        if index < self.cursor.word {
            self.cursor.word -= 1;
        } else if index == self.cursor.word {
            self.cursor.word = self.cursor.word.saturating_sub(1);
        }
        self.cursor.word = self.cursor.word.min(self.words.len() - 1);
        self.cursor.letter = 0;
        self.cancel_pending();
        Ok(())
    }

    /// Move a word one slot up or down. Returns the word's new index.
    pub fn move_word(&mut self, from: usize, direction: Direction) -> Result<usize, EditError> {
        let len = self.words.len();
        if from >= len {
            return Err(EditError::OutOfBounds { index: from, len });
        }
        let to = match direction {
            Direction::Up => from.checked_sub(1),
            Direction::Down => Some(from + 1).filter(|&t| t < len),
        }
        .ok_or(EditError::OutOfBounds { index: from, len })?;

        self.words.swap(from, to);
        if from == self.cursor.word {
            self.cursor.word = to;
        } else if to == self.cursor.word {
            self.cursor.word = from;
        }
        // the completed word may have changed index; its advance follows it
        if let Some(pending) = &mut self.pending {
            pending.word = self.cursor.word;
        }
        Ok(to)
    }
}
