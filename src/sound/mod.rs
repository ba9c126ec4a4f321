pub mod bank;
pub mod output;
pub mod store;
pub mod synth;

pub use bank::SoundBank;
pub use output::{AudioSink, MemorySink, NullSink, PlaybackRequest};
pub use store::{SoundConfig, SoundStore};
pub use synth::{AudioBuffer, ToneGenerator};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SoundTheme {
    #[default]
    Mechanical,
    Soft,
    Typewriter,
    None,
}

impl SoundTheme {
    pub const ALL: [SoundTheme; 4] = [
        SoundTheme::Mechanical,
        SoundTheme::Soft,
        SoundTheme::Typewriter,
        SoundTheme::None,
    ];

    /// Themes that have synthesized buffers
    pub const AUDIBLE: [SoundTheme; 3] = [
        SoundTheme::Mechanical,
        SoundTheme::Soft,
        SoundTheme::Typewriter,
    ];

    pub fn is_audible(self) -> bool {
        self != SoundTheme::None
    }

    /// Next theme in settings order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "camelCase")]
pub enum SoundType {
    KeyPress,
    WordComplete,
    Error,
}

impl SoundType {
    pub const ALL: [SoundType; 3] = [SoundType::KeyPress, SoundType::WordComplete, SoundType::Error];

    /// Base frequency (Hz) and duration (seconds) before theme shaping
    pub fn base_tone(self) -> (f32, f32) {
        match self {
            SoundType::KeyPress => (400.0, 0.1),
            SoundType::WordComplete => (600.0, 0.2),
            SoundType::Error => (200.0, 0.3),
        }
    }
}

/// Cache key for a theme/type pair, e.g. `mechanical_keyPress`
pub fn buffer_key(theme: SoundTheme, sound_type: SoundType) -> String {
    format!("{theme}_{sound_type}")
}
