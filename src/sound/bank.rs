use std::collections::HashMap;

use super::synth::{AudioBuffer, ToneGenerator};
use super::{buffer_key, SoundTheme, SoundType};

/// Cache of pre-rendered buffers keyed by `"{theme}_{type}"`
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    generator: ToneGenerator,
    buffers: HashMap<String, AudioBuffer>,
}

impl SoundBank {
    /// An empty bank; call [`SoundBank::generate_sound_assets`] before use.
    pub fn new(generator: ToneGenerator) -> Self {
        Self {
            generator,
            buffers: HashMap::new(),
        }
    }

    /// A bank with every audible theme/type pair already rendered
    pub fn generated(generator: ToneGenerator) -> Self {
        let mut bank = Self::new(generator);
        bank.generate_sound_assets();
        bank
    }

    /// Rebuild the whole cache. Safe to call repeatedly.
    pub fn generate_sound_assets(&mut self) {
        self.buffers.clear();
        for theme in SoundTheme::AUDIBLE {
            for sound_type in SoundType::ALL {
                let buffer = self.generator.generate_sound(theme, sound_type);
                self.buffers.insert(buffer_key(theme, sound_type), buffer);
            }
        }
        log::debug!(
            "generated {} sound buffers at {} Hz",
            self.buffers.len(),
            self.generator.sample_rate()
        );
    }

    pub fn get(&self, key: &str) -> Option<&AudioBuffer> {
        self.buffers.get(key)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.generator.sample_rate()
    }
}
