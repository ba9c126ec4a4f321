use std::f32::consts::PI;
use std::sync::Arc;

use super::{SoundTheme, SoundType};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Immutable mono sample block
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    samples: Arc<[f32]>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples: samples.into(),
        }
    }

    pub fn empty(sample_rate: u32) -> Self {
        Self::new(sample_rate, Vec::new())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Synthesis parameters for one theme/type pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Multiplier applied to the sound type's base frequency
    pub pitch: f32,
    /// Weight of the 2f overtone; the 3f overtone gets half of it
    pub harmonic: f32,
    pub attack_secs: f32,
    /// Exponent of the attack curve, 1.0 is a linear ramp
    pub attack_sharpness: f32,
    pub decay_secs: f32,
    pub sustain: f32,
}

impl Voice {
    fn theme(theme: SoundTheme) -> Option<Voice> {
        let voice = match theme {
            SoundTheme::Mechanical => Voice {
                pitch: 1.0,
                harmonic: 0.5,
                attack_secs: 0.002,
                attack_sharpness: 0.5,
                decay_secs: 0.03,
                sustain: 0.2,
            },
            SoundTheme::Soft => Voice {
                pitch: 0.8,
                harmonic: 0.15,
                attack_secs: 0.015,
                attack_sharpness: 2.0,
                decay_secs: 0.08,
                sustain: 0.5,
            },
            SoundTheme::Typewriter => Voice {
                pitch: 1.25,
                harmonic: 0.8,
                attack_secs: 0.001,
                attack_sharpness: 1.0,
                decay_secs: 0.02,
                sustain: 0.1,
            },
            SoundTheme::None => return None,
        };
        Some(voice)
    }

    /// Theme voice shaped for the event it announces
    pub fn for_sound(theme: SoundTheme, sound_type: SoundType) -> Option<Voice> {
        let mut voice = Self::theme(theme)?;
        match sound_type {
            SoundType::KeyPress => {}
            SoundType::WordComplete => {
                voice.harmonic *= 0.6;
                voice.sustain = (voice.sustain * 1.5).min(1.0);
            }
            SoundType::Error => {
                voice.harmonic *= 1.4;
                voice.decay_secs *= 2.0;
            }
        }
        Some(voice)
    }

    /// Amplitude envelope at sample `i`
    fn envelope(&self, i: usize, sample_rate: u32) -> f32 {
        let attack = ((self.attack_secs * sample_rate as f32) as usize).max(1);
        let decay = ((self.decay_secs * sample_rate as f32) as usize).max(1);

        if i < attack {
            (i as f32 / attack as f32).powf(self.attack_sharpness)
        } else if i < attack + decay {
            let progress = (i - attack) as f32 / decay as f32;
            1.0 - (1.0 - self.sustain) * progress
        } else {
            self.sustain
        }
    }
}

/// Deterministic tone synthesizer at a fixed sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneGenerator {
    sample_rate: u32,
}

impl Default for ToneGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl ToneGenerator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render `duration` seconds of a harmonic tone at `frequency` (before theme pitch).
    ///
    /// The `none` theme renders nothing and yields an empty buffer.
    pub fn generate_tone(
        &self,
        frequency: f32,
        duration: f32,
        theme: SoundTheme,
        sound_type: SoundType,
    ) -> AudioBuffer {
        let Some(voice) = Voice::for_sound(theme, sound_type) else {
            return AudioBuffer::empty(self.sample_rate);
        };

        let length = (duration.max(0.0) * self.sample_rate as f32).round() as usize;
        let freq = frequency * voice.pitch;
        let norm = 1.0 + 1.5 * voice.harmonic;
        let rate = self.sample_rate as f32;

        let samples = (0..length)
            .map(|i| {
                let phase = 2.0 * PI * freq * (i as f32 / rate);
                let wave = phase.sin()
                    + voice.harmonic * (2.0 * phase).sin()
                    + voice.harmonic * 0.5 * (3.0 * phase).sin();
                wave / norm * voice.envelope(i, self.sample_rate)
            })
            .collect();

        AudioBuffer::new(self.sample_rate, samples)
    }

    /// The buffer for a sound type using its base frequency and duration
    pub fn generate_sound(&self, theme: SoundTheme, sound_type: SoundType) -> AudioBuffer {
        let (frequency, duration) = sound_type.base_tone();
        self.generate_tone(frequency, duration, theme, sound_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_matches_duration() {
        let gen = ToneGenerator::new(44_100);
        let buf = gen.generate_tone(400.0, 0.1, SoundTheme::Mechanical, SoundType::KeyPress);
        assert_eq!(buf.len(), 4410);
        assert_eq!(buf.sample_rate(), 44_100);

        let buf = gen.generate_sound(SoundTheme::Soft, SoundType::Error);
        assert_eq!(buf.len(), 13_230);
        assert!((buf.duration_secs() - 0.3).abs() < 1e-4);
    }

    #[test]
    fn generation_is_deterministic() {
        let gen = ToneGenerator::default();
        for theme in SoundTheme::AUDIBLE {
            for ty in SoundType::ALL {
                let a = gen.generate_sound(theme, ty);
                let b = gen.generate_sound(theme, ty);
                assert_eq!(a.samples(), b.samples(), "{theme} {ty} differs");
            }
        }
    }

    #[test]
    fn themes_sound_different() {
        let gen = ToneGenerator::default();
        let mechanical = gen.generate_tone(400.0, 0.1, SoundTheme::Mechanical, SoundType::KeyPress);
        let soft = gen.generate_tone(400.0, 0.1, SoundTheme::Soft, SoundType::KeyPress);
        let typewriter = gen.generate_tone(400.0, 0.1, SoundTheme::Typewriter, SoundType::KeyPress);
        assert_ne!(mechanical.samples(), soft.samples());
        assert_ne!(mechanical.samples(), typewriter.samples());
        assert_ne!(soft.samples(), typewriter.samples());
    }

    #[test]
    fn samples_stay_in_range() {
        let gen = ToneGenerator::default();
        for theme in SoundTheme::AUDIBLE {
            for ty in SoundType::ALL {
                let buf = gen.generate_sound(theme, ty);
                let peak = buf.samples().iter().fold(0.0f32, |m, s| m.max(s.abs()));
                assert!(peak <= 1.0, "{theme} {ty} peaks at {peak}");
                assert!(peak > 0.05, "{theme} {ty} is nearly silent");
            }
        }
    }

    #[test]
    fn envelope_starts_silent_and_settles_at_sustain() {
        let voice = Voice::for_sound(SoundTheme::Soft, SoundType::KeyPress).unwrap();
        assert_eq!(voice.envelope(0, 44_100), 0.0);
        assert_eq!(voice.envelope(44_100, 44_100), voice.sustain);

        let attack_end = (voice.attack_secs * 44_100.0) as usize;
        assert!((voice.envelope(attack_end, 44_100) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sharp_attack_rises_faster_than_soft() {
        let sharp = Voice::for_sound(SoundTheme::Mechanical, SoundType::KeyPress).unwrap();
        let mut soft = sharp;
        soft.attack_sharpness = 2.0;
        let mid = (sharp.attack_secs * 44_100.0) as usize / 2;
        assert!(sharp.envelope(mid, 44_100) > soft.envelope(mid, 44_100));
    }

    #[test]
    fn none_theme_is_silent() {
        let gen = ToneGenerator::default();
        let buf = gen.generate_tone(400.0, 0.1, SoundTheme::None, SoundType::KeyPress);
        assert!(buf.is_empty());
        assert!(Voice::for_sound(SoundTheme::None, SoundType::Error).is_none());
    }
}
