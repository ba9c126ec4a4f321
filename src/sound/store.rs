use super::bank::SoundBank;
use super::output::{AudioSink, NullSink, PlaybackRequest};
use super::synth::ToneGenerator;
use super::{buffer_key, SoundTheme, SoundType};

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_THEME: SoundTheme = SoundTheme::Mechanical;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundConfig {
    pub theme: SoundTheme,
    /// Linear gain in [0, 1]
    pub volume: f32,
    pub enabled: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME,
            volume: DEFAULT_VOLUME,
            enabled: true,
        }
    }
}

/// Sound settings plus the playback route for session cues.
///
/// A live store renders its [`SoundBank`] on construction, so nothing can be
/// played before the buffers exist. [`SoundStore::inert`] is the fallback for
/// callers without a configured store: it reports sound as disabled, ignores
/// every setter, and never reaches a sink.
pub struct SoundStore {
    config: SoundConfig,
    bank: SoundBank,
    sink: Box<dyn AudioSink>,
    inert: bool,
}

impl std::fmt::Debug for SoundStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundStore")
            .field("config", &self.config)
            .field("buffers", &self.bank.len())
            .field("inert", &self.inert)
            .finish()
    }
}

impl Default for SoundStore {
    fn default() -> Self {
        Self::inert()
    }
}

impl SoundStore {
    pub fn new(config: SoundConfig, generator: ToneGenerator, sink: Box<dyn AudioSink>) -> Self {
        let mut store = Self {
            config: SoundConfig::default(),
            bank: SoundBank::generated(generator),
            sink,
            inert: false,
        };
        store.config.theme = config.theme;
        store.config.enabled = config.enabled;
        store.set_volume(config.volume);
        log::info!("sound ready: {:?}", store.config);
        store
    }

    pub fn inert() -> Self {
        Self {
            config: SoundConfig {
                theme: SoundTheme::None,
                volume: DEFAULT_VOLUME,
                enabled: false,
            },
            bank: SoundBank::default(),
            sink: Box::new(NullSink),
            inert: true,
        }
    }

    pub fn config(&self) -> SoundConfig {
        self.config
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Clamps to [0, 1]; non-finite input is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if self.inert {
            return;
        }
        if !volume.is_finite() {
            log::debug!("ignoring non-finite volume {volume}");
            return;
        }
        self.config.volume = volume.clamp(0.0, 1.0);
        log::debug!("volume set to {:.2}", self.config.volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        // round to hundredths so repeated steps land on clean values
        let target = ((self.config.volume + delta) * 100.0).round() / 100.0;
        self.set_volume(target);
    }

    pub fn set_theme(&mut self, theme: SoundTheme) {
        if self.inert {
            return;
        }
        self.config.theme = theme;
        log::debug!("theme set to {theme}");
    }

    pub fn cycle_theme(&mut self) {
        self.set_theme(self.config.theme.next());
    }

    pub fn toggle_sound(&mut self) {
        if self.inert {
            return;
        }
        self.config.enabled = !self.config.enabled;
        log::debug!("sound enabled: {}", self.config.enabled);
    }

    /// Request playback of a cue for the current theme. Never fails.
    pub fn play_sound(&self, sound_type: SoundType) {
        let SoundConfig {
            theme,
            volume,
            enabled,
        } = self.config;
        if self.inert || !enabled || !theme.is_audible() {
            return;
        }

        let key = buffer_key(theme, sound_type);
        match self.bank.get(&key) {
            Some(buffer) => self.sink.start(PlaybackRequest {
                key: &key,
                buffer,
                gain: volume,
            }),
            None => log::warn!("no buffer found for key: {key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::output::MemorySink;

    fn store(config: SoundConfig) -> (SoundStore, MemorySink) {
        let sink = MemorySink::new();
        let store = SoundStore::new(config, ToneGenerator::new(8_000), Box::new(sink.clone()));
        (store, sink)
    }

    #[test]
    fn defaults() {
        let config = SoundConfig::default();
        assert_eq!(config.theme, SoundTheme::Mechanical);
        assert_eq!(config.volume, 0.5);
        assert!(config.enabled);
    }

    #[test]
    fn plays_theme_buffer_at_volume() {
        let (store, sink) = store(SoundConfig::default());
        store.play_sound(SoundType::KeyPress);
        let played = sink.played();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].key, "mechanical_keyPress");
        assert_eq!(played[0].gain, 0.5);
        assert_eq!(played[0].frames, 800);
    }

    #[test]
    fn disabled_store_never_plays() {
        let (mut store, sink) = store(SoundConfig::default());
        store.toggle_sound();
        assert!(!store.config().enabled);
        for ty in SoundType::ALL {
            store.play_sound(ty);
        }
        assert!(sink.played().is_empty());

        store.toggle_sound();
        store.play_sound(SoundType::Error);
        assert_eq!(sink.keys(), vec!["mechanical_error".to_string()]);
    }

    #[test]
    fn none_theme_never_plays() {
        let (mut store, sink) = store(SoundConfig::default());
        store.set_theme(SoundTheme::None);
        assert!(store.config().enabled);
        store.play_sound(SoundType::WordComplete);
        assert!(sink.played().is_empty());
    }

    #[test]
    fn theme_change_selects_buffers() {
        let (mut store, sink) = store(SoundConfig::default());
        store.set_theme(SoundTheme::Typewriter);
        store.play_sound(SoundType::WordComplete);
        store.cycle_theme();
        assert_eq!(store.config().theme, SoundTheme::None);
        store.cycle_theme();
        store.play_sound(SoundType::KeyPress);
        assert_eq!(
            sink.keys(),
            vec![
                "typewriter_wordComplete".to_string(),
                "mechanical_keyPress".to_string()
            ]
        );
    }

    #[test]
    fn volume_is_clamped() {
        let (mut store, _) = store(SoundConfig::default());
        store.set_volume(1.7);
        assert_eq!(store.config().volume, 1.0);
        store.set_volume(-0.3);
        assert_eq!(store.config().volume, 0.0);
        store.set_volume(f32::NAN);
        assert_eq!(store.config().volume, 0.0);
        store.adjust_volume(0.1);
        store.adjust_volume(0.1);
        assert_eq!(store.config().volume, 0.2);
    }

    #[test]
    fn initial_volume_is_clamped() {
        let (store, _) = store(SoundConfig {
            volume: 3.0,
            ..SoundConfig::default()
        });
        assert_eq!(store.config().volume, 1.0);
    }

    #[test]
    fn inert_store_ignores_everything() {
        let mut store = SoundStore::default();
        assert!(store.is_inert());
        store.toggle_sound();
        store.set_theme(SoundTheme::Soft);
        store.set_volume(0.9);
        assert_eq!(
            store.config(),
            SoundConfig {
                theme: SoundTheme::None,
                volume: 0.5,
                enabled: false
            }
        );
        store.play_sound(SoundType::KeyPress);
        assert!(store.bank().is_empty());
    }
}
