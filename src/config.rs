use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::{DEFAULT_ADVANCE_DELAY_MS, DEFAULT_WORDS};
use crate::sound::synth::DEFAULT_SAMPLE_RATE;
use crate::sound::{SoundConfig, SoundTheme};

/// Startup settings; every field may be omitted in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub words: Vec<String>,
    pub theme: SoundTheme,
    pub volume: f32,
    pub sound_enabled: bool,
    pub advance_delay_ms: u64,
    pub sample_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        let sound = SoundConfig::default();
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            theme: sound.theme,
            volume: sound.volume,
            sound_enabled: sound.enabled,
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Config {
    pub fn sound_config(&self) -> SoundConfig {
        SoundConfig {
            theme: self.theme,
            volume: self.volume,
            enabled: self.sound_enabled,
        }
    }
}

/// Read-only source of startup configuration
pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", self.path.display());
                return Config::default();
            }
            Err(e) => {
                log::warn!("cannot read {}: {e}", self.path.display());
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => {
                log::info!("loaded config from {}", self.path.display());
                cfg
            }
            Err(e) => {
                log::warn!("ignoring invalid config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }
}
