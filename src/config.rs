use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::audio::Accent;
use crate::practice::Timings;
use crate::visibility::DisplayMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub book: String,
    pub display_mode: DisplayMode,
    pub accent: Accent,
    /// Multiplier on the speech engine's normal rate.
    pub speech_rate: f32,
    pub speech: bool,
    pub sound_effects: bool,
    /// Fixed seed for hide-random masks; drawn per run when unset.
    pub random_seed: Option<u64>,
    pub advance_delay_ms: u64,
    pub recovery_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            book: "starter".to_string(),
            display_mode: DisplayMode::Full,
            accent: Accent::Us,
            speech_rate: 1.0,
            speech: true,
            sound_effects: true,
            random_seed: None,
            advance_delay_ms: 300,
            recovery_delay_ms: 1000,
        }
    }
}

impl Config {
    pub fn timings(&self) -> Timings {
        Timings {
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            recovery_delay: Duration::from_millis(self.recovery_delay_ms),
            ..Timings::default()
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
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
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("ignoring invalid config {}: {e}", self.path.display());
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
