use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use keybed::KeyboardConfig;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_VELOCITY;

const SETTINGS_DIR: &str = "keybed";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted output and keyboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiSettings {
    /// Substring of the preferred output port name.
    #[serde(default)]
    pub port: Option<String>,
    /// One-based MIDI channel (1-16).
    #[serde(default = "default_channel")]
    pub channel: u8,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

fn default_channel() -> u8 {
    1
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Default for MidiSettings {
    fn default() -> Self {
        Self {
            port: None,
            channel: default_channel(),
            velocity: default_velocity(),
            keyboard: KeyboardConfig::default(),
        }
    }
}

impl MidiSettings {
    /// Zero-based channel suitable for [`MidiMessage`](crate::MidiMessage).
    pub fn channel_index(&self) -> u8 {
        self.channel.saturating_sub(1).min(15)
    }

    /// Default location: `<config dir>/keybed/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        let mut base = dirs::config_dir()?;
        base.push(SETTINGS_DIR);
        base.push(SETTINGS_FILE);
        Some(base)
    }

    /// Load settings from the default location. Returns defaults if loading fails.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|err| {
            tracing::warn!(?err, path = %path.display(), "ignoring unreadable settings");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a valid settings file", path.display()))
    }

    /// Save settings to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::default_path().context("missing config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("create settings directory")?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write settings file {}", path.display()))
    }
}
