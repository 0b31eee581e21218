use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const WHITE_KEYS_PER_OCTAVE: i32 = 7;
pub const BLACK_KEYS_PER_OCTAVE: i32 = 5;
pub const KEYS_PER_OCTAVE: i32 = WHITE_KEYS_PER_OCTAVE + BLACK_KEYS_PER_OCTAVE;

/// Highest pitch a MIDI note message can carry.
pub const MAX_PITCH: i32 = 127;

/// Dimensions and pitch range of an on-screen keyboard.
///
/// Black key dimensions are always derived from the white key dimensions, so
/// they are not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Pitch of the leftmost white key of the first octave.
    #[serde(default = "default_start_pitch")]
    pub start_pitch: i32,
    #[serde(default = "default_white_key_width")]
    pub white_key_width: i32,
    #[serde(default = "default_white_key_height")]
    pub white_key_height: i32,
    #[serde(default = "default_octaves")]
    pub octaves: i32,
}

fn default_start_pitch() -> i32 {
    48
}

fn default_white_key_width() -> i32 {
    40
}

fn default_white_key_height() -> i32 {
    200
}

fn default_octaves() -> i32 {
    3
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            start_pitch: default_start_pitch(),
            white_key_width: default_white_key_width(),
            white_key_height: default_white_key_height(),
            octaves: default_octaves(),
        }
    }
}

impl KeyboardConfig {
    pub fn with_start_pitch(mut self, start_pitch: i32) -> Self {
        self.start_pitch = start_pitch;
        self
    }

    pub fn with_white_key_size(mut self, width: i32, height: i32) -> Self {
        self.white_key_width = width;
        self.white_key_height = height;
        self
    }

    pub fn with_octaves(mut self, octaves: i32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn black_key_width(&self) -> i32 {
        self.white_key_width / 2
    }

    pub fn black_key_height(&self) -> i32 {
        self.white_key_height / 2
    }

    pub fn white_keys_per_octave(&self) -> i32 {
        WHITE_KEYS_PER_OCTAVE
    }

    pub fn black_keys_per_octave(&self) -> i32 {
        BLACK_KEYS_PER_OCTAVE
    }

    pub fn keys_per_octave(&self) -> i32 {
        KEYS_PER_OCTAVE
    }

    pub fn white_key_count(&self) -> i32 {
        WHITE_KEYS_PER_OCTAVE.saturating_mul(self.octaves.max(0))
    }

    pub fn key_count(&self) -> i32 {
        KEYS_PER_OCTAVE.saturating_mul(self.octaves.max(0))
    }

    /// Total keyboard width in pixels, saturating at `i32::MAX` for
    /// configurations that [`validate`](Self::validate) rejects as too wide.
    pub fn width(&self) -> i32 {
        self.white_key_width.saturating_mul(self.white_key_count())
    }

    /// Total keyboard height in pixels.
    pub fn height(&self) -> i32 {
        self.white_key_height
    }

    /// Pitch of the rightmost key, or `None` for an empty keyboard.
    pub fn last_pitch(&self) -> Option<i32> {
        (self.octaves > 0).then(|| {
            self.start_pitch
                .saturating_add(self.key_count())
                .saturating_sub(1)
        })
    }

    /// Checks that the configuration describes a drawable keyboard whose
    /// pitches fit in a MIDI note message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("white key width", self.white_key_width),
            ("white key height", self.white_key_height),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        if self.octaves < 0 {
            return Err(ConfigError::NegativeOctaves(self.octaves));
        }
        if self.black_key_width() == 0 {
            return Err(ConfigError::DegenerateBlackKey {
                name: "white key width",
                value: self.white_key_width,
            });
        }
        if self.black_key_height() == 0 {
            return Err(ConfigError::DegenerateBlackKey {
                name: "white key height",
                value: self.white_key_height,
            });
        }
        if let Some(last) = self.last_pitch() {
            if self.start_pitch < 0 || last > MAX_PITCH {
                return Err(ConfigError::PitchOutOfRange {
                    first: self.start_pitch,
                    last,
                });
            }
        }
        // Every vertex x lies in 0..=width, so a width that fits keeps the
        // whole layout inside i32.
        let fits = self
            .white_key_width
            .checked_mul(WHITE_KEYS_PER_OCTAVE)
            .and_then(|octave| octave.checked_mul(self.octaves));
        if fits.is_none() {
            return Err(ConfigError::TooWide {
                white_key_width: self.white_key_width,
                octaves: self.octaves,
            });
        }
        Ok(())
    }
}
