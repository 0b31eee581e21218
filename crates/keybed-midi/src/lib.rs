//! MIDI output for keybed: message encoding, a `midir` backed sink and the
//! settings file that remembers which port to use.

pub mod output;
pub mod settings;
pub mod sink;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use output::{MidiOutputHandle, MidiOutputManager};
pub use settings::MidiSettings;
pub use sink::{MidiNoteSink, MidiTransport};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

/// Velocity used when none is configured.
pub const DEFAULT_VELOCITY: u8 = 100;

/// Errors that can be produced while talking to MIDI outputs.
#[derive(Debug, Error)]
pub enum MidiError {
    /// No port matched the requested index or name.
    #[error("unknown MIDI port {0}")]
    UnknownPort(String),
    /// Opening a connection to the port failed.
    #[error("failed to connect to MIDI port: {0}")]
    Connect(String),
    /// Backend specific failure with additional context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Three byte channel voice message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MidiMessage {
    pub data: [u8; 3],
}

impl MidiMessage {
    /// Note on for a zero-based `channel` (0-15).
    pub fn note_on(channel: u8, pitch: u8, velocity: u8) -> Self {
        Self {
            data: [NOTE_ON | (channel & 0x0f), pitch & 0x7f, velocity.clamp(1, 127)],
        }
    }

    pub fn note_off(channel: u8, pitch: u8) -> Self {
        Self {
            data: [NOTE_OFF | (channel & 0x0f), pitch & 0x7f, 0],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_note_messages() {
        assert_eq!(MidiMessage::note_on(0, 48, 100).bytes(), &[0x90, 48, 100]);
        assert_eq!(MidiMessage::note_off(0, 48).bytes(), &[0x80, 48, 0]);
        assert_eq!(MidiMessage::note_on(9, 60, 127).bytes(), &[0x99, 60, 127]);
    }

    #[test]
    fn note_on_never_carries_zero_velocity() {
        // Velocity 0 would be read as a note off by most receivers.
        assert_eq!(MidiMessage::note_on(0, 60, 0).data[2], 1);
    }
}
