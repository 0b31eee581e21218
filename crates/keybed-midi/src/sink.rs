use keybed::NoteSink;
use tracing::warn;

use crate::{MidiError, MidiMessage, DEFAULT_VELOCITY};

/// Anything that can deliver raw MIDI bytes.
pub trait MidiTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError>;
}

impl MidiTransport for Vec<MidiMessage> {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        let data: [u8; 3] = bytes
            .try_into()
            .map_err(|_| MidiError::Backend(format!("expected 3 bytes, got {}", bytes.len())))?;
        self.push(MidiMessage { data });
        Ok(())
    }
}

/// [`NoteSink`] that encodes commands as MIDI note messages.
///
/// Send failures are logged and dropped: the keyboard keeps working even if
/// the port disappears.
pub struct MidiNoteSink<T> {
    transport: T,
    channel: u8,
    velocity: u8,
}

impl<T: MidiTransport> MidiNoteSink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            channel: 0,
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Zero-based MIDI channel; values above 15 are clamped.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel.min(15);
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.clamp(1, 127);
        self
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn deliver(&mut self, message: MidiMessage) {
        if let Err(err) = self.transport.send(message.bytes()) {
            warn!(?err, bytes = ?message.data, "dropping MIDI message");
        }
    }
}

impl<T: MidiTransport> NoteSink for MidiNoteSink<T> {
    fn note_on(&mut self, pitch: u8) {
        self.deliver(MidiMessage::note_on(self.channel, pitch, self.velocity));
    }

    fn note_off(&mut self, pitch: u8) {
        self.deliver(MidiMessage::note_off(self.channel, pitch));
    }
}
