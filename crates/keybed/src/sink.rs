//! Destinations for note on/off commands.

use serde::{Deserialize, Serialize};

/// Receives note on/off commands produced by pointer interaction.
///
/// Implementations are not consulted for success; a sink that can fail is
/// expected to report failures through its own channel.
pub trait NoteSink {
    fn note_on(&mut self, pitch: u8);
    fn note_off(&mut self, pitch: u8);
}

impl<S: NoteSink + ?Sized> NoteSink for &mut S {
    fn note_on(&mut self, pitch: u8) {
        (**self).note_on(pitch);
    }

    fn note_off(&mut self, pitch: u8) {
        (**self).note_off(pitch);
    }
}

impl<S: NoteSink + ?Sized> NoteSink for Box<S> {
    fn note_on(&mut self, pitch: u8) {
        (**self).note_on(pitch);
    }

    fn note_off(&mut self, pitch: u8) {
        (**self).note_off(pitch);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteCommand {
    On(u8),
    Off(u8),
}

impl NoteCommand {
    pub fn pitch(self) -> u8 {
        match self {
            NoteCommand::On(pitch) | NoteCommand::Off(pitch) => pitch,
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, NoteCommand::On(_))
    }

    /// Delivers this command to a sink.
    pub fn apply<S: NoteSink + ?Sized>(self, sink: &mut S) {
        match self {
            NoteCommand::On(pitch) => sink.note_on(pitch),
            NoteCommand::Off(pitch) => sink.note_off(pitch),
        }
    }
}

/// Sink that records every command it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<NoteCommand>,
}

impl RecordingSink {
    pub fn commands(&self) -> &[NoteCommand] {
        &self.commands
    }

    pub fn key_on_count(&self, pitch: u8) -> usize {
        self.count(NoteCommand::On(pitch))
    }

    pub fn key_off_count(&self, pitch: u8) -> usize {
        self.count(NoteCommand::Off(pitch))
    }

    /// Whether the most recent command for `pitch` turned it on.
    pub fn is_key_on(&self, pitch: u8) -> bool {
        self.commands
            .iter()
            .rev()
            .find(|cmd| cmd.pitch() == pitch)
            .is_some_and(|cmd| cmd.is_on())
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn count(&self, wanted: NoteCommand) -> usize {
        self.commands.iter().filter(|&&cmd| cmd == wanted).count()
    }
}

impl NoteSink for RecordingSink {
    fn note_on(&mut self, pitch: u8) {
        self.commands.push(NoteCommand::On(pitch));
    }

    fn note_off(&mut self, pitch: u8) {
        self.commands.push(NoteCommand::Off(pitch));
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NoteSink for NullSink {
    fn note_on(&mut self, _pitch: u8) {}

    fn note_off(&mut self, _pitch: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_tracks_counts_and_latest_state() {
        let mut sink = RecordingSink::default();
        assert!(!sink.is_key_on(48));

        sink.note_on(48);
        sink.note_on(50);
        assert!(sink.is_key_on(48));

        sink.note_off(48);
        assert!(!sink.is_key_on(48));
        assert!(sink.is_key_on(50));
        assert_eq!(sink.key_on_count(48), 1);
        assert_eq!(sink.key_off_count(48), 1);
        assert_eq!(sink.key_off_count(50), 0);

        sink.clear();
        assert!(sink.commands().is_empty());
        assert!(!sink.is_key_on(50));
    }

    #[test]
    fn boxed_and_borrowed_sinks_forward() {
        let mut recorder = RecordingSink::default();
        {
            let mut borrowed: &mut RecordingSink = &mut recorder;
            NoteCommand::On(60).apply(&mut borrowed);
        }
        let mut boxed: Box<dyn NoteSink> = Box::new(NullSink);
        boxed.note_on(1);
        boxed.note_off(1);
        assert_eq!(recorder.commands(), &[NoteCommand::On(60)]);
    }
}
