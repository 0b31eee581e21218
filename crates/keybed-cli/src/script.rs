use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use keybed::{Keyboard, NoteSink, PointerEvent, PointerInteraction};
use tracing::{debug, warn};

/// Reads a JSON array of pointer events.
pub fn load(path: &Path) -> Result<Vec<PointerEvent>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a valid pointer event script", path.display()))
}

/// Replays `events` and returns the sink. A note still sounding when the
/// script ends is turned off so nothing is left hanging on the output.
pub fn run<S: NoteSink>(keyboard: &Keyboard, events: &[PointerEvent], sink: S) -> S {
    let mut interaction = PointerInteraction::new(sink);
    for &event in events {
        debug!(?event, "replaying");
        interaction.handle(keyboard, event);
    }
    if let Some(pitch) = interaction.sounding_pitch() {
        warn!(pitch, "script ended without a release; stopping note");
        interaction.silence();
    }
    interaction.into_sink()
}

/// Writes one line per command: `on <pitch>` or `off <pitch>`.
pub struct PrintSink<W> {
    out: W,
}

impl PrintSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, verb: &str, pitch: u8) {
        if let Err(err) = writeln!(self.out, "{verb} {pitch}") {
            warn!(?err, "failed to print note command");
        }
    }
}

impl<W: Write> NoteSink for PrintSink<W> {
    fn note_on(&mut self, pitch: u8) {
        self.line("on", pitch);
    }

    fn note_off(&mut self, pitch: u8) {
        self.line("off", pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybed::{KeyboardConfig, KeyboardLayout, NoteCommand, RecordingSink};

    fn keyboard() -> Keyboard {
        KeyboardLayout::build(&KeyboardConfig::default()).unwrap()
    }

    #[test]
    fn loads_and_replays_a_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gesture.json");
        fs::write(
            &path,
            r#"[
                {"press": {"x": 0, "y": 1}},
                {"drag": {"x": 41, "y": 1}},
                {"release": {"x": 41, "y": 1}}
            ]"#,
        )
        .unwrap();

        let events = load(&path).unwrap();
        let sink = run(&keyboard(), &events, RecordingSink::default());
        assert_eq!(
            sink.commands(),
            &[
                NoteCommand::On(48),
                NoteCommand::Off(48),
                NoteCommand::On(49),
                NoteCommand::Off(49)
            ]
        );
    }

    #[test]
    fn unreleased_notes_are_stopped_at_the_end() {
        let events = [PointerEvent::Press(keybed::Point::new(0, 1))];
        let sink = run(&keyboard(), &events, RecordingSink::default());
        assert_eq!(sink.key_off_count(48), 1);
    }

    #[test]
    fn print_sink_writes_one_line_per_command() {
        let mut sink = PrintSink::new(Vec::new());
        sink.note_on(60);
        sink.note_off(60);
        assert_eq!(String::from_utf8(sink.out).unwrap(), "on 60\noff 60\n");
    }

    #[test]
    fn rejects_malformed_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"tap": {"x": 0, "y": 0}}]"#).unwrap();
        assert!(load(&path).is_err());
    }
}
