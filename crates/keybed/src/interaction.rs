//! Pointer gestures to note on/off commands.
//!
//! At most one key sounds at a time. Switching keys always sends the old
//! key's off before the new key's on, and only an explicit release or
//! entering another key ends a note; dragging off the keyboard keeps it
//! sounding.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;
use crate::key::Key;
use crate::layout::Keyboard;
use crate::sink::NoteSink;

/// Pointer input in keyboard-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvent {
    Press(Point),
    Drag(Point),
    Release(Point),
}

impl PointerEvent {
    pub fn point(self) -> Point {
        match self {
            PointerEvent::Press(p) | PointerEvent::Drag(p) | PointerEvent::Release(p) => p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// `index` locates the key in the keyboard it was pressed on; `pitch` is
    /// what was turned on and is what gets turned off.
    Sounding { index: usize, pitch: u8 },
}

/// Single-pointer state machine driving a [`NoteSink`].
///
/// The keyboard is borrowed per call rather than stored, so the same
/// interaction can be driven by whatever owns the keys.
#[derive(Debug)]
pub struct PointerInteraction<S> {
    sink: S,
    state: InteractionState,
}

impl<S: NoteSink> PointerInteraction<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn sounding_key<'k>(&self, keyboard: &'k Keyboard) -> Option<&'k Key> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Sounding { index, pitch } => {
                keyboard.key(index).filter(|key| key.pitch() == pitch)
            }
        }
    }

    pub fn sounding_pitch(&self) -> Option<u8> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Sounding { pitch, .. } => Some(pitch),
        }
    }

    pub fn handle(&mut self, keyboard: &Keyboard, event: PointerEvent) {
        match event {
            PointerEvent::Press(point) => self.press(keyboard, point),
            PointerEvent::Drag(point) => self.drag(keyboard, point),
            PointerEvent::Release(point) => self.release(keyboard, point),
        }
    }

    pub fn press(&mut self, keyboard: &Keyboard, point: Point) {
        if let Some(key) = self.enter(keyboard, point) {
            debug!(%key, x = point.x, y = point.y, "key pressed");
        }
    }

    pub fn drag(&mut self, keyboard: &Keyboard, point: Point) {
        self.enter(keyboard, point);
    }

    /// Ends the sounding note wherever the pointer is released.
    pub fn release(&mut self, _keyboard: &Keyboard, _point: Point) {
        self.silence();
    }

    /// Turns off the sounding note, if any, and returns to idle. The off
    /// carries the pitch that was turned on, whatever keyboard is current.
    pub fn silence(&mut self) {
        if let InteractionState::Sounding { pitch, .. } = std::mem::take(&mut self.state) {
            self.sink.note_off(pitch);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Swaps in a new sink and returns the old one. A sounding key is
    /// turned off on the old sink first so no note is left hanging.
    pub fn set_sink(&mut self, sink: S) -> S {
        self.silence();
        std::mem::replace(&mut self.sink, sink)
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Moves the sounding state onto the key under `point`. Returns the newly
    /// sounding key when a transition happened.
    fn enter<'k>(&mut self, keyboard: &'k Keyboard, point: Point) -> Option<&'k Key> {
        let index = keyboard.key_index_at(point)?;
        let key = keyboard.key(index)?;
        let next = InteractionState::Sounding {
            index,
            pitch: key.pitch(),
        };
        if self.state == next {
            return None;
        }
        self.silence();
        key.sound(&mut self.sink, true);
        self.state = next;
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardConfig;
    use crate::layout::KeyboardLayout;
    use crate::sink::{NoteCommand, RecordingSink};

    fn setup() -> (Keyboard, PointerInteraction<RecordingSink>) {
        let keyboard = KeyboardLayout::build(&KeyboardConfig::default()).unwrap();
        (keyboard, PointerInteraction::new(RecordingSink::default()))
    }

    #[test]
    fn press_then_release_pairs_on_and_off() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        assert_eq!(input.sounding_pitch(), Some(48));
        input.release(&kb, Point::new(0, 1));
        assert_eq!(input.state(), InteractionState::Idle);
        assert_eq!(
            input.sink().commands(),
            &[NoteCommand::On(48), NoteCommand::Off(48)]
        );
    }

    #[test]
    fn pressing_the_sounding_key_again_is_silent() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        input.press(&kb, Point::new(5, 150));
        input.drag(&kb, Point::new(10, 10));
        assert_eq!(input.sink().commands(), &[NoteCommand::On(48)]);
    }

    #[test]
    fn pressing_another_key_turns_the_old_one_off_first() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        input.press(&kb, Point::new(100, 150));
        assert_eq!(
            input.sink().commands(),
            &[NoteCommand::On(48), NoteCommand::Off(48), NoteCommand::On(52)]
        );
    }

    #[test]
    fn press_outside_every_key_changes_nothing() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(-5, -5));
        assert_eq!(input.state(), InteractionState::Idle);

        input.press(&kb, Point::new(0, 1));
        input.press(&kb, Point::new(0, 900));
        assert_eq!(input.sounding_pitch(), Some(48));
        assert_eq!(input.sink().commands(), &[NoteCommand::On(48)]);
    }

    #[test]
    fn dragging_off_the_keyboard_keeps_sounding_until_release() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        input.drag(&kb, Point::new(0, 600));
        assert_eq!(input.sounding_pitch(), Some(48));
        input.release(&kb, Point::new(0, 600));
        assert_eq!(
            input.sink().commands(),
            &[NoteCommand::On(48), NoteCommand::Off(48)]
        );
    }

    #[test]
    fn dragging_off_and_back_onto_another_key_switches() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        input.drag(&kb, Point::new(0, 600));
        input.drag(&kb, Point::new(41, 1));
        assert_eq!(input.sounding_pitch(), Some(49));
        assert_eq!(
            input.sink().commands(),
            &[NoteCommand::On(48), NoteCommand::Off(48), NoteCommand::On(49)]
        );
    }

    #[test]
    fn drag_without_press_starts_a_note() {
        let (kb, mut input) = setup();
        input.drag(&kb, Point::new(0, 1));
        assert_eq!(input.sink().key_on_count(48), 1);
    }

    #[test]
    fn release_while_idle_is_a_no_op() {
        let (kb, mut input) = setup();
        input.release(&kb, Point::new(0, 1));
        assert!(input.sink().commands().is_empty());
    }

    #[test]
    fn handle_dispatches_events() {
        let (kb, mut input) = setup();
        for event in [
            PointerEvent::Press(Point::new(0, 1)),
            PointerEvent::Drag(Point::new(51, 1)),
            PointerEvent::Release(Point::new(51, 1)),
        ] {
            input.handle(&kb, event);
        }
        assert_eq!(
            input.sink().commands(),
            &[
                NoteCommand::On(48),
                NoteCommand::Off(48),
                NoteCommand::On(50),
                NoteCommand::Off(50)
            ]
        );
    }

    #[test]
    fn replacing_the_sink_silences_the_old_one() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        let old = input.set_sink(RecordingSink::default());
        assert_eq!(old.commands(), &[NoteCommand::On(48), NoteCommand::Off(48)]);
        assert_eq!(input.state(), InteractionState::Idle);
        assert!(input.sink().commands().is_empty());
    }

    #[test]
    fn release_against_a_rebuilt_keyboard_turns_off_the_pressed_pitch() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(800, 150));
        assert_eq!(input.sounding_pitch(), Some(83));

        let smaller = KeyboardLayout::build(&KeyboardConfig::default().with_octaves(1)).unwrap();
        assert!(input.sounding_key(&smaller).is_none());
        input.release(&smaller, Point::new(800, 150));
        assert_eq!(input.state(), InteractionState::Idle);
        assert_eq!(input.sink().key_off_count(83), 1);
        assert_eq!(
            input.sink().commands(),
            &[NoteCommand::On(83), NoteCommand::Off(83)]
        );
    }

    #[test]
    fn switching_keyboards_mid_gesture_keeps_on_and_off_paired() {
        let (kb, mut input) = setup();
        input.press(&kb, Point::new(0, 1));
        // Same key count, shifted an octave up: index 0 is now pitch 60.
        let shifted =
            KeyboardLayout::build(&KeyboardConfig::default().with_start_pitch(60)).unwrap();
        input.drag(&shifted, Point::new(0, 1));
        input.release(&shifted, Point::new(0, 1));
        assert_eq!(
            input.sink().commands(),
            &[
                NoteCommand::On(48),
                NoteCommand::Off(48),
                NoteCommand::On(60),
                NoteCommand::Off(60)
            ]
        );
    }

    #[test]
    fn pointer_events_deserialize_from_tagged_json() {
        let events: Vec<PointerEvent> =
            serde_json::from_str(r#"[{"press":{"x":0,"y":1}},{"release":{"x":3,"y":4}}]"#)
                .unwrap();
        assert_eq!(
            events,
            vec![
                PointerEvent::Press(Point::new(0, 1)),
                PointerEvent::Release(Point::new(3, 4))
            ]
        );
    }
}
