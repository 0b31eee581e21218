#![no_main]

use keybed::{
    KeyboardConfig, KeyboardLayout, NoteCommand, Point, PointerEvent, PointerInteraction,
    RecordingSink,
};
use libfuzzer_sys::fuzz_target;

// Each 5-byte chunk is one event: kind, then x and y as little-endian i16.
fuzz_target!(|data: &[u8]| {
    let Some((head, rest)) = data.split_first() else {
        return;
    };
    let config = KeyboardConfig::default()
        .with_white_key_size(i32::from(head % 64) + 2, 200)
        .with_octaves(2);
    let Ok(keyboard) = KeyboardLayout::build(&config) else {
        return;
    };

    let mut input = PointerInteraction::new(RecordingSink::default());
    for chunk in rest.chunks_exact(5) {
        let point = Point::new(
            i32::from(i16::from_le_bytes([chunk[1], chunk[2]])),
            i32::from(i16::from_le_bytes([chunk[3], chunk[4]])),
        );
        let event = match chunk[0] % 3 {
            0 => PointerEvent::Press(point),
            1 => PointerEvent::Drag(point),
            _ => PointerEvent::Release(point),
        };
        input.handle(&keyboard, event);
    }

    let mut sounding = None;
    for &cmd in input.sink().commands() {
        match cmd {
            NoteCommand::On(pitch) => {
                assert!(sounding.is_none());
                sounding = Some(pitch);
            }
            NoteCommand::Off(pitch) => {
                assert_eq!(sounding, Some(pitch));
                sounding = None;
            }
        }
    }
    assert_eq!(sounding, input.sounding_pitch());
});
