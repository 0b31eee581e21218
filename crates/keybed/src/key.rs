use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};
use crate::sink::NoteSink;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Colour class of a key. Black keys are painted above white keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyClass {
    White,
    Black,
}

impl KeyClass {
    /// Painting layer; higher layers are drawn later.
    pub fn paint_layer(self) -> u8 {
        match self {
            KeyClass::White => 0,
            KeyClass::Black => 1,
        }
    }
}

/// Outline family of a key, determined by which neighbours are black keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyShape {
    /// White key with a black neighbour on its right only (C, F).
    LeftWhite,
    /// White key between two black keys (D, G, A).
    MiddleWhite,
    /// White key with a black neighbour on its left only (E, B).
    RightWhite,
    Black,
}

impl KeyShape {
    pub fn class(self) -> KeyClass {
        match self {
            KeyShape::Black => KeyClass::Black,
            _ => KeyClass::White,
        }
    }
}

/// A single key of the keyboard. Immutable once laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    boundary: Polygon,
    shape: KeyShape,
    pitch: u8,
}

impl Key {
    pub fn new(boundary: Polygon, shape: KeyShape, pitch: u8) -> Self {
        Self {
            boundary,
            shape,
            pitch,
        }
    }

    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    pub fn shape(&self) -> KeyShape {
        self.shape
    }

    pub fn class(&self) -> KeyClass {
        self.shape.class()
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn contains(&self, point: Point) -> bool {
        self.boundary.contains(point)
    }

    /// Scientific pitch name, with MIDI 60 as `C4`.
    pub fn note_name(&self) -> String {
        let octave = i32::from(self.pitch) / 12 - 1;
        format!("{}{}", NOTE_NAMES[usize::from(self.pitch % 12)], octave)
    }

    /// Turns this key's note on or off on the given sink.
    pub fn sound<S: NoteSink + ?Sized>(&self, sink: &mut S, on: bool) {
        if on {
            sink.note_on(self.pitch);
        } else {
            sink.note_off(self.pitch);
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.class() {
            KeyClass::White => "white",
            KeyClass::Black => "black",
        };
        write!(f, "{} ({class}, pitch {})", self.note_name(), self.pitch)
    }
}
