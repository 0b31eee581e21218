//! Key outline construction.
//!
//! Every octave is laid out from the same twelve-entry pattern. White keys
//! are notched at the top wherever a black key overlaps them, so after layout
//! no pixel belongs to more than one key and hit testing never has to break
//! ties between a black key and the white key beneath it.

use tracing::debug;

use crate::config::{KeyboardConfig, KEYS_PER_OCTAVE, WHITE_KEYS_PER_OCTAVE};
use crate::error::ConfigError;
use crate::geometry::{Point, Polygon};
use crate::key::{Key, KeyClass, KeyShape};

/// Semitone pattern of one octave: the key's outline family and the white
/// key column it occupies. Black keys sit on the left edge of their column.
const OCTAVE_PATTERN: [(KeyShape, i32); KEYS_PER_OCTAVE as usize] = [
    (KeyShape::LeftWhite, 0),
    (KeyShape::Black, 1),
    (KeyShape::MiddleWhite, 1),
    (KeyShape::Black, 2),
    (KeyShape::RightWhite, 2),
    (KeyShape::LeftWhite, 3),
    (KeyShape::Black, 4),
    (KeyShape::MiddleWhite, 4),
    (KeyShape::Black, 5),
    (KeyShape::MiddleWhite, 5),
    (KeyShape::Black, 6),
    (KeyShape::RightWhite, 6),
];

/// Builds keyboards from a [`KeyboardConfig`].
#[derive(Debug, Clone, Copy)]
pub struct KeyboardLayout {
    config: KeyboardConfig,
}

impl KeyboardLayout {
    /// Validates `config` and lays out every key, octave by octave.
    pub fn build(config: &KeyboardConfig) -> Result<Keyboard, ConfigError> {
        config.validate()?;
        let layout = Self { config: *config };

        let mut keys = Vec::with_capacity(config.key_count() as usize);
        for octave in 0..config.octaves {
            layout.push_octave(octave, &mut keys)?;
        }
        debug!(
            keys = keys.len(),
            octaves = config.octaves,
            width = config.width(),
            height = config.height(),
            "built keyboard layout"
        );
        Ok(Keyboard {
            config: *config,
            keys,
        })
    }

    fn push_octave(&self, octave: i32, keys: &mut Vec<Key>) -> Result<(), ConfigError> {
        let cfg = &self.config;
        let left = octave * WHITE_KEYS_PER_OCTAVE * cfg.white_key_width;
        let first_pitch = cfg.start_pitch + octave * KEYS_PER_OCTAVE;

        for (semitone, &(shape, column)) in OCTAVE_PATTERN.iter().enumerate() {
            let pitch = first_pitch + semitone as i32;
            let pitch = u8::try_from(pitch).map_err(|_| ConfigError::PitchOutOfRange {
                first: cfg.start_pitch,
                last: pitch,
            })?;
            let x = left + column * cfg.white_key_width;
            let boundary = match shape {
                KeyShape::Black => self.black_outline(x - cfg.black_key_width() / 2),
                _ => self.white_outline(x, shape),
            };
            keys.push(Key::new(boundary, shape, pitch));
        }
        Ok(())
    }

    fn black_outline(&self, x: i32) -> Polygon {
        Polygon::rect(
            Point::new(x, 0),
            self.config.black_key_width(),
            self.config.black_key_height(),
        )
    }

    /// Outline of a white key whose full-width body starts at `x`.
    ///
    /// A black key straddling a white key boundary covers `bw / 2` pixels of
    /// the key on its left and the remaining `bw - bw / 2` of the key on its
    /// right; the notches are cut to exactly those widths.
    fn white_outline(&self, x: i32, shape: KeyShape) -> Polygon {
        let cfg = &self.config;
        let bw = cfg.black_key_width();
        let bh = cfg.black_key_height();
        let (notch_left, notch_right) = match shape {
            KeyShape::LeftWhite => (0, bw / 2),
            KeyShape::MiddleWhite => (bw - bw / 2, bw / 2),
            KeyShape::RightWhite => (bw - bw / 2, 0),
            KeyShape::Black => (0, 0),
        };
        let right = x + cfg.white_key_width;
        let bottom = cfg.white_key_height;

        let mut vertices = Vec::with_capacity(8);
        vertices.push(Point::new(x + notch_left, 0));
        vertices.push(Point::new(right - notch_right, 0));
        if notch_right > 0 {
            vertices.push(Point::new(right - notch_right, bh));
            vertices.push(Point::new(right, bh));
        }
        vertices.push(Point::new(right, bottom));
        vertices.push(Point::new(x, bottom));
        if notch_left > 0 {
            vertices.push(Point::new(x, bh));
            vertices.push(Point::new(x + notch_left, bh));
        }
        Polygon::new(vertices)
    }
}

/// Ordered, immutable collection of laid out keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    config: KeyboardConfig,
    keys: Vec<Key>,
}

impl Keyboard {
    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Keys in pitch order, left to right.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn width(&self) -> i32 {
        self.config.width()
    }

    pub fn height(&self) -> i32 {
        self.config.height()
    }

    pub fn key_for_pitch(&self, pitch: u8) -> Option<&Key> {
        let offset = i32::from(pitch) - self.config.start_pitch;
        usize::try_from(offset)
            .ok()
            .and_then(|index| self.keys.get(index))
    }

    /// Index of the key under `point`. Black keys are tested before white keys.
    pub fn key_index_at(&self, point: Point) -> Option<usize> {
        self.index_in_class(KeyClass::Black, point)
            .or_else(|| self.index_in_class(KeyClass::White, point))
    }

    pub fn hit_test(&self, point: Point) -> Option<&Key> {
        self.key_index_at(point).map(|index| &self.keys[index])
    }

    /// Keys in painting order: all white keys, then all black keys.
    pub fn paint_order(&self) -> impl Iterator<Item = (usize, &Key)> + '_ {
        let layer = |class: KeyClass| {
            self.keys
                .iter()
                .enumerate()
                .filter(move |(_, key)| key.class() == class)
        };
        layer(KeyClass::White).chain(layer(KeyClass::Black))
    }

    fn index_in_class(&self, class: KeyClass, point: Point) -> Option<usize> {
        self.keys
            .iter()
            .position(|key| key.class() == class && key.contains(point))
    }
}
