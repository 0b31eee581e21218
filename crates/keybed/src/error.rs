use thiserror::Error;

/// Errors raised while validating a [`KeyboardConfig`](crate::KeyboardConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A pixel dimension was zero or negative.
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: i32 },
    /// The octave count was negative.
    #[error("octave count must not be negative, got {0}")]
    NegativeOctaves(i32),
    /// Halving a white key dimension produced an empty black key.
    #[error("{name} of {value} leaves no room for a black key")]
    DegenerateBlackKey { name: &'static str, value: i32 },
    /// The keyboard would produce pitches outside 0..=127.
    #[error("pitch range {first}..={last} falls outside the MIDI range 0..=127")]
    PitchOutOfRange { first: i32, last: i32 },
    /// The total keyboard width does not fit in an `i32` pixel coordinate.
    #[error("{octaves} octaves of {white_key_width} pixel white keys overflow the pixel range")]
    TooWide { white_key_width: i32, octaves: i32 },
}
