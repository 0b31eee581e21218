//! On-screen piano keyboard: key outlines and pointer interaction.
//!
//! [`KeyboardLayout::build`] turns a [`KeyboardConfig`] into a [`Keyboard`]
//! whose keys interlock without overlapping, and [`PointerInteraction`] turns
//! press/drag/release events into note on/off commands on a [`NoteSink`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod key;
pub mod layout;
pub mod sink;

pub use config::KeyboardConfig;
pub use error::ConfigError;
pub use geometry::{Point, Polygon, Rect};
pub use interaction::{InteractionState, PointerEvent, PointerInteraction};
pub use key::{Key, KeyClass, KeyShape};
pub use layout::{Keyboard, KeyboardLayout};
pub use sink::{NoteCommand, NoteSink, NullSink, RecordingSink};
