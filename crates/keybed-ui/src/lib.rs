//! egui front-end for a keybed keyboard.

pub mod palette;
pub mod widget;

pub use palette::KeyboardPalette;
pub use widget::{to_local, to_screen, PianoWidget, PointerSample};
