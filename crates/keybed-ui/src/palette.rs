use egui::Color32;
use keybed::KeyClass;

#[derive(Clone, Debug)]
pub struct KeyboardPalette {
    pub background: Color32,
    pub white_key: Color32,
    pub black_key: Color32,
    pub outline: Color32,
    pub sounding_white: Color32,
    pub sounding_black: Color32,
}

impl Default for KeyboardPalette {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(24, 24, 28),
            white_key: Color32::from_rgb(240, 240, 234),
            black_key: Color32::from_rgb(8, 8, 0),
            outline: Color32::from_rgb(60, 60, 66),
            sounding_white: Color32::from_rgb(150, 200, 150),
            sounding_black: Color32::from_rgb(16, 112, 16),
        }
    }
}

impl KeyboardPalette {
    pub fn fill(&self, class: KeyClass, sounding: bool) -> Color32 {
        match (class, sounding) {
            (KeyClass::White, false) => self.white_key,
            (KeyClass::White, true) => self.sounding_white,
            (KeyClass::Black, false) => self.black_key,
            (KeyClass::Black, true) => self.sounding_black,
        }
    }
}
