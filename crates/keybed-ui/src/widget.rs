use egui::{self, Pos2, Response, Sense, Shape, Stroke};
use keybed::{InteractionState, Keyboard, NoteSink, Point, PointerInteraction, Rect};

use tracing::debug;

use crate::palette::KeyboardPalette;

/// Converts a screen position to keyboard-local pixel coordinates.
pub fn to_local(origin: Pos2, pos: Pos2) -> Point {
    Point::new(
        (pos.x - origin.x).floor() as i32,
        (pos.y - origin.y).floor() as i32,
    )
}

/// Converts a keyboard-local rectangle to screen space.
pub fn to_screen(origin: Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        origin + egui::vec2(rect.left as f32, rect.top as f32),
        origin + egui::vec2(rect.right as f32, rect.bottom as f32),
    )
}

/// Primary-button state for one frame, already in local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
    /// Whether the pointer is over the widget.
    pub over: bool,
    pub pos: Option<Point>,
}

/// Clickable keyboard. Owns the laid out keys and the pointer state machine.
pub struct PianoWidget<S> {
    keyboard: Keyboard,
    interaction: PointerInteraction<S>,
    palette: KeyboardPalette,
    holding: bool,
}

impl<S: NoteSink> PianoWidget<S> {
    pub fn new(keyboard: Keyboard, sink: S) -> Self {
        Self {
            keyboard,
            interaction: PointerInteraction::new(sink),
            palette: KeyboardPalette::default(),
            holding: false,
        }
    }

    pub fn with_palette(mut self, palette: KeyboardPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn interaction(&self) -> &PointerInteraction<S> {
        &self.interaction
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.interaction.sink_mut()
    }

    /// Feeds one frame of pointer state to the interaction.
    ///
    /// A gesture only starts when the button goes down over the keyboard;
    /// from then on every frame is a drag until the button comes up, even if
    /// the pointer has left the widget.
    pub fn apply_pointer(&mut self, sample: PointerSample) {
        let Some(pos) = sample.pos else {
            if sample.released && self.holding {
                debug!("keyboard gesture ended off screen");
                self.holding = false;
                self.interaction.silence();
            }
            return;
        };
        if sample.pressed && sample.over {
            debug!(x = pos.x, y = pos.y, "keyboard gesture started");
            self.holding = true;
            self.interaction.press(&self.keyboard, pos);
        } else if self.holding && sample.down {
            self.interaction.drag(&self.keyboard, pos);
        }
        if sample.released && self.holding {
            debug!(x = pos.x, y = pos.y, "keyboard gesture ended");
            self.holding = false;
            self.interaction.release(&self.keyboard, pos);
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Response {
        let size = egui::vec2(self.keyboard.width() as f32, self.keyboard.height() as f32);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let origin = rect.min;

        let sample = ui.input(|input| PointerSample {
            pressed: input.pointer.primary_pressed(),
            down: input.pointer.primary_down(),
            released: input.pointer.primary_released(),
            over: response.hovered(),
            pos: input.pointer.interact_pos().map(|pos| to_local(origin, pos)),
        });
        let before = self.interaction.state();
        self.apply_pointer(sample);
        if self.interaction.state() != before {
            ui.ctx().request_repaint();
        }

        self.paint(&ui.painter_at(rect), origin);
        response
    }

    fn paint(&self, painter: &egui::Painter, origin: Pos2) {
        let sounding = match self.interaction.state() {
            InteractionState::Sounding { index, .. } => Some(index),
            InteractionState::Idle => None,
        };
        let outline = Stroke::new(1.0, self.palette.outline);
        for (index, key) in self.keyboard.paint_order() {
            let fill = self.palette.fill(key.class(), sounding == Some(index));
            for band in key.boundary().fill_bands() {
                painter.rect_filled(to_screen(origin, band), 0.0, fill);
            }
            let points = key
                .boundary()
                .vertices()
                .iter()
                .map(|v| origin + egui::vec2(v.x as f32, v.y as f32))
                .collect();
            painter.add(Shape::closed_line(points, outline));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybed::{KeyboardConfig, KeyboardLayout, NoteCommand, RecordingSink};

    fn widget() -> PianoWidget<RecordingSink> {
        let keyboard = KeyboardLayout::build(&KeyboardConfig::default()).unwrap();
        PianoWidget::new(keyboard, RecordingSink::default())
    }

    fn sample(pressed: bool, down: bool, released: bool, x: i32, y: i32) -> PointerSample {
        PointerSample {
            pressed,
            down,
            released,
            over: (0..840).contains(&x) && (0..200).contains(&y),
            pos: Some(Point::new(x, y)),
        }
    }

    #[test]
    fn local_coordinates_floor_fractional_pixels() {
        let origin = Pos2::new(10.0, 20.0);
        assert_eq!(to_local(origin, Pos2::new(10.9, 21.2)), Point::new(0, 1));
        assert_eq!(to_local(origin, Pos2::new(9.5, 20.0)), Point::new(-1, 0));
    }

    #[test]
    fn screen_rects_are_offset_by_origin() {
        let rect = to_screen(
            Pos2::new(5.0, 5.0),
            Rect {
                left: 0,
                top: 0,
                right: 30,
                bottom: 100,
            },
        );
        assert_eq!(rect.min, Pos2::new(5.0, 5.0));
        assert_eq!(rect.max, Pos2::new(35.0, 105.0));
    }

    #[test]
    fn a_click_plays_and_stops_a_note() {
        let mut w = widget();
        w.apply_pointer(sample(true, true, false, 0, 1));
        w.apply_pointer(sample(false, false, true, 0, 1));
        assert_eq!(
            w.interaction().sink().commands(),
            &[NoteCommand::On(48), NoteCommand::Off(48)]
        );
    }

    #[test]
    fn hovering_without_a_press_is_silent() {
        let mut w = widget();
        w.apply_pointer(sample(false, false, false, 0, 1));
        w.apply_pointer(sample(false, true, false, 41, 1));
        assert!(w.interaction().sink().commands().is_empty());
    }

    #[test]
    fn a_gesture_continues_outside_the_widget() {
        let mut w = widget();
        w.apply_pointer(sample(true, true, false, 0, 1));
        w.apply_pointer(sample(false, true, false, 0, 900));
        w.apply_pointer(sample(false, true, false, 51, 1));
        w.apply_pointer(sample(false, false, true, 2000, 2000));
        assert_eq!(
            w.interaction().sink().commands(),
            &[
                NoteCommand::On(48),
                NoteCommand::Off(48),
                NoteCommand::On(50),
                NoteCommand::Off(50)
            ]
        );
    }

    #[test]
    fn release_with_pointer_gone_still_stops_the_note() {
        let mut w = widget();
        w.apply_pointer(sample(true, true, false, 0, 1));
        w.apply_pointer(PointerSample {
            released: true,
            ..PointerSample::default()
        });
        assert_eq!(w.interaction().state(), InteractionState::Idle);
        assert_eq!(w.interaction().sink().key_off_count(48), 1);
    }

    #[test]
    fn paints_a_frame_without_panicking() {
        let ctx = egui::Context::default();
        let mut w = widget();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                w.show(ui);
            });
        });
        assert_eq!(w.interaction().state(), InteractionState::Idle);
    }
}
