use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

use crate::editor::SketchEditor;

/// Where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the canvas origin
    pub position: Pos2,
    pub is_in_canvas: bool,
}

/// Pointer and key events, already translated to canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        location: InputLocation,
    },
    PointerUp {
        location: InputLocation,
    },
    PointerMove {
        location: InputLocation,
    },
    /// Pointer left the canvas or the window
    PointerLeave,
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
}

/// Converts raw egui input into [`InputEvent`]s for the canvas.
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    pressed_in_canvas: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING)
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
            pressed_in_canvas: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: (pos - self.canvas_rect.min).to_pos2(),
            is_in_canvas: self.canvas_rect.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents. Presses only
    /// start on the canvas while `canvas_hovered`, so popups over it are
    /// ignored.
    pub fn process_input(&mut self, ctx: &Context, canvas_hovered: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let wants_keyboard = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let was_inside = self
                .last_pointer_pos
                .is_some_and(|pos| self.canvas_rect.contains(pos));

            if let Some(pos) = hover {
                let location = self.make_location(pos);
                if Some(pos) != self.last_pointer_pos && (location.is_in_canvas || self.pressed_in_canvas) {
                    events.push(InputEvent::PointerMove { location });
                }
                if was_inside && !location.is_in_canvas && !self.pressed_in_canvas {
                    events.push(InputEvent::PointerLeave);
                }
            } else if was_inside {
                events.push(InputEvent::PointerLeave);
            }
            self.last_pointer_pos = hover;

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = input.pointer.interact_pos() {
                    let location = self.make_location(pos);
                    if location.is_in_canvas && canvas_hovered {
                        self.pressed_in_canvas = true;
                        events.push(InputEvent::PointerDown { location });
                    }
                }
            }
            if input.pointer.button_released(PointerButton::Primary) && self.pressed_in_canvas {
                self.pressed_in_canvas = false;
                let pos = input.pointer.interact_pos().or(hover).unwrap_or(self.canvas_rect.min);
                events.push(InputEvent::PointerUp {
                    location: self.make_location(pos),
                });
            }

            if wants_keyboard {
                return;
            }
            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    });
                }
            }
        });

        events
    }
}

/// Feeds one event to the editor. Undo and redo shortcuts are handled here;
/// other keys go to the active tool.
pub fn route_event(editor: &mut SketchEditor, event: &InputEvent) {
    match event {
        InputEvent::PointerDown { location } => editor.pointer_down(location.position),
        InputEvent::PointerMove { location } => editor.pointer_move(location.position),
        InputEvent::PointerUp { location } => editor.pointer_up(location.position),
        InputEvent::PointerLeave => editor.pointer_leave(),
        InputEvent::KeyDown { key, modifiers } => match (key, modifiers.command, modifiers.shift) {
            (Key::Z, true, false) => editor.undo(),
            (Key::Z, true, true) | (Key::Y, true, _) => editor.redo(),
            _ => editor.key_down(*key),
        },
    }
}
