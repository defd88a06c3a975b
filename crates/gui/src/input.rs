//! Translates macroquad's per-frame input state into session events

use chess_duel_core::{InputEvent, Point};
use macroquad::input::{
    is_mouse_button_pressed, is_mouse_button_released, is_quit_requested, mouse_position,
    MouseButton,
};

/// Events since the last frame, in the order the session should see them
pub fn poll() -> Vec<InputEvent> {
    let mut events = Vec::new();
    let (x, y) = mouse_position();
    let cursor = Point::new(x, y);

    if is_mouse_button_pressed(MouseButton::Left) {
        events.push(InputEvent::MouseDown(cursor));
    }
    if is_mouse_button_released(MouseButton::Left) {
        events.push(InputEvent::MouseUp(cursor));
    }
    if is_quit_requested() {
        events.push(InputEvent::CloseRequested);
    }

    events
}
